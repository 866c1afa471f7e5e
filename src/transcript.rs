//! Transcript Logger
//!
//! Append-only JSONL transcript of completed turns, one `TurnRecord` per
//! line, for downstream presentation layers.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::components::world::TurnRecord;

/// Writes each completed turn to a JSONL file.
pub struct TranscriptLogger {
    writer: Option<BufWriter<File>>,
    record_count: u64,
}

impl TranscriptLogger {
    /// Create a logger writing to the specified path, truncating any
    /// previous transcript.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            record_count: 0,
        })
    }

    /// Create a logger that discards records (for testing and `--transcript`
    /// left unset).
    pub fn null() -> Self {
        Self {
            writer: None,
            record_count: 0,
        }
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Append one turn to the transcript.
    pub fn log(&mut self, record: &TurnRecord) -> std::io::Result<()> {
        self.record_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for TranscriptLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Warning: Failed to flush transcript: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::actor::ActorId;
    use std::io::BufRead;

    fn record(turn: u64) -> TurnRecord {
        TurnRecord {
            turn,
            actor_id: ActorId::new(),
            actor_name: "Crewman Sonny".to_string(),
            text: format!("line {}", turn),
            generative: false,
            tags: vec!["duty".to_string()],
        }
    }

    #[test]
    fn test_transcript_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.jsonl");

        let mut logger = TranscriptLogger::new(&path).unwrap();
        logger.log(&record(0)).unwrap();
        logger.log(&record(1)).unwrap();
        logger.flush().unwrap();

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let parsed: TurnRecord = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(parsed.turn, 1);
        assert_eq!(parsed.actor_name, "Crewman Sonny");
    }

    #[test]
    fn test_null_logger_counts_without_writing() {
        let mut logger = TranscriptLogger::null();
        logger.log(&record(0)).unwrap();
        assert_eq!(logger.record_count(), 1);
    }
}
