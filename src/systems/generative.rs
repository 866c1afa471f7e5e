//! Generative Fallback
//!
//! When a turn bypasses the scripted catalog, the engine asks an external
//! text provider for the actor's action instead. The provider runs on its own
//! worker thread; calls are matched by job id so a timed-out request can be
//! abandoned without poisoning the next one.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::components::actor::{Actor, Role};
use crate::components::world::WorldState;
use crate::error::ProviderError;

/// An opaque source of generated narrative text.
///
/// Implementations may block; the engine calls them from a dedicated worker
/// thread and enforces its own deadline.
pub trait TextProvider: Send + 'static {
    fn generate(&mut self, prompt: &str) -> Result<String, ProviderError>;
}

impl<F> TextProvider for F
where
    F: FnMut(&str) -> Result<String, ProviderError> + Send + 'static,
{
    fn generate(&mut self, prompt: &str) -> Result<String, ProviderError> {
        self(prompt)
    }
}

/// Provider that always declines. The default when no collaborator is wired
/// up; every generative roll then lands on the scripted fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

impl TextProvider for NullProvider {
    fn generate(&mut self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Failed("no provider configured".to_string()))
    }
}

struct Job {
    id: u64,
    prompt: String,
}

struct JobResult {
    id: u64,
    result: Result<String, ProviderError>,
}

/// Client half of the provider worker thread.
///
/// One request may be in flight at a time. A request that misses its deadline
/// is abandoned; its late result is discarded by job id when the next call
/// drains the channel.
pub struct GenerativeClient {
    jobs: Sender<Job>,
    results: Receiver<JobResult>,
    next_job_id: u64,
    timeout: Duration,
    max_chars: usize,
}

impl GenerativeClient {
    /// Spawn the worker thread around a provider.
    pub fn spawn(
        provider: impl TextProvider,
        timeout: Duration,
        max_chars: usize,
    ) -> io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel::<JobResult>();

        thread::Builder::new()
            .name("text-provider".to_string())
            .spawn(move || {
                let mut provider = provider;
                while let Ok(job) = job_rx.recv() {
                    let result = provider.generate(&job.prompt);
                    if result_tx.send(JobResult { id: job.id, result }).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            jobs: job_tx,
            results: result_rx,
            next_job_id: 0,
            timeout,
            max_chars,
        })
    }

    /// Submit a prompt and wait for its reply, up to the configured deadline.
    /// Returns normalized single-line text on success.
    pub fn generate(&mut self, prompt: String) -> Result<String, ProviderError> {
        self.next_job_id += 1;
        let id = self.next_job_id;

        self.jobs
            .send(Job { id, prompt })
            .map_err(|_| ProviderError::Disconnected)?;

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or(ProviderError::Timeout(self.timeout))?;
            match self.results.recv_timeout(remaining) {
                Ok(reply) if reply.id == id => {
                    let text = reply.result?;
                    return normalize_reply(&text, self.max_chars);
                }
                Ok(stale) => {
                    // Result of an earlier, abandoned job
                    debug!(job_id = stale.id, "discarding stale provider result");
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(job_id = id, timeout = ?self.timeout, "provider call timed out");
                    return Err(ProviderError::Timeout(self.timeout));
                }
                Err(RecvTimeoutError::Disconnected) => return Err(ProviderError::Disconnected),
            }
        }
    }
}

/// Build the bounded prompt for one actor's generative turn.
///
/// Recent history is split into the actor's own actions and everyone else's,
/// so the provider can keep continuity without replaying the full transcript.
pub fn build_prompt(actor: &Actor, world_state: &WorldState, history_window: usize) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("You are {}, {}.\n", actor.name, role_framing(actor.role)));
    if !actor.traits.is_empty() {
        prompt.push_str(&format!("Your temperament: {}.\n", actor.traits.join(", ")));
    }
    if !actor.backstory.is_empty() {
        prompt.push_str(&format!("Background: {}\n", actor.backstory));
    }
    if !actor.wants.is_empty() {
        prompt.push_str(&format!("You want: {}.\n", actor.wants.join("; ")));
    }
    if !actor.fears.is_empty() {
        prompt.push_str(&format!("You fear: {}.\n", actor.fears.join("; ")));
    }

    let recent = world_state.recent_history(history_window);
    let own: Vec<&str> = recent
        .iter()
        .filter(|r| r.actor_id == actor.id)
        .map(|r| r.text.as_str())
        .collect();
    let others: Vec<&str> = recent
        .iter()
        .filter(|r| r.actor_id != actor.id)
        .map(|r| r.text.as_str())
        .collect();

    if !own.is_empty() {
        prompt.push_str("Your recent actions:\n");
        for line in own {
            prompt.push_str(&format!("- {}\n", line));
        }
    }
    if !others.is_empty() {
        prompt.push_str("What has happened around you recently:\n");
        for line in others {
            prompt.push_str(&format!("- {}\n", line));
        }
    }

    prompt.push_str(
        "Describe the single small action you take next aboard the ship. \
         Reply with one third-person sentence, present tense, naming yourself.",
    );
    prompt
}

fn role_framing(role: Role) -> &'static str {
    match role {
        Role::Captain => "captain of a long-haul starship, responsible for ship and crew",
        Role::Lieutenant => "first officer of a long-haul starship, keeper of discipline and drills",
        Role::Doctor => "ship's doctor aboard a long-haul starship, minding the crew's health",
        Role::Crewman => "a rank-and-file crewman aboard a long-haul starship",
    }
}

/// Clamp raw provider output to one clean narrative line.
pub fn normalize_reply(raw: &str, max_chars: usize) -> Result<String, ProviderError> {
    let first_line = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    let unquoted = first_line
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    let collapsed = unquoted.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return Err(ProviderError::InvalidOutput(
            "reply contained no usable text".to_string(),
        ));
    }
    Ok(collapsed.chars().take(max_chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::actor::ActorId;
    use crate::components::world::TurnRecord;

    fn crewman() -> Actor {
        Actor::new(
            "Crewman Sonny",
            Role::Crewman,
            vec!["cynical".to_string()],
            "Signed on to pay off a gambling debt.",
            vec!["to be left alone".to_string()],
            vec!["the airlock".to_string()],
            4,
        )
    }

    #[test]
    fn test_closure_provider_round_trip() {
        let mut client = GenerativeClient::spawn(
            |prompt: &str| {
                assert!(prompt.contains("Crewman Sonny"));
                Ok("Crewman Sonny checks a gauge twice.".to_string())
            },
            Duration::from_secs(1),
            280,
        )
        .unwrap();

        let actor = crewman();
        let prompt = build_prompt(&actor, &WorldState::new(), 5);
        let text = client.generate(prompt).unwrap();
        assert_eq!(text, "Crewman Sonny checks a gauge twice.");
    }

    #[test]
    fn test_timeout_then_stale_result_discarded() {
        let mut calls = 0u32;
        let mut client = GenerativeClient::spawn(
            move |_: &str| {
                calls += 1;
                if calls == 1 {
                    thread::sleep(Duration::from_millis(100));
                    Ok("the late one".to_string())
                } else {
                    Ok("the fresh one".to_string())
                }
            },
            Duration::from_millis(20),
            280,
        )
        .unwrap();

        let err = client.generate("first".to_string()).unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));

        // The worker finishes the first job eventually; the second call must
        // skip that result and return its own.
        let text = client.generate("second".to_string()).unwrap();
        assert_eq!(text, "the fresh one");
    }

    #[test]
    fn test_provider_failure_propagates() {
        let mut client =
            GenerativeClient::spawn(NullProvider, Duration::from_secs(1), 280).unwrap();
        let err = client.generate("anything".to_string()).unwrap_err();
        assert!(matches!(err, ProviderError::Failed(_)));
    }

    #[test]
    fn test_prompt_splits_own_and_other_history() {
        let actor = crewman();
        let mut world = WorldState::new();
        world.append_turn(TurnRecord {
            turn: 0,
            actor_id: actor.id,
            actor_name: actor.name.clone(),
            text: "Crewman Sonny scrubs the deck.".to_string(),
            generative: false,
            tags: vec![],
        });
        world.append_turn(TurnRecord {
            turn: 1,
            actor_id: ActorId::new(),
            actor_name: "Captain Renard".to_string(),
            text: "Captain Renard reviews the duty roster.".to_string(),
            generative: false,
            tags: vec![],
        });

        let prompt = build_prompt(&actor, &world, 5);
        let own_at = prompt.find("Your recent actions:").unwrap();
        let others_at = prompt
            .find("What has happened around you recently:")
            .unwrap();
        assert!(own_at < others_at);
        assert!(prompt[own_at..others_at].contains("scrubs the deck"));
        assert!(prompt[others_at..].contains("duty roster"));
    }

    #[test]
    fn test_prompt_window_is_bounded() {
        let actor = crewman();
        let mut world = WorldState::new();
        for turn in 0..20 {
            world.append_turn(TurnRecord {
                turn,
                actor_id: ActorId::new(),
                actor_name: "Crewman Claire".to_string(),
                text: format!("event {}", turn),
                generative: false,
                tags: vec![],
            });
        }

        let prompt = build_prompt(&actor, &world, 3);
        assert!(prompt.contains("event 19"));
        assert!(!prompt.contains("event 16"));
    }

    #[test]
    fn test_normalize_strips_quotes_and_extra_lines() {
        let text =
            normalize_reply("\n  \"Sonny   kicks the   recycler.\"  \nSecond line.", 280).unwrap();
        assert_eq!(text, "Sonny kicks the recycler.");
    }

    #[test]
    fn test_normalize_truncates_long_replies() {
        let long = "a".repeat(500);
        let text = normalize_reply(&long, 10).unwrap();
        assert_eq!(text.len(), 10);
    }

    #[test]
    fn test_normalize_rejects_empty_output() {
        assert!(matches!(
            normalize_reply("  \n \"\" \n", 280),
            Err(ProviderError::InvalidOutput(_))
        ));
    }
}
