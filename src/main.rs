//! Starship Crew Narrative Engine
//!
//! Runs the simulation from the command line: builds the roster, advances a
//! fixed number of turns, prints each narrative line, and optionally writes a
//! JSONL transcript.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process;

use crew_sim::{build_roster, ActionCatalog, Config, NullProvider, TranscriptLogger, TurnEngine};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "crew_sim")]
#[command(about = "A turn-based starship crew narrative engine")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of turns to simulate
    #[arg(long, default_value_t = 40)]
    turns: u64,

    /// Tuning file to load instead of the default tuning.toml
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Write a JSONL transcript of every turn to this path
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Override the configured crewman count
    #[arg(long)]
    crew: Option<usize>,
}

fn main() {
    let args = Args::parse();

    let mut config = match &args.tuning {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("Error: could not load {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };
    if let Some(crew) = args.crew {
        config.roster.crew_count = crew;
    }

    println!("Crew Simulation");
    println!("===============");
    println!("Seed: {}", args.seed);
    println!("Turns: {}", args.turns);
    println!();

    let mut roster_rng = SmallRng::seed_from_u64(args.seed);
    let registry = build_roster(&config.roster, config.engine.memory_capacity, &mut roster_rng);
    println!("Mustering the crew...");
    for actor in registry.all() {
        println!("  {} ({})", actor.name, actor.traits.join(", "));
    }
    println!();

    let mut engine = TurnEngine::new(
        &config,
        args.seed,
        registry,
        ActionCatalog::standard(),
        NullProvider,
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: could not start the engine: {}", e);
        process::exit(1);
    });

    let mut transcript = match &args.transcript {
        Some(path) => TranscriptLogger::new(path).unwrap_or_else(|e| {
            eprintln!("Error: could not open transcript {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => TranscriptLogger::null(),
    };

    let mut generative_count = 0u64;
    let mut noop_count = 0u64;
    for _ in 0..args.turns {
        let record = engine.next_turn();
        let marker = if record.generative { " *" } else { "" };
        println!("[turn {:>3}] {}{}", record.turn, record.text, marker);

        if record.generative {
            generative_count += 1;
        }
        if record.tags.iter().any(|t| t == "noop") {
            noop_count += 1;
        }
        if let Err(e) = transcript.log(&record) {
            eprintln!("Warning: could not write transcript record: {}", e);
        }
    }

    if let Err(e) = transcript.flush() {
        eprintln!("Warning: could not flush transcript: {}", e);
    }

    println!();
    println!(
        "Simulation complete. Ran {} turns ({} generated, {} quiet).",
        args.turns, generative_count, noop_count
    );
    if args.transcript.is_some() {
        println!("Wrote {} transcript records.", transcript.record_count());
    }
}
