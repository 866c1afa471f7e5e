//! Roster Construction
//!
//! Spawns the fixed crew: one captain, one lieutenant, one doctor, and a
//! configurable number of crewmen, each with a seeded character sheet drawn
//! from the pools below. The roster never changes after startup.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::components::actor::{Actor, ActorRegistry, Role};
use crate::config::RosterConfig;

const NAMES: &[&str] = &[
    "Renard", "Ishii", "Moreau", "Okafor", "Baptiste", "Varga", "Lindqvist", "Tran",
    "Okoye", "Marsh", "Dekker", "Ivanov", "Reyes", "Calloway", "Nazari", "Brandt",
    "Sonny", "Claire", "Oduya", "Silva", "Hargrove", "Petrov", "Quist", "Abara",
];

const TRAITS: &[&str] = &[
    "stoic", "gregarious", "dutiful", "anxious", "curious", "cynical",
    "superstitious", "meticulous",
];

const BACKSTORIES: &[&str] = &[
    "Grew up on a freight hauler and never quite got used to solid ground.",
    "Signed on to pay off a gambling debt and stayed out of habit.",
    "Third generation of spacers; the family name is on a plaque in the engine room of some other ship.",
    "Washed out of the naval academy and took the long way back to the stars.",
    "Left a dirt-side clinic for the quiet of the void.",
    "Joined the crew after the last ship they served on was scrapped for parts.",
];

const WANTS: &[&str] = &[
    "a quiet shift",
    "a promotion before the next port",
    "one honest game of cards",
    "news from home",
    "to see the nebula from the forward viewport",
    "a meal that isn't reconstituted",
];

const FEARS: &[&str] = &[
    "decompression",
    "the long silence between ports",
    "being forgotten dirt-side",
    "an engine note they don't recognize",
    "the med-scanner finding something",
    "running out of coffee",
];

/// Build the complete roster. Every actor gets a full character sheet; the
/// pools are large enough that names stay unique for any sane crew count.
pub fn build_roster(
    config: &RosterConfig,
    memory_capacity: usize,
    rng: &mut SmallRng,
) -> ActorRegistry {
    let mut names: Vec<&str> = NAMES.to_vec();
    names.shuffle(rng);
    let mut names = names.into_iter().cycle().enumerate();
    let mut next_name = move || {
        // Past one full cycle, suffix to keep names unique
        let (index, name) = names.next().unwrap_or((0, NAMES[0]));
        if index < NAMES.len() {
            name.to_string()
        } else {
            format!("{} {}", name, index / NAMES.len() + 1)
        }
    };

    let mut registry = ActorRegistry::new();
    let mut spawn = |registry: &mut ActorRegistry, role: Role, rng: &mut SmallRng| {
        let name = format!("{} {}", role.title(), next_name());
        registry.register(make_actor(name, role, memory_capacity, rng));
    };

    spawn(&mut registry, Role::Captain, rng);
    spawn(&mut registry, Role::Lieutenant, rng);
    spawn(&mut registry, Role::Doctor, rng);
    for _ in 0..config.crew_count {
        spawn(&mut registry, Role::Crewman, rng);
    }
    registry
}

fn make_actor(name: String, role: Role, memory_capacity: usize, rng: &mut SmallRng) -> Actor {
    let traits: Vec<String> = TRAITS
        .choose_multiple(rng, 2)
        .map(|t| t.to_string())
        .collect();
    let backstory = BACKSTORIES.choose(rng).copied().unwrap_or(BACKSTORIES[0]);
    let wants = vec![WANTS.choose(rng).copied().unwrap_or(WANTS[0]).to_string()];
    let fears = vec![FEARS.choose(rng).copied().unwrap_or(FEARS[0]).to_string()];

    Actor::new(name, role, traits, backstory, wants, fears, memory_capacity)
}
