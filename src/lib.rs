//! Starship Crew Narrative Engine Library
//!
//! A small closed society of crew members takes one action per turn. Callers
//! advance the simulation turn by turn; each call picks an actor, settles on
//! a scripted or generated action, applies its effects, and returns the
//! resulting narrative record.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod catalog;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod setup;
pub mod systems;
pub mod transcript;

pub use catalog::ActionCatalog;
pub use components::{Actor, ActorId, ActorProfile, ActorRegistry, Role, TurnRecord, WorldState};
pub use config::Config;
pub use engine::{Simulation, TurnEngine};
pub use error::{ProviderError, SimError};
pub use setup::build_roster;
pub use systems::{NullProvider, TextProvider};
pub use transcript::TranscriptLogger;

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
