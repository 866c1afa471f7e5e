//! Core Data Types
//!
//! Actors, the shared world state, and the records the engine appends to it.

pub mod actor;
pub mod world;

pub use actor::{Actor, ActorId, ActorProfile, ActorRegistry, MemoryEvent, Role};
pub use world::{facts, TurnRecord, WorldState};
