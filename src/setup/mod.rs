//! Startup Construction
//!
//! Builds the fixed crew roster before the first turn.

pub mod roster;

pub use roster::build_roster;
