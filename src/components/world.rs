//! World State
//!
//! Shared mutable facts all actors read and some actions write: the
//! append-only turn history and a last-write-wins key/value fact store that
//! later renderings consult to build causal narrative chains.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::actor::ActorId;

/// Well-known shared fact keys.
pub mod facts {
    /// How the mess hall food was last described ("lukewarm", "stringy", ...)
    pub const MESS_HALL_QUALITY: &str = "mess_hall_quality";
    /// Name of whoever last passed judgment on the food
    pub const MESS_HALL_CRITIC: &str = "mess_hall_critic";
    /// State of the deck lighting after an ambient event
    pub const DECK_LIGHTS: &str = "deck_lights";
}

/// Outcome of one completed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Monotonic turn counter, starting at 0, no gaps
    pub turn: u64,
    pub actor_id: ActorId,
    pub actor_name: String,
    /// The narrative line describing the action
    pub text: String,
    /// True when the line came from the generative provider rather than a
    /// scripted template
    pub generative: bool,
    /// Structured tags for downstream consumers ("location:mess_hall", ...)
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
struct FactEntry {
    value: String,
    set_at_turn: u64,
}

/// Resource: the shared world state.
///
/// `history` grows by exactly one record per completed turn and is never
/// rewritten. Facts are last-write-wins and may expire after a configured
/// number of turns.
#[derive(Resource, Debug, Default)]
pub struct WorldState {
    history: Vec<TurnRecord>,
    shared_facts: HashMap<String, FactEntry>,
    /// Turns a fact stays readable; `None` means forever
    fact_retention: Option<u64>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fact_retention(fact_retention: Option<u64>) -> Self {
        Self {
            fact_retention,
            ..Self::default()
        }
    }

    /// Index the next completed turn will carry.
    pub fn next_turn_index(&self) -> u64 {
        self.history.len() as u64
    }

    pub fn turn_count(&self) -> u64 {
        self.history.len() as u64
    }

    /// Append a completed turn. Records must arrive in index order.
    pub fn append_turn(&mut self, record: TurnRecord) {
        debug_assert_eq!(record.turn, self.next_turn_index());
        self.history.push(record);
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn last_record(&self) -> Option<&TurnRecord> {
        self.history.last()
    }

    /// The last `n` records (or fewer) in chronological order.
    pub fn recent_history(&self, n: usize) -> &[TurnRecord] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Record a shared fact, overwriting any previous value for the key.
    pub fn set_fact(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let entry = FactEntry {
            value: value.into(),
            set_at_turn: self.next_turn_index(),
        };
        self.shared_facts.insert(key.into(), entry);
    }

    /// Most recent value for a fact, if it exists and has not expired.
    ///
    /// Expired entries are filtered on read rather than deleted, which keeps
    /// `set_fact` O(1) and lets a shrinking retention window take effect
    /// retroactively.
    pub fn get_fact(&self, key: &str) -> Option<&str> {
        let entry = self.shared_facts.get(key)?;
        if let Some(retention) = self.fact_retention {
            if self.next_turn_index() > entry.set_at_turn + retention {
                return None;
            }
        }
        Some(entry.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(turn: u64, text: &str) -> TurnRecord {
        TurnRecord {
            turn,
            actor_id: ActorId(Uuid::nil()),
            actor_name: "Crewman Sonny".to_string(),
            text: text.to_string(),
            generative: false,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_append_and_recent_history() {
        let mut world = WorldState::new();
        for turn in 0..5 {
            world.append_turn(record(turn, &format!("line {}", turn)));
        }

        assert_eq!(world.turn_count(), 5);
        let recent: Vec<u64> = world.recent_history(3).iter().map(|r| r.turn).collect();
        assert_eq!(recent, vec![2, 3, 4]);
        // Asking for more than exists returns everything
        assert_eq!(world.recent_history(100).len(), 5);
    }

    #[test]
    fn test_facts_last_write_wins() {
        let mut world = WorldState::new();
        world.set_fact(facts::MESS_HALL_QUALITY, "lukewarm");
        world.set_fact(facts::MESS_HALL_QUALITY, "stringy");

        assert_eq!(world.get_fact(facts::MESS_HALL_QUALITY), Some("stringy"));
        assert_eq!(world.get_fact("unset_key"), None);
    }

    #[test]
    fn test_fact_retention_window() {
        let mut world = WorldState::with_fact_retention(Some(2));
        world.set_fact(facts::DECK_LIGHTS, "flickering");

        world.append_turn(record(0, "a"));
        world.append_turn(record(1, "b"));
        assert_eq!(world.get_fact(facts::DECK_LIGHTS), Some("flickering"));

        world.append_turn(record(2, "c"));
        assert_eq!(world.get_fact(facts::DECK_LIGHTS), None);
    }

    #[test]
    fn test_facts_never_expire_without_retention() {
        let mut world = WorldState::new();
        world.set_fact(facts::DECK_LIGHTS, "steady");
        for turn in 0..50 {
            world.append_turn(record(turn, "x"));
        }
        assert_eq!(world.get_fact(facts::DECK_LIGHTS), Some("steady"));
    }
}
