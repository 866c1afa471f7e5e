//! Actor Types
//!
//! One simulated crew member: identity, personality, and a bounded private
//! memory of recent events. Actors are plain structs kept in a registry
//! resource; the roster is fixed at startup and never changes mid-run.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an actor, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Shipboard role, driving which scripted actions and which generative
/// prompt framing apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Captain,
    Lieutenant,
    Doctor,
    Crewman,
}

impl Role {
    /// Rank prefix used when forming display names.
    pub fn title(&self) -> &'static str {
        match self {
            Role::Captain => "Captain",
            Role::Lieutenant => "Lieutenant",
            Role::Doctor => "Doctor",
            Role::Crewman => "Crewman",
        }
    }

    pub fn is_officer(&self) -> bool {
        matches!(self, Role::Captain | Role::Lieutenant)
    }
}

/// An event an actor witnessed or was the subject of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEvent {
    /// History index of the turn this happened on
    pub turn: u64,
    /// The rendered line as the actor remembers it
    pub text: String,
}

/// A single crew member.
///
/// Identity fields (`name`, `role`, `traits`, `backstory`, `wants`, `fears`)
/// are fixed at creation; only `memory` changes as turns complete.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub role: Role,
    pub traits: Vec<String>,
    pub backstory: String,
    pub wants: Vec<String>,
    pub fears: Vec<String>,
    memory: VecDeque<MemoryEvent>,
    memory_capacity: usize,
}

impl Actor {
    pub fn new(
        name: impl Into<String>,
        role: Role,
        traits: Vec<String>,
        backstory: impl Into<String>,
        wants: Vec<String>,
        fears: Vec<String>,
        memory_capacity: usize,
    ) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            role,
            traits,
            backstory: backstory.into(),
            wants,
            fears,
            memory: VecDeque::with_capacity(memory_capacity),
            memory_capacity: memory_capacity.max(1),
        }
    }

    pub fn has_trait(&self, tag: &str) -> bool {
        self.traits.iter().any(|t| t == tag)
    }

    /// Record an event this actor witnessed or took part in, evicting the
    /// oldest entry once the ring is full.
    pub fn remember(&mut self, turn: u64, text: impl Into<String>) {
        if self.memory.len() == self.memory_capacity {
            self.memory.pop_front();
        }
        self.memory.push_back(MemoryEvent {
            turn,
            text: text.into(),
        });
    }

    /// Remembered events in chronological order.
    pub fn memory(&self) -> impl Iterator<Item = &MemoryEvent> {
        self.memory.iter()
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// Read-only snapshot of the narrative attributes exposed to callers.
    pub fn profile(&self) -> ActorProfile {
        ActorProfile {
            id: self.id,
            name: self.name.clone(),
            role: self.role,
            personality_traits: self.traits.clone(),
            backstory: self.backstory.clone(),
            wants: self.wants.clone(),
            fears: self.fears.clone(),
        }
    }
}

/// Immutable view of an actor handed out by the detail query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorProfile {
    pub id: ActorId,
    pub name: String,
    pub role: Role,
    pub personality_traits: Vec<String>,
    pub backstory: String,
    pub wants: Vec<String>,
    pub fears: Vec<String>,
}

/// Resource: the fixed roster, in creation order.
#[derive(Resource, Debug, Default)]
pub struct ActorRegistry {
    order: Vec<ActorId>,
    actors: HashMap<ActorId, Actor>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor. Roster order is registration order.
    pub fn register(&mut self, actor: Actor) -> ActorId {
        let id = actor.id;
        self.order.push(id);
        self.actors.insert(id, actor);
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// All actors in stable creation order.
    pub fn all(&self) -> impl Iterator<Item = &Actor> {
        self.order.iter().filter_map(|id| self.actors.get(id))
    }

    /// Actor ids in stable creation order.
    pub fn ids(&self) -> &[ActorId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Pick which actor acts this turn: uniform random over the roster.
    pub fn pick_next(&self, rng: &mut SmallRng) -> Option<ActorId> {
        if self.order.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.order.len());
        Some(self.order[index])
    }

    /// Every other actor's id, in roster order.
    pub fn others(&self, id: ActorId) -> Vec<ActorId> {
        self.order.iter().copied().filter(|o| *o != id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn test_actor(name: &str, role: Role) -> Actor {
        Actor::new(
            name,
            role,
            vec!["stoic".to_string()],
            "Grew up on a freight hauler.",
            vec!["a quiet shift".to_string()],
            vec!["decompression".to_string()],
            3,
        )
    }

    #[test]
    fn test_memory_ring_evicts_oldest() {
        let mut actor = test_actor("Crewman Sonny", Role::Crewman);
        for turn in 0..5u64 {
            actor.remember(turn, format!("event {}", turn));
        }

        assert_eq!(actor.memory_len(), 3);
        let turns: Vec<u64> = actor.memory().map(|m| m.turn).collect();
        assert_eq!(turns, vec![2, 3, 4]);
    }

    #[test]
    fn test_registry_order_is_stable() {
        let mut registry = ActorRegistry::new();
        let a = registry.register(test_actor("Captain Renard", Role::Captain));
        let b = registry.register(test_actor("Crewman Sonny", Role::Crewman));
        let c = registry.register(test_actor("Crewman Claire", Role::Crewman));

        let ids: Vec<ActorId> = registry.all().map(|a| a.id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(registry.ids(), &[a, b, c]);
    }

    #[test]
    fn test_pick_next_stays_in_roster() {
        let mut registry = ActorRegistry::new();
        registry.register(test_actor("Captain Renard", Role::Captain));
        registry.register(test_actor("Crewman Sonny", Role::Crewman));

        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = registry.pick_next(&mut rng).unwrap();
            assert!(registry.get(picked).is_some());
        }
    }

    #[test]
    fn test_pick_next_empty_roster() {
        let registry = ActorRegistry::new();
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(registry.pick_next(&mut rng).is_none());
    }

    #[test]
    fn test_others_excludes_self() {
        let mut registry = ActorRegistry::new();
        let a = registry.register(test_actor("Captain Renard", Role::Captain));
        let b = registry.register(test_actor("Crewman Sonny", Role::Crewman));

        assert_eq!(registry.others(a), vec![b]);
        assert_eq!(registry.others(b), vec![a]);
    }

    #[test]
    fn test_profile_snapshot() {
        let actor = test_actor("Doctor Ishii", Role::Doctor);
        let profile = actor.profile();
        assert_eq!(profile.name, "Doctor Ishii");
        assert_eq!(profile.personality_traits, vec!["stoic".to_string()]);
        assert_eq!(profile.role, Role::Doctor);
    }
}
