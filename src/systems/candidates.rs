//! Candidate Generation System
//!
//! Builds the weighted list of scripted templates applicable to the acting
//! actor this turn.

use bevy_ecs::prelude::*;

use crate::catalog::ActionCatalog;
use crate::components::actor::{Actor, ActorId, ActorRegistry};
use crate::components::world::WorldState;
use crate::config::Weights;

/// Resource naming whose turn it is. Set by the engine before the schedule
/// runs, `None` outside a turn.
#[derive(Resource, Debug, Default)]
pub struct ActingActor(pub Option<ActorId>);

/// A scripted template still in the running for this turn.
#[derive(Debug, Clone)]
pub struct WeightedCandidate {
    pub template_id: &'static str,
    pub weight: f32,
}

/// Resource storing the weighted candidates for the acting actor.
#[derive(Resource, Debug, Default)]
pub struct CandidateActions {
    pub candidates: Vec<WeightedCandidate>,
}

impl CandidateActions {
    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    pub fn push(&mut self, candidate: WeightedCandidate) {
        self.candidates.push(candidate);
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// System to evaluate every template's applicability and weight for the
/// acting actor. Templates with non-positive weight are dropped here.
pub fn generate_candidates(
    acting: Res<ActingActor>,
    registry: Res<ActorRegistry>,
    world_state: Res<WorldState>,
    catalog: Res<ActionCatalog>,
    weights: Res<Weights>,
    mut candidates: ResMut<CandidateActions>,
) {
    candidates.clear();

    let Some(actor_id) = acting.0 else {
        return;
    };
    let Some(actor) = registry.get(actor_id) else {
        return;
    };

    candidates.candidates = applicable_candidates(actor, &world_state, &catalog, &weights);
}

/// Weighted candidates for one actor. Shared with the engine's
/// provider-failure fallback, which reselects ignoring the generative gate.
pub(crate) fn applicable_candidates(
    actor: &Actor,
    world_state: &WorldState,
    catalog: &ActionCatalog,
    weights: &Weights,
) -> Vec<WeightedCandidate> {
    let mut candidates = Vec::new();
    for template in catalog.templates() {
        if !(template.applicability)(actor, world_state) {
            continue;
        }
        let weight = (template.weight)(actor, world_state, weights);
        if weight <= 0.0 {
            continue;
        }
        candidates.push(WeightedCandidate {
            template_id: template.id,
            weight,
        });
    }
    candidates
}
