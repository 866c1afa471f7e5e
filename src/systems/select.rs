//! Action Selection System
//!
//! Rolls the generative gate, then probabilistically selects one scripted
//! candidate by weight. Candidates whose target rule cannot be satisfied are
//! discarded and the draw repeats over what remains.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::catalog::{ActionCatalog, TargetRule};
use crate::components::actor::{ActorId, ActorRegistry};
use crate::components::world::WorldState;
use crate::SimRng;

use super::candidates::{ActingActor, CandidateActions, WeightedCandidate};

/// Selection knobs lifted out of the engine config.
#[derive(Resource, Debug, Clone)]
pub struct SelectorParams {
    /// Chance a turn bypasses the catalog entirely
    pub p_generative: f32,
    /// Multiplicative weight noise (+/- fraction)
    pub weight_noise: f32,
}

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            p_generative: 0.15,
            weight_noise: 0.2,
        }
    }
}

/// What the pipeline decided for this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// A scripted template, with its resolved target if the rule needs one
    Scripted {
        template_id: &'static str,
        target: Option<ActorId>,
    },
    /// Defer to the external text provider
    Generative,
    /// Nothing in the catalog applied
    NoneApplicable,
}

/// Resource storing the pipeline's decision, `None` before `select_action`
/// has run.
#[derive(Resource, Debug, Default)]
pub struct SelectedAction(pub Option<SelectionOutcome>);

/// Add multiplicative noise to candidate weights for variety.
pub fn add_weight_noise(
    mut rng: ResMut<SimRng>,
    params: Res<SelectorParams>,
    mut candidates: ResMut<CandidateActions>,
) {
    for candidate in candidates.candidates.iter_mut() {
        let noise: f32 = 1.0 + (rng.0.gen::<f32>() - 0.5) * 2.0 * params.weight_noise;
        candidate.weight *= noise;
        candidate.weight = candidate.weight.max(0.01);
    }
}

/// System to settle the turn: generative gate first, weighted scripted
/// selection otherwise.
pub fn select_action(
    mut rng: ResMut<SimRng>,
    params: Res<SelectorParams>,
    acting: Res<ActingActor>,
    registry: Res<ActorRegistry>,
    world_state: Res<WorldState>,
    catalog: Res<ActionCatalog>,
    mut candidates: ResMut<CandidateActions>,
    mut selected: ResMut<SelectedAction>,
) {
    selected.0 = None;
    let Some(actor_id) = acting.0 else {
        return;
    };

    if params.p_generative > 0.0 && rng.0.gen::<f32>() < params.p_generative {
        selected.0 = Some(SelectionOutcome::Generative);
        return;
    }

    let pool = std::mem::take(&mut candidates.candidates);
    selected.0 = Some(choose_scripted(
        &mut rng.0,
        actor_id,
        pool,
        &catalog,
        &registry,
        &world_state,
    ));
}

/// Weighted draw over the candidate pool, discarding candidates whose target
/// rule cannot be satisfied and redrawing. Shared with the engine's fallback
/// path after a provider failure.
pub(crate) fn choose_scripted(
    rng: &mut SmallRng,
    actor_id: ActorId,
    mut pool: Vec<WeightedCandidate>,
    catalog: &ActionCatalog,
    registry: &ActorRegistry,
    world_state: &WorldState,
) -> SelectionOutcome {
    while !pool.is_empty() {
        let index = weighted_index(rng, &pool);
        let candidate = pool.swap_remove(index);
        let Some(template) = catalog.get(candidate.template_id) else {
            continue;
        };
        match resolve_target(template.target, actor_id, registry, world_state, rng) {
            TargetResolution::Solo => {
                return SelectionOutcome::Scripted {
                    template_id: template.id,
                    target: None,
                }
            }
            TargetResolution::Target(target) => {
                return SelectionOutcome::Scripted {
                    template_id: template.id,
                    target: Some(target),
                }
            }
            TargetResolution::Unavailable => continue,
        }
    }
    SelectionOutcome::NoneApplicable
}

enum TargetResolution {
    Solo,
    Target(ActorId),
    Unavailable,
}

fn resolve_target(
    rule: TargetRule,
    actor_id: ActorId,
    registry: &ActorRegistry,
    world_state: &WorldState,
    rng: &mut SmallRng,
) -> TargetResolution {
    match rule {
        TargetRule::None => TargetResolution::Solo,
        TargetRule::RandomOther => {
            let others = registry.others(actor_id);
            if others.is_empty() {
                return TargetResolution::Unavailable;
            }
            TargetResolution::Target(others[rng.gen_range(0..others.len())])
        }
        TargetRule::LastActor => {
            let last = world_state
                .last_record()
                .filter(|record| record.actor_id != actor_id)
                .map(|record| record.actor_id)
                .filter(|id| registry.get(*id).is_some());
            match last {
                Some(id) => TargetResolution::Target(id),
                None => TargetResolution::Unavailable,
            }
        }
    }
}

/// Perform weighted random selection, returning the index of the winner.
fn weighted_index(rng: &mut SmallRng, candidates: &[WeightedCandidate]) -> usize {
    let total_weight: f32 = candidates.iter().map(|c| c.weight).sum();

    if total_weight <= 0.0 {
        // Fallback to first candidate if weights are invalid
        return 0;
    }

    let mut roll: f32 = rng.gen::<f32>() * total_weight;

    for (index, candidate) in candidates.iter().enumerate() {
        roll -= candidate.weight;
        if roll <= 0.0 {
            return index;
        }
    }

    candidates.len() - 1
}
