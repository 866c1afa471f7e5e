//! Turn Engine
//!
//! Runs exactly one turn per call: pick the acting actor, run the selection
//! schedule, render or generate the narrative line, then apply all state
//! changes together. Selection and provider failures are absorbed here; a
//! call always yields a `TurnRecord` with non-empty text.

use std::io;
use std::sync::{Mutex, PoisonError};

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::catalog::{ActionCatalog, RenderCtx, Rendered};
use crate::components::actor::{ActorId, ActorProfile, ActorRegistry};
use crate::components::world::{TurnRecord, WorldState};
use crate::config::{Config, Weights};
use crate::error::SimError;
use crate::systems::candidates::applicable_candidates;
use crate::systems::select::choose_scripted;
use crate::systems::{
    add_weight_noise, build_prompt, generate_candidates, select_action, ActingActor,
    CandidateActions, GenerativeClient, SelectedAction, SelectionOutcome, SelectorParams,
    TextProvider,
};
use crate::SimRng;

/// Single-threaded turn orchestrator. Owns the ECS world, the selection
/// schedule, and the provider client.
pub struct TurnEngine {
    world: World,
    schedule: Schedule,
    provider: GenerativeClient,
    prompt_history_window: usize,
}

impl TurnEngine {
    /// Assemble the world, resources, and selection schedule. Spawning the
    /// provider worker thread is the only fallible step.
    pub fn new(
        config: &Config,
        seed: u64,
        registry: ActorRegistry,
        catalog: ActionCatalog,
        provider: impl TextProvider,
    ) -> io::Result<Self> {
        let provider = GenerativeClient::spawn(
            provider,
            config.engine.provider_timeout(),
            config.engine.max_generated_chars,
        )?;

        let mut world = World::new();
        world.insert_resource(WorldState::with_fact_retention(config.engine.fact_retention()));
        world.insert_resource(registry);
        world.insert_resource(catalog);
        world.insert_resource(config.weights.clone());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(seed)));
        world.insert_resource(ActingActor::default());
        world.insert_resource(CandidateActions::default());
        world.insert_resource(SelectedAction::default());
        world.insert_resource(SelectorParams {
            p_generative: config.engine.p_generative,
            weight_noise: config.engine.weight_noise,
        });

        let mut schedule = Schedule::default();
        schedule.add_systems((generate_candidates, add_weight_noise, select_action).chain());

        Ok(Self {
            world,
            schedule,
            provider,
            prompt_history_window: config.engine.prompt_history_window,
        })
    }

    pub fn world_state(&self) -> &WorldState {
        self.world.resource::<WorldState>()
    }

    pub fn registry(&self) -> &ActorRegistry {
        self.world.resource::<ActorRegistry>()
    }

    /// Advance the simulation by one turn.
    pub fn next_turn(&mut self) -> TurnRecord {
        let Some(actor_id) = self.pick_actor() else {
            debug!("empty roster, recording a quiet turn");
            return self.commit_idle_ship();
        };

        self.world.resource_mut::<ActingActor>().0 = Some(actor_id);
        self.schedule.run(&mut self.world);
        self.world.resource_mut::<ActingActor>().0 = None;

        let outcome = self
            .world
            .resource_mut::<SelectedAction>()
            .0
            .take()
            .unwrap_or(SelectionOutcome::NoneApplicable);
        debug!(turn = self.world_state().next_turn_index(), ?outcome, "turn settled");

        match outcome {
            SelectionOutcome::Scripted {
                template_id,
                target,
            } => self.commit_scripted(actor_id, template_id, target),
            SelectionOutcome::Generative | SelectionOutcome::NoneApplicable => {
                match self.generative_record(actor_id) {
                    Ok(record) => record,
                    Err(err) => {
                        warn!(%err, "generative path failed, reselecting from the catalog");
                        match self.scripted_fallback(actor_id) {
                            Ok(record) => record,
                            Err(err) => {
                                warn!(%err, "no scripted action available, standing down");
                                self.commit_stand_down(actor_id)
                            }
                        }
                    }
                }
            }
        }
    }

    fn pick_actor(&mut self) -> Option<ActorId> {
        self.world.resource_scope(|world, mut rng: Mut<SimRng>| {
            world.resource::<ActorRegistry>().pick_next(&mut rng.0)
        })
    }

    fn commit_scripted(
        &mut self,
        actor_id: ActorId,
        template_id: &str,
        target: Option<ActorId>,
    ) -> TurnRecord {
        let rendered = self.render(actor_id, template_id, target);
        match rendered {
            Some(rendered) => self.commit(actor_id, target, rendered, false),
            // Registry and catalog are fixed after startup, so a failed
            // lookup here means a bad template id; stand down rather than
            // skip the turn.
            None => self.commit_stand_down(actor_id),
        }
    }

    fn render(
        &mut self,
        actor_id: ActorId,
        template_id: &str,
        target: Option<ActorId>,
    ) -> Option<Rendered> {
        self.world.resource_scope(|world, mut rng: Mut<SimRng>| {
            let registry = world.resource::<ActorRegistry>();
            let world_state = world.resource::<WorldState>();
            let template = world.resource::<ActionCatalog>().get(template_id)?;
            let actor = registry.get(actor_id)?;
            let target = target.and_then(|id| registry.get(id));
            Some((template.render)(&mut RenderCtx {
                actor,
                world: world_state,
                target,
                rng: &mut rng.0,
            }))
        })
    }

    fn generative_record(&mut self, actor_id: ActorId) -> Result<TurnRecord, SimError> {
        let prompt = {
            let registry = self.world.resource::<ActorRegistry>();
            let actor = registry
                .get(actor_id)
                .ok_or(SimError::ActorNotFound(actor_id))?;
            build_prompt(
                actor,
                self.world.resource::<WorldState>(),
                self.prompt_history_window,
            )
        };

        // The only blocking call in a turn; the turn lock is held throughout.
        let text = self.provider.generate(prompt)?;
        Ok(self.commit(actor_id, None, Rendered::line(text), true))
    }

    /// Scripted selection ignoring the generative gate, used after a provider
    /// failure.
    fn scripted_fallback(&mut self, actor_id: ActorId) -> Result<TurnRecord, SimError> {
        let outcome = self.world.resource_scope(|world, mut rng: Mut<SimRng>| {
            let registry = world.resource::<ActorRegistry>();
            let world_state = world.resource::<WorldState>();
            let catalog = world.resource::<ActionCatalog>();
            let weights = world.resource::<Weights>();
            let actor = registry.get(actor_id)?;
            let pool = applicable_candidates(actor, world_state, catalog, weights);
            Some(choose_scripted(
                &mut rng.0,
                actor_id,
                pool,
                catalog,
                registry,
                world_state,
            ))
        });

        match outcome {
            Some(SelectionOutcome::Scripted {
                template_id,
                target,
            }) => Ok(self.commit_scripted(actor_id, template_id, target)),
            _ => Err(SimError::NoApplicableAction(self.actor_name(actor_id))),
        }
    }

    fn commit_stand_down(&mut self, actor_id: ActorId) -> TurnRecord {
        let text = format!(
            "{} stands down and waits for something worth doing.",
            self.actor_name(actor_id)
        );
        self.commit(
            actor_id,
            None,
            Rendered::line(text).with_tag("noop"),
            false,
        )
    }

    /// A turn with no one aboard still produces a record.
    fn commit_idle_ship(&mut self) -> TurnRecord {
        let mut world_state = self.world.resource_mut::<WorldState>();
        let record = TurnRecord {
            turn: world_state.next_turn_index(),
            actor_id: ActorId(Uuid::nil()),
            actor_name: String::new(),
            text: "The ship drifts on in silence.".to_string(),
            generative: false,
            tags: vec!["noop".to_string()],
        };
        world_state.append_turn(record.clone());
        record
    }

    /// Apply a turn's effects together: facts first (stamped with this
    /// turn's index), then the history record, then participant memories.
    fn commit(
        &mut self,
        actor_id: ActorId,
        target: Option<ActorId>,
        rendered: Rendered,
        generative: bool,
    ) -> TurnRecord {
        let actor_name = self.actor_name(actor_id);

        let mut world_state = self.world.resource_mut::<WorldState>();
        let turn = world_state.next_turn_index();
        for (key, value) in rendered.facts {
            world_state.set_fact(key, value);
        }
        let record = TurnRecord {
            turn,
            actor_id,
            actor_name,
            text: rendered.text,
            generative,
            tags: rendered.tags,
        };
        world_state.append_turn(record.clone());
        drop(world_state);

        let mut registry = self.world.resource_mut::<ActorRegistry>();
        if let Some(actor) = registry.get_mut(actor_id) {
            actor.remember(turn, record.text.clone());
        }
        if let Some(target_id) = target {
            if let Some(target) = registry.get_mut(target_id) {
                target.remember(turn, record.text.clone());
            }
        }

        record
    }

    fn actor_name(&self, actor_id: ActorId) -> String {
        self.world
            .resource::<ActorRegistry>()
            .get(actor_id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| actor_id.to_string())
    }
}

/// Thread-safe facade over the engine.
///
/// Turns are serialized behind one mutex; list and detail queries read
/// immutable profile snapshots taken at startup and never contend with a
/// running turn.
pub struct Simulation {
    engine: Mutex<TurnEngine>,
    profiles: Vec<ActorProfile>,
}

impl Simulation {
    pub fn new(engine: TurnEngine) -> Self {
        let profiles = engine.registry().all().map(|a| a.profile()).collect();
        Self {
            engine: Mutex::new(engine),
            profiles,
        }
    }

    /// Advance by one turn. Blocks while another caller's turn is in flight.
    pub fn next_turn(&self) -> TurnRecord {
        self.lock_engine().next_turn()
    }

    /// `(id, name)` pairs in roster order.
    pub fn actors(&self) -> Vec<(ActorId, String)> {
        self.profiles
            .iter()
            .map(|p| (p.id, p.name.clone()))
            .collect()
    }

    /// Full profile for one actor.
    pub fn actor_detail(&self, id: ActorId) -> Result<ActorProfile, SimError> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(SimError::ActorNotFound(id))
    }

    /// Snapshot of the transcript so far.
    pub fn history(&self) -> Vec<TurnRecord> {
        self.lock_engine().world_state().history().to_vec()
    }

    pub fn turn_count(&self) -> u64 {
        self.lock_engine().world_state().turn_count()
    }

    fn lock_engine(&self) -> std::sync::MutexGuard<'_, TurnEngine> {
        // A panic mid-turn leaves a completed history prefix; keep serving.
        self.engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
