//! Duty Templates
//!
//! Solo actions: role-specific shipboard duties, ambient ship events, and the
//! always-applicable viewport catch-all that guarantees the catalog can
//! always produce a line.

use super::{pick, ActionCatalog, ActionTemplate, RenderCtx, Rendered, TargetRule};
use crate::components::actor::{Actor, Role};
use crate::components::world::{facts, WorldState};
use crate::config::Weights;

pub const CAPTAIN_LOG: &str = "captain_log";
pub const LIEUTENANT_DRILL: &str = "lieutenant_drill";
pub const DOCTOR_ROUNDS: &str = "doctor_rounds";
pub const CREWMAN_CHORE: &str = "crewman_chore";
pub const AMBIENT_FLICKER: &str = "ambient_flicker";
pub const LIGHTS_GRUMBLE: &str = "lights_grumble";
pub const WATCH_VIEWPORT: &str = "watch_viewport";

pub fn register(catalog: &mut ActionCatalog) {
    catalog.register(ActionTemplate {
        id: CAPTAIN_LOG,
        target: TargetRule::None,
        applicability: |actor, _| actor.role == Role::Captain,
        weight: command_weight,
        render: render_captain_log,
    });
    catalog.register(ActionTemplate {
        id: LIEUTENANT_DRILL,
        target: TargetRule::None,
        applicability: |actor, _| actor.role == Role::Lieutenant,
        weight: duty_weight,
        render: render_lieutenant_drill,
    });
    catalog.register(ActionTemplate {
        id: DOCTOR_ROUNDS,
        target: TargetRule::None,
        applicability: |actor, _| actor.role == Role::Doctor,
        weight: duty_weight,
        render: render_doctor_rounds,
    });
    catalog.register(ActionTemplate {
        id: CREWMAN_CHORE,
        target: TargetRule::None,
        applicability: |actor, _| actor.role == Role::Crewman,
        weight: duty_weight,
        render: render_crewman_chore,
    });
    catalog.register(ActionTemplate {
        id: AMBIENT_FLICKER,
        target: TargetRule::None,
        applicability: |_, world| world.get_fact(facts::DECK_LIGHTS).is_none(),
        weight: ambience_weight,
        render: render_ambient_flicker,
    });
    catalog.register(ActionTemplate {
        id: LIGHTS_GRUMBLE,
        target: TargetRule::None,
        applicability: |_, world| world.get_fact(facts::DECK_LIGHTS).is_some(),
        weight: ambience_weight,
        render: render_lights_grumble,
    });
    // Catch-all: applicable to everyone, always positive weight. The roster
    // guarantee that some scripted action exists rests on this template.
    catalog.register(ActionTemplate {
        id: WATCH_VIEWPORT,
        target: TargetRule::None,
        applicability: |_, _| true,
        weight: |_, _, weights| weights.catch_all_base.max(0.01),
        render: render_watch_viewport,
    });
}

fn duty_weight(actor: &Actor, _world: &WorldState, weights: &Weights) -> f32 {
    let mut weight = weights.duty_base;
    if actor.has_trait("dutiful") {
        weight += weights.dutiful_duty_bonus;
    }
    weight
}

fn command_weight(actor: &Actor, _world: &WorldState, weights: &Weights) -> f32 {
    let mut weight = weights.command_base;
    if actor.has_trait("dutiful") {
        weight += weights.dutiful_duty_bonus;
    }
    weight
}

fn ambience_weight(_actor: &Actor, _world: &WorldState, weights: &Weights) -> f32 {
    weights.ambience_base
}

fn render_captain_log(ctx: &mut RenderCtx) -> Rendered {
    let action = pick(
        ctx.rng,
        &[
            "reviews the duty roster on the bridge, initialing each name with a steady hand",
            "dictates a terse entry into the ship's log",
            "studies the long-range charts projected over the command table",
        ],
    );
    Rendered::line(format!("{} {}.", ctx.actor.name, action)).with_tag("duty")
}

fn render_lieutenant_drill(ctx: &mut RenderCtx) -> Rendered {
    let action = pick(
        ctx.rng,
        &[
            "walks the lower decks checking pressure seals nobody reported",
            "runs an unannounced readiness drill on the gunnery stations",
            "double-checks the watch rotation before sending it up to the bridge",
        ],
    );
    Rendered::line(format!("{} {}.", ctx.actor.name, action)).with_tag("duty")
}

fn render_doctor_rounds(ctx: &mut RenderCtx) -> Rendered {
    let action = pick(
        ctx.rng,
        &[
            "takes inventory of sickbay's dwindling analgesics",
            "updates crew medical files nobody else will ever read",
            "sterilizes a tray of instruments that were already sterile",
        ],
    );
    Rendered::line(format!("{} {}.", ctx.actor.name, action)).with_tag("duty")
}

fn render_crewman_chore(ctx: &mut RenderCtx) -> Rendered {
    let action = pick(
        ctx.rng,
        &[
            "scrubs scorch marks off the deck plating outside engineering",
            "recalibrates an air recycler that has been humming off-key for days",
            "restacks ration crates that shifted during the last burn",
            "patches a frayed conduit with more tape than regulation allows",
        ],
    );
    Rendered::line(format!("{} {}.", ctx.actor.name, action)).with_tag("duty")
}

fn render_ambient_flicker(ctx: &mut RenderCtx) -> Rendered {
    Rendered::line(format!(
        "{} pauses mid-stride as the deck lights stutter overhead before settling into an uneasy flicker.",
        ctx.actor.name
    ))
    .with_fact(facts::DECK_LIGHTS, "flickering")
    .with_tag("ambient")
}

fn render_lights_grumble(ctx: &mut RenderCtx) -> Rendered {
    let state = ctx
        .world
        .get_fact(facts::DECK_LIGHTS)
        .unwrap_or("flickering");
    let action = pick(
        ctx.rng,
        &[
            "frowns up at the deck lights",
            "files yet another maintenance ticket about the deck lights",
        ],
    );
    Rendered::line(format!(
        "{} {}, still {} since earlier.",
        ctx.actor.name, action, state
    ))
    .with_tag("ambient")
    .with_tag("reaction")
}

fn render_watch_viewport(ctx: &mut RenderCtx) -> Rendered {
    let action = pick(
        ctx.rng,
        &[
            "takes a quiet moment to watch the stars drift past the viewport",
            "leans against a bulkhead and lets the engine hum fill the silence",
        ],
    );
    Rendered::line(format!("{} {}.", ctx.actor.name, action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn actor(role: Role) -> Actor {
        Actor::new(
            format!("{} Renard", role.title()),
            role,
            vec!["dutiful".to_string()],
            "",
            vec![],
            vec![],
            4,
        )
    }

    #[test]
    fn test_role_templates_apply_to_their_role_only() {
        let mut catalog = ActionCatalog::empty();
        register(&mut catalog);
        let world = WorldState::new();

        let captain = actor(Role::Captain);
        let crewman = actor(Role::Crewman);

        let log = catalog.get(CAPTAIN_LOG).unwrap();
        assert!((log.applicability)(&captain, &world));
        assert!(!(log.applicability)(&crewman, &world));

        let chore = catalog.get(CREWMAN_CHORE).unwrap();
        assert!((chore.applicability)(&crewman, &world));
        assert!(!(chore.applicability)(&captain, &world));
    }

    #[test]
    fn test_dutiful_trait_raises_duty_weight() {
        let world = WorldState::new();
        let weights = Weights::default();

        let dutiful = actor(Role::Crewman);
        let plain = Actor::new("Crewman Sonny", Role::Crewman, vec![], "", vec![], vec![], 4);

        assert!(
            duty_weight(&dutiful, &world, &weights) > duty_weight(&plain, &world, &weights)
        );
    }

    #[test]
    fn test_flicker_sets_fact_and_grumble_reads_it() {
        let mut catalog = ActionCatalog::empty();
        register(&mut catalog);
        let mut world = WorldState::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let crewman = actor(Role::Crewman);

        let flicker = catalog.get(AMBIENT_FLICKER).unwrap();
        assert!((flicker.applicability)(&crewman, &world));
        let rendered = (flicker.render)(&mut RenderCtx {
            actor: &crewman,
            world: &world,
            target: None,
            rng: &mut rng,
        });
        for (key, value) in rendered.facts {
            world.set_fact(key, value);
        }

        // Now the grumble applies and the flicker no longer does
        let grumble = catalog.get(LIGHTS_GRUMBLE).unwrap();
        assert!((grumble.applicability)(&crewman, &world));
        assert!(!(flicker.applicability)(&crewman, &world));

        let rendered = (grumble.render)(&mut RenderCtx {
            actor: &crewman,
            world: &world,
            target: None,
            rng: &mut rng,
        });
        assert!(rendered.text.contains("flickering"));
    }

    #[test]
    fn test_renders_mention_the_actor() {
        let mut catalog = ActionCatalog::empty();
        register(&mut catalog);
        let world = WorldState::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let doctor = actor(Role::Doctor);

        let rounds = catalog.get(DOCTOR_ROUNDS).unwrap();
        let rendered = (rounds.render)(&mut RenderCtx {
            actor: &doctor,
            world: &world,
            target: None,
            rng: &mut rng,
        });
        assert!(rendered.text.starts_with("Doctor Renard"));
        assert!(rendered.text.ends_with('.'));
    }
}
