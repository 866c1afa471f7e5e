//! Social Templates
//!
//! Actions that need a second actor: greetings, command interactions, the
//! doctor calling someone in, and reacting to whatever happened last turn.

use super::{pick, ActionCatalog, ActionTemplate, RenderCtx, Rendered, TargetRule};
use crate::components::actor::{Actor, Role};
use crate::components::world::WorldState;
use crate::config::Weights;

pub const ACKNOWLEDGE_CREWMATE: &str = "acknowledge_crewmate";
pub const CAPTAIN_COMMEND: &str = "captain_commend";
pub const DOCTOR_SUMMONS: &str = "doctor_summons";
pub const REACT_TO_LAST: &str = "react_to_last";

pub fn register(catalog: &mut ActionCatalog) {
    catalog.register(ActionTemplate {
        id: ACKNOWLEDGE_CREWMATE,
        target: TargetRule::RandomOther,
        applicability: |_, _| true,
        weight: social_weight,
        render: render_acknowledge,
    });
    catalog.register(ActionTemplate {
        id: CAPTAIN_COMMEND,
        target: TargetRule::RandomOther,
        applicability: |actor, _| actor.role == Role::Captain,
        weight: |_, _, weights| weights.command_base,
        render: render_commend,
    });
    catalog.register(ActionTemplate {
        id: DOCTOR_SUMMONS,
        target: TargetRule::RandomOther,
        applicability: |actor, _| actor.role == Role::Doctor,
        weight: sickbay_weight,
        render: render_summons,
    });
    catalog.register(ActionTemplate {
        id: REACT_TO_LAST,
        target: TargetRule::LastActor,
        applicability: |actor, world| {
            world
                .last_record()
                .map(|last| last.actor_id != actor.id)
                .unwrap_or(false)
        },
        weight: |_, _, weights| weights.reaction_base,
        render: render_react,
    });
}

fn social_weight(actor: &Actor, _world: &WorldState, weights: &Weights) -> f32 {
    let mut weight = weights.social_base;
    if actor.has_trait("gregarious") {
        weight += weights.gregarious_social_bonus;
    }
    weight
}

fn sickbay_weight(actor: &Actor, _world: &WorldState, weights: &Weights) -> f32 {
    let mut weight = weights.sickbay_base;
    if actor.has_trait("anxious") {
        weight += weights.anxious_sickbay_bonus;
    }
    weight
}

fn target_name(ctx: &RenderCtx) -> String {
    match ctx.target {
        Some(target) => target.name.clone(),
        None => "a passing crewmate".to_string(),
    }
}

fn render_acknowledge(ctx: &mut RenderCtx) -> Rendered {
    let target = target_name(ctx);
    let action = pick(
        ctx.rng,
        &[
            "trades a few words with",
            "nods to",
            "shares a flask of bitter coffee with",
            "swaps rumors from the last port with",
        ],
    );
    Rendered::line(format!("{} {} {} in the corridor.", ctx.actor.name, action, target))
        .with_tag("social")
}

fn render_commend(ctx: &mut RenderCtx) -> Rendered {
    let target = target_name(ctx);
    let text = match pick(ctx.rng, &["commend", "order"]) {
        "commend" => format!(
            "{} acknowledges the diligence of {} in front of the duty watch.",
            ctx.actor.name, target
        ),
        _ => format!(
            "{} orders {} to run a full diagnostic on the forward sensor array.",
            ctx.actor.name, target
        ),
    };
    Rendered::line(text).with_tag("social").with_tag("command")
}

fn render_summons(ctx: &mut RenderCtx) -> Rendered {
    let target = target_name(ctx);
    let reason = pick(
        ctx.rng,
        &[
            "an overdue physical",
            "a follow-up on last cycle's radiation badges",
            "a look at that cough everyone pretends not to hear",
        ],
    );
    Rendered::line(format!(
        "{} summons {} to sickbay for {}.",
        ctx.actor.name, target, reason
    ))
    .with_tag("social")
    .with_tag("location:sickbay")
}

fn render_react(ctx: &mut RenderCtx) -> Rendered {
    let last = ctx.world.last_record();
    let (who, what) = match last {
        Some(record) => (record.actor_name.clone(), record.text.clone()),
        None => ("someone".to_string(), String::new()),
    };
    let text = if what.is_empty() {
        format!("{} glances around, sure something just happened.", ctx.actor.name)
    } else {
        let action = pick(
            ctx.rng,
            &[
                "raises an eyebrow at",
                "mutters something under their breath about",
                "makes a mental note of",
            ],
        );
        format!("{} {} what {} just did.", ctx.actor.name, action, who)
    };
    Rendered::line(text).with_tag("reaction")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::actor::ActorId;
    use crate::components::world::TurnRecord;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn actor(name: &str, role: Role, traits: Vec<&str>) -> Actor {
        Actor::new(
            name,
            role,
            traits.into_iter().map(String::from).collect(),
            "",
            vec![],
            vec![],
            4,
        )
    }

    #[test]
    fn test_gregarious_trait_raises_social_weight() {
        let world = WorldState::new();
        let weights = Weights::default();
        let chatty = actor("Crewman Sonny", Role::Crewman, vec!["gregarious"]);
        let quiet = actor("Crewman Claire", Role::Crewman, vec![]);

        assert!(
            social_weight(&chatty, &world, &weights) > social_weight(&quiet, &world, &weights)
        );
    }

    #[test]
    fn test_commend_mentions_both_parties() {
        let captain = actor("Captain Renard", Role::Captain, vec![]);
        let target = actor("Crewman Sonny", Role::Crewman, vec![]);
        let world = WorldState::new();
        let mut rng = SmallRng::seed_from_u64(9);

        let rendered = render_commend(&mut RenderCtx {
            actor: &captain,
            world: &world,
            target: Some(&target),
            rng: &mut rng,
        });
        assert!(rendered.text.contains("Captain Renard"));
        assert!(rendered.text.contains("Crewman Sonny"));
    }

    #[test]
    fn test_react_requires_someone_else_acted_last() {
        let mut catalog = ActionCatalog::empty();
        register(&mut catalog);
        let template = catalog.get(REACT_TO_LAST).unwrap();

        let reactor = actor("Crewman Claire", Role::Crewman, vec![]);
        let mut world = WorldState::new();

        // Empty history: nothing to react to
        assert!(!(template.applicability)(&reactor, &world));

        world.append_turn(TurnRecord {
            turn: 0,
            actor_id: ActorId::new(),
            actor_name: "Crewman Sonny".to_string(),
            text: "Crewman Sonny scrubs the deck.".to_string(),
            generative: false,
            tags: vec![],
        });
        assert!((template.applicability)(&reactor, &world));

        // An actor never reacts to their own last action
        world.append_turn(TurnRecord {
            turn: 1,
            actor_id: reactor.id,
            actor_name: reactor.name.clone(),
            text: "Crewman Claire checks a gauge.".to_string(),
            generative: false,
            tags: vec![],
        });
        assert!(!(template.applicability)(&reactor, &world));
    }

    #[test]
    fn test_react_names_the_previous_actor() {
        let reactor = actor("Crewman Claire", Role::Crewman, vec![]);
        let mut world = WorldState::new();
        world.append_turn(TurnRecord {
            turn: 0,
            actor_id: ActorId::new(),
            actor_name: "Crewman Sonny".to_string(),
            text: "Crewman Sonny scrubs the deck.".to_string(),
            generative: false,
            tags: vec![],
        });

        let mut rng = SmallRng::seed_from_u64(4);
        let rendered = render_react(&mut RenderCtx {
            actor: &reactor,
            world: &world,
            target: None,
            rng: &mut rng,
        });
        assert!(rendered.text.contains("Crewman Sonny"));
        assert!(rendered.tags.contains(&"reaction".to_string()));
    }
}
