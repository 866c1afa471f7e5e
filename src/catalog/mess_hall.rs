//! Mess Hall Templates
//!
//! The food-quality causal chain: the first visit passes loud judgment on the
//! beef and records it as a shared fact, later visits reference that verdict
//! by name.

use super::{pick, ActionCatalog, ActionTemplate, RenderCtx, Rendered, TargetRule};
use crate::components::actor::Actor;
use crate::components::world::{facts, WorldState};
use crate::config::Weights;

pub const MESS_HALL_VISIT: &str = "mess_hall_visit";

const QUALITIES: &[&str] = &["lukewarm", "stringy", "over-salted", "suspiciously gray"];

pub fn register(catalog: &mut ActionCatalog) {
    catalog.register(ActionTemplate {
        id: MESS_HALL_VISIT,
        target: TargetRule::None,
        applicability: |_, _| true,
        weight: mess_weight,
        render: render_visit,
    });
}

fn mess_weight(actor: &Actor, _world: &WorldState, weights: &Weights) -> f32 {
    let mut weight = weights.mess_hall_base;
    if actor.has_trait("cynical") {
        weight += weights.cynical_mess_bonus;
    }
    weight
}

fn render_visit(ctx: &mut RenderCtx) -> Rendered {
    match ctx.world.get_fact(facts::MESS_HALL_QUALITY) {
        Some(quality) => {
            let quality = quality.to_string();
            let critic = ctx
                .world
                .get_fact(facts::MESS_HALL_CRITIC)
                .unwrap_or("the cook")
                .to_string();
            let text = match pick(ctx.rng, &["hope", "confirm"]) {
                "hope" => format!(
                    "{} heads to the mess hall, hoping the beef isn't as {} as {} made it sound.",
                    ctx.actor.name, quality, critic
                ),
                _ => format!(
                    "{} pokes at a tray of beef in the mess hall; {} wasn't wrong about it being {}.",
                    ctx.actor.name, critic, quality
                ),
            };
            Rendered::line(text)
                .with_tag("location:mess_hall")
                .with_tag("mentions:beef")
        }
        None => {
            let quality = pick(ctx.rng, QUALITIES);
            Rendered::line(format!(
                "{} queues up in the mess hall and declares the beef {}, loud enough for the whole table to hear.",
                ctx.actor.name, quality
            ))
            .with_fact(facts::MESS_HALL_QUALITY, quality)
            .with_fact(facts::MESS_HALL_CRITIC, ctx.actor.name.clone())
            .with_tag("location:mess_hall")
            .with_tag("mentions:beef")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::actor::Role;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn crewman(name: &str) -> Actor {
        Actor::new(name, Role::Crewman, vec![], "", vec![], vec![], 4)
    }

    #[test]
    fn test_first_visit_establishes_the_fact() {
        let mut world = WorldState::new();
        let mut rng = SmallRng::seed_from_u64(11);
        let sonny = crewman("Crewman Sonny");

        let rendered = render_visit(&mut RenderCtx {
            actor: &sonny,
            world: &world,
            target: None,
            rng: &mut rng,
        });

        let quality = rendered
            .facts
            .iter()
            .find(|(k, _)| k == facts::MESS_HALL_QUALITY)
            .map(|(_, v)| v.clone())
            .expect("first visit records the quality");
        assert!(rendered.text.contains(&quality));
        assert!(rendered
            .facts
            .iter()
            .any(|(k, v)| k == facts::MESS_HALL_CRITIC && v == "Crewman Sonny"));

        for (key, value) in rendered.facts {
            world.set_fact(key, value);
        }
        assert_eq!(
            world.get_fact(facts::MESS_HALL_QUALITY),
            Some(quality.as_str())
        );
    }

    #[test]
    fn test_later_visit_references_the_recorded_verdict() {
        let mut world = WorldState::new();
        world.set_fact(facts::MESS_HALL_QUALITY, "lukewarm");
        world.set_fact(facts::MESS_HALL_CRITIC, "Crewman Sonny");

        let mut rng = SmallRng::seed_from_u64(2);
        let claire = crewman("Crewman Claire");

        let rendered = render_visit(&mut RenderCtx {
            actor: &claire,
            world: &world,
            target: None,
            rng: &mut rng,
        });

        assert!(rendered.text.contains("lukewarm"));
        assert!(rendered.text.contains("Crewman Sonny"));
        assert!(rendered.facts.is_empty());
        assert!(rendered.tags.contains(&"mentions:beef".to_string()));
    }

    #[test]
    fn test_cynical_trait_raises_weight() {
        let world = WorldState::new();
        let weights = Weights::default();
        let cynic = Actor::new(
            "Crewman Moreau",
            Role::Crewman,
            vec!["cynical".to_string()],
            "",
            vec![],
            vec![],
            4,
        );
        let plain = crewman("Crewman Sonny");

        assert!(mess_weight(&cynic, &world, &weights) > mess_weight(&plain, &world, &weights));
    }
}
