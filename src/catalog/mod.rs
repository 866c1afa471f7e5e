//! Action Catalog
//!
//! Registry of scripted action templates. Each template pairs an
//! applicability predicate and a weight function with a pure render function
//! that turns a choice into one narrative line plus the world effects the
//! engine applies afterwards.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::actor::Actor;
use crate::components::world::WorldState;
use crate::config::Weights;

pub mod duties;
pub mod mess_hall;
pub mod social;

/// How a template that needs a second actor finds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRule {
    /// Solo action, no target
    None,
    /// Any other roster member, chosen uniformly
    RandomOther,
    /// Whoever produced the most recent history record (skipping self)
    LastActor,
}

/// Inputs to a template's render function.
pub struct RenderCtx<'a> {
    pub actor: &'a Actor,
    pub world: &'a WorldState,
    pub target: Option<&'a Actor>,
    /// Seeded engine RNG, used only for phrasing variety
    pub rng: &'a mut SmallRng,
}

/// Output of a render: the line itself plus fact writes and tags for the
/// engine to apply. Render functions mutate nothing themselves.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub text: String,
    pub facts: Vec<(String, String)>,
    pub tags: Vec<String>,
}

impl Rendered {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_fact(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.facts.push((key.into(), value.into()));
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

pub type Applicability = fn(&Actor, &WorldState) -> bool;
pub type WeightFn = fn(&Actor, &WorldState, &Weights) -> f32;
pub type RenderFn = fn(&mut RenderCtx) -> Rendered;

/// A predefined, weighted, pure-rendering behavior.
#[derive(Debug, Clone, Copy)]
pub struct ActionTemplate {
    pub id: &'static str,
    pub target: TargetRule,
    pub applicability: Applicability,
    pub weight: WeightFn,
    pub render: RenderFn,
}

/// Resource: all scripted action templates.
#[derive(Resource, Debug, Default)]
pub struct ActionCatalog {
    templates: Vec<ActionTemplate>,
}

impl ActionCatalog {
    /// The full shipboard template set, including the always-applicable
    /// viewport catch-all.
    pub fn standard() -> Self {
        let mut catalog = Self::default();
        duties::register(&mut catalog);
        mess_hall::register(&mut catalog);
        social::register(&mut catalog);
        catalog
    }

    /// An empty catalog, useful for exercising the fallback paths.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn register(&mut self, template: ActionTemplate) {
        self.templates.push(template);
    }

    pub fn templates(&self) -> &[ActionTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&ActionTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Pick one phrasing variant from a non-empty list.
pub(crate) fn pick<'a>(rng: &mut SmallRng, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}
