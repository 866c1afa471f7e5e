//! Turn Systems
//!
//! The per-turn selection pipeline, run as a chained schedule:
//! candidate generation, weight noise, then weighted selection.

pub mod candidates;
pub mod generative;
pub mod select;

pub use candidates::{generate_candidates, ActingActor, CandidateActions, WeightedCandidate};
pub use generative::{build_prompt, GenerativeClient, NullProvider, TextProvider};
pub use select::{
    add_weight_noise, select_action, SelectedAction, SelectionOutcome, SelectorParams,
};
