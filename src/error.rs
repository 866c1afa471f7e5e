//! Error Types
//!
//! Failure taxonomy for the turn engine. Provider and selection failures are
//! absorbed inside the engine; only bad external requests (unknown actor ids)
//! reach the caller.

use std::time::Duration;

use thiserror::Error;

use crate::components::actor::ActorId;

/// Errors surfaced by the simulation API.
#[derive(Debug, Clone, Error)]
pub enum SimError {
    /// The caller asked about an actor id that is not in the roster.
    #[error("unknown actor id: {0}")]
    ActorNotFound(ActorId),

    /// External text generation failed. Recovered internally, never returned
    /// from `next_turn`.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// No scripted template was applicable for the acting actor. Internal
    /// only; the engine replaces it with a no-op record.
    #[error("no applicable scripted action for {0}")]
    NoApplicableAction(String),
}

/// Errors from the external text-generation collaborator.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The call did not complete within the configured deadline.
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    /// The provider returned text the engine cannot use.
    #[error("provider returned unusable output: {0}")]
    InvalidOutput(String),

    /// The provider reported a failure of its own.
    #[error("provider failed: {0}")]
    Failed(String),

    /// The provider worker thread is gone.
    #[error("provider worker disconnected")]
    Disconnected,
}
