//! Configuration System
//!
//! Loads tuning parameters from tuning.toml for easy adjustment without recompiling.

use bevy_ecs::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub roster: RosterConfig,
    pub weights: Weights,
}

/// Turn engine parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Probability that a turn delegates to the generative provider even when
    /// scripted templates apply
    pub p_generative: f32,
    /// Deadline for one external provider call, in milliseconds
    pub provider_timeout_ms: u64,
    /// Generated lines longer than this are truncated
    pub max_generated_chars: usize,
    /// How many recent history records go into a generative prompt
    pub prompt_history_window: usize,
    /// How many events each actor remembers
    pub memory_capacity: usize,
    /// Turns a shared fact stays readable; 0 means forever
    pub fact_retention_turns: u64,
    /// Multiplicative noise applied to candidate weights (+/- fraction)
    pub weight_noise: f32,
}

impl EngineConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Fact retention window, `None` meaning facts never expire.
    pub fn fact_retention(&self) -> Option<u64> {
        (self.fact_retention_turns > 0).then_some(self.fact_retention_turns)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            p_generative: 0.15,
            provider_timeout_ms: 4000,
            max_generated_chars: 280,
            prompt_history_window: 5,
            memory_capacity: 12,
            fact_retention_turns: 0,
            weight_noise: 0.2,
        }
    }
}

/// Roster composition
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Number of rank-and-file crewmen spawned alongside the fixed officers
    pub crew_count: usize,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { crew_count: 5 }
    }
}

/// Action template weights
///
/// Base weight per template family plus trait-driven bonuses. Inserted as a
/// resource so the candidate systems can read it.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub duty_base: f32,
    pub mess_hall_base: f32,
    pub social_base: f32,
    pub command_base: f32,
    pub sickbay_base: f32,
    pub reaction_base: f32,
    pub ambience_base: f32,
    pub catch_all_base: f32,
    pub gregarious_social_bonus: f32,
    pub dutiful_duty_bonus: f32,
    pub anxious_sickbay_bonus: f32,
    pub cynical_mess_bonus: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            duty_base: 0.5,
            mess_hall_base: 0.35,
            social_base: 0.4,
            command_base: 0.45,
            sickbay_base: 0.3,
            reaction_base: 0.3,
            ambience_base: 0.2,
            catch_all_base: 0.15,
            gregarious_social_bonus: 0.3,
            dutiful_duty_bonus: 0.3,
            anxious_sickbay_bonus: 0.25,
            cynical_mess_bonus: 0.2,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_TUNING_PATH).unwrap_or_else(|e| {
            eprintln!("Warning: Could not load tuning.toml: {}. Using defaults.", e);
            Self::default()
        })
    }
}

/// Configuration error type
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
