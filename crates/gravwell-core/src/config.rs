//! Runtime configuration. Defaults reproduce the standard two-player duel.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for round generation. Same seed = same arena.
    pub seed: u64,
    pub arena_width: f64,
    pub arena_height: f64,
    pub gravity_constant: f64,
    /// Tick deltas are clamped to `[0, max_delta_ms]`.
    pub max_delta_ms: f64,
    pub well_count: usize,
    /// Craft ignore gravity and never move.
    pub anchored_craft: bool,
    pub homing: HomingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            gravity_constant: GRAVITY_CONSTANT,
            max_delta_ms: MAX_TICK_DELTA_MS,
            well_count: WELL_COUNT,
            anchored_craft: true,
            homing: HomingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse a JSON config; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena_width > 0.0 && self.arena_width.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "arena_width",
                reason: "must be positive and finite",
            });
        }
        if !(self.arena_height > 0.0 && self.arena_height.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "arena_height",
                reason: "must be positive and finite",
            });
        }
        if !(self.gravity_constant > 0.0 && self.gravity_constant.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "gravity_constant",
                reason: "must be positive and finite",
            });
        }
        if !(self.max_delta_ms > 0.0 && self.max_delta_ms.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "max_delta_ms",
                reason: "must be positive and finite",
            });
        }
        Ok(())
    }

    /// Forward-simulation parameters consistent with the live gravity law.
    pub fn trajectory_params(&self) -> TrajectoryParams {
        TrajectoryParams {
            gravity_constant: self.gravity_constant,
            ..TrajectoryParams::default()
        }
    }
}

/// Homing planner switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomingConfig {
    /// Evaluate sample fans on the rayon pool.
    pub parallel: bool,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Forward-simulation parameters for trajectory evaluation and preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryParams {
    pub gravity_constant: f64,
    pub time_step_ms: f64,
    pub max_time_ms: f64,
}

impl Default for TrajectoryParams {
    fn default() -> Self {
        Self {
            gravity_constant: GRAVITY_CONSTANT,
            time_step_ms: TRAJECTORY_TIME_STEP_MS,
            max_time_ms: TRAJECTORY_MAX_TIME_MS,
        }
    }
}
