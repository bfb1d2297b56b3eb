//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults come from [`crate::consts`];
//! a JSON file may override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay constants for one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Simulation steps per second
    pub tick_hz: u32,
    /// Velocity added every tick (pixels/tick²)
    pub gravity: f32,
    /// Velocity set by a jump (must be upward, i.e. negative)
    pub jump_impulse: f32,
    pub bird_x: f32,
    pub bird_size: f32,
    pub pipe_width: f32,
    /// Vertical size of the opening in every pipe
    pub pipe_gap: f32,
    /// Horizontal scroll per tick for pipes and trail
    pub pipe_speed: f32,
    pub spawn_lead: f32,
    pub gap_margin: f32,
    pub trail_capacity: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_hz: TICK_HZ,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            bird_x: BIRD_X,
            bird_size: BIRD_SIZE,
            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_speed: PIPE_SPEED,
            spawn_lead: PIPE_SPAWN_LEAD,
            gap_margin: GAP_MARGIN,
            trail_capacity: TRAIL_CAPACITY,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        };

        if self.tick_hz == 0 {
            return invalid("tick_hz", "must be at least 1");
        }
        if !(self.jump_impulse < 0.0) {
            return invalid("jump_impulse", "must be negative (upward)");
        }
        if !(self.gravity >= 0.0) {
            return invalid("gravity", "must not be negative");
        }
        for (field, value) in [
            ("bird_size", self.bird_size),
            ("pipe_width", self.pipe_width),
            ("pipe_gap", self.pipe_gap),
            ("pipe_speed", self.pipe_speed),
        ] {
            if !(value > 0.0) {
                return invalid(field, "must be positive");
            }
        }
        if !(self.gap_margin >= 0.0) {
            return invalid("gap_margin", "must not be negative");
        }
        Ok(())
    }

    /// Milliseconds between ticks
    pub fn tick_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.tick_hz)
    }
}
