//! Exploration-rate schedules.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

pub const DEFAULT_EPSILON: f64 = 0.1;

/// Epsilon as a function of the agent's step count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schedule", rename_all = "kebab-case")]
pub enum EpsilonSchedule {
    /// Fixed exploration rate.
    Constant { epsilon: f64 },
    /// `scale / step`, capped at 1.
    InverseStep { scale: f64 },
    /// `start * decay^step`, never below `floor`.
    Exponential { start: f64, decay: f64, floor: f64 },
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self::Constant {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl EpsilonSchedule {
    /// Exploration probability at `step`, clamped to `[0, 1]`.
    #[must_use]
    pub fn value(&self, step: u64) -> f64 {
        let raw = match *self {
            Self::Constant { epsilon } => epsilon,
            Self::InverseStep { scale } => scale / step.max(1) as f64,
            Self::Exponential { start, decay, floor } => {
                let exponent = i32::try_from(step).unwrap_or(i32::MAX);
                (start * decay.powi(exponent)).max(floor)
            }
        };
        raw.clamp(0.0, 1.0)
    }

    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            Self::Constant { epsilon } => (0.0..=1.0).contains(&epsilon),
            Self::InverseStep { scale } => scale.is_finite() && scale >= 0.0,
            Self::Exponential { start, decay, floor } => {
                (0.0..=1.0).contains(&start)
                    && (0.0..=1.0).contains(&decay)
                    && (0.0..=1.0).contains(&floor)
            }
        };
        if ok {
            Ok(())
        } else {
            Err(SimError::Config(format!("invalid epsilon schedule {self:?}")))
        }
    }
}
