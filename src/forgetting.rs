//! Forgetting models applied between teaching steps.
//!
//! Only [`ForgettingModel::None`] is implemented. The named curves are
//! selectable so configurations can refer to them, but applying one fails
//! instead of silently leaving skills unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::student::Student;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForgettingModel {
    #[default]
    None,
    ExponentialCurve,
    HalfLifeRegression,
    GeneralizedPowerLaw,
    WienerProcess,
}

impl ForgettingModel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ExponentialCurve => "exponential-curve",
            Self::HalfLifeRegression => "half-life-regression",
            Self::GeneralizedPowerLaw => "generalized-power-law",
            Self::WienerProcess => "wiener-process",
        }
    }

    #[must_use]
    pub const fn is_implemented(self) -> bool {
        matches!(self, Self::None)
    }

    /// Decay `student`'s skills after `elapsed_steps` steps without practice.
    pub fn apply(self, _student: &mut Student, _elapsed_steps: u64) -> Result<()> {
        match self {
            Self::None => Ok(()),
            other => Err(SimError::Config(format!(
                "forgetting model {} is not implemented",
                other.as_str()
            ))),
        }
    }
}

impl std::fmt::Display for ForgettingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ForgettingModel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "none" | "off" => Ok(Self::None),
            "exponential-curve" | "exponential" => Ok(Self::ExponentialCurve),
            "half-life-regression" | "hlr" => Ok(Self::HalfLifeRegression),
            "generalized-power-law" | "power-law" => Ok(Self::GeneralizedPowerLaw),
            "wiener-process" | "wiener" => Ok(Self::WienerProcess),
            _ => Err(SimError::Config(format!(
                "unknown forgetting model {s} (expected none|exponential-curve|\
                 half-life-regression|generalized-power-law|wiener-process)"
            ))),
        }
    }
}
