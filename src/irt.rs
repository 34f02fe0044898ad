//! Item Response Theory.
//!
//! Three-parameter logistic model:
//!
//! ```text
//! p(correct | skill, a, b, c) = c + (1 - c) / (1 + exp(a * (b - skill)))
//! ```
//!
//! `a` is the discrimination (slope of the curve), `b` the question
//! difficulty and `c` the probability of a lucky guess. The curve is bounded
//! below by `c` and above by `1.0`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

pub const DEFAULT_DISCRIMINATION: f64 = 1.0;
pub const DEFAULT_GUESSING: f64 = 0.25;

/// Probability that a student with `skill` answers a question of difficulty
/// `b` correctly.
#[must_use]
pub fn p_correct(skill: f64, a: f64, b: f64, c: f64) -> f64 {
    c + (1.0 - c) / (1.0 + (a * (b - skill)).exp())
}

/// Multi-concept variant: the weakest relevant skill gates the answer.
pub fn p_correct_multi(skills: &[f64], b: f64, a: f64, c: f64) -> Result<f64> {
    let weakest = weakest_skill(skills)?;
    Ok(p_correct(weakest, a, b, c))
}

fn weakest_skill(skills: &[f64]) -> Result<f64> {
    let (first, rest) = skills.split_first().ok_or_else(|| {
        SimError::InvalidArgument("at least one skill is required".to_string())
    })?;
    Ok(rest.iter().copied().fold(*first, f64::min))
}

/// Item parameters shared by every question in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrtParams {
    pub discrimination: f64,
    pub guessing: f64,
}

impl Default for IrtParams {
    fn default() -> Self {
        Self {
            discrimination: DEFAULT_DISCRIMINATION,
            guessing: DEFAULT_GUESSING,
        }
    }
}

impl IrtParams {
    #[must_use]
    pub fn p_correct(&self, skill: f64, difficulty: f64) -> f64 {
        p_correct(skill, self.discrimination, difficulty, self.guessing)
    }

    pub fn p_correct_multi(&self, skills: &[f64], difficulty: f64) -> Result<f64> {
        p_correct_multi(skills, difficulty, self.discrimination, self.guessing)
    }
}
