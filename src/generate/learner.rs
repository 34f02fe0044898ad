//! Learner profiles: VARK learning-style vectors and skill vectors.
//!
//! VARK splits learning preference into Visual, Aural, Reading/writing and
//! Kinesthetic. A [`LearnerStyle`] stores one non-negative weight per
//! category; the weights always sum to one.
//!
//! The mixture sampler follows the population shares reported in validation
//! studies of the VARK questionnaire: about 30% of respondents have a single
//! preferred style and about 36% use all four.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SimError};

use super::standard_normal;

pub const N_LEARNING_STYLES: usize = 4;

const ONE_STYLE_SHARE: f64 = 0.297;
const FOUR_STYLE_SHARE: f64 = 0.358;
const TWO_STYLE_SHARE: f64 = (1.0 - ONE_STYLE_SHARE - FOUR_STYLE_SHARE) / 2.0;
const THREE_STYLE_SHARE: f64 = (1.0 - ONE_STYLE_SHARE - FOUR_STYLE_SHARE) / 2.0;

const MIXTURE_FLOOR: f64 = 0.001;
const NORMALIZATION_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarkStyle {
    Visual,
    Aural,
    ReadWrite,
    Kinesthetic,
}

impl VarkStyle {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Visual, Self::Aural, Self::ReadWrite, Self::Kinesthetic]
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Visual => 0,
            Self::Aural => 1,
            Self::ReadWrite => 2,
            Self::Kinesthetic => 3,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Aural => "aural",
            Self::ReadWrite => "read_write",
            Self::Kinesthetic => "kinesthetic",
        }
    }
}

/// Normalized preference weights over the four VARK styles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; N_LEARNING_STYLES]")]
pub struct LearnerStyle([f64; N_LEARNING_STYLES]);

impl TryFrom<[f64; N_LEARNING_STYLES]> for LearnerStyle {
    type Error = SimError;

    fn try_from(weights: [f64; N_LEARNING_STYLES]) -> Result<Self> {
        Self::from_weights(weights)
    }
}

impl LearnerStyle {
    /// A learner with a single dominant style.
    #[must_use]
    pub fn one_hot(style: VarkStyle) -> Self {
        let mut weights = [0.0; N_LEARNING_STYLES];
        weights[style.index()] = 1.0;
        Self(weights)
    }

    /// Validate explicit weights: non-negative, finite and summing to one.
    pub fn from_weights(weights: [f64; N_LEARNING_STYLES]) -> Result<Self> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SimError::InvalidArgument(format!(
                "learning style weights must be finite and non-negative: {weights:?}"
            )));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(SimError::InvalidArgument(format!(
                "learning style weights must sum to 1, got {total}"
            )));
        }
        Ok(Self(weights))
    }

    fn normalized(weights: [f64; N_LEARNING_STYLES]) -> Self {
        let total: f64 = weights.iter().sum();
        Self(weights.map(|w| w / total))
    }

    #[must_use]
    pub fn weight(&self, style_idx: usize) -> Option<f64> {
        self.0.get(style_idx).copied()
    }

    #[must_use]
    pub const fn weights(&self) -> &[f64; N_LEARNING_STYLES] {
        &self.0
    }

    /// Index of the strongest style. Ties go to the lowest index.
    #[must_use]
    pub fn dominant(&self) -> usize {
        let mut best = 0;
        for (i, w) in self.0.iter().enumerate().skip(1) {
            if *w > self.0[best] {
                best = i;
            }
        }
        best
    }

    /// Number of styles with non-zero weight.
    #[must_use]
    pub fn active_styles(&self) -> usize {
        self.0.iter().filter(|w| **w > 0.0).count()
    }
}

/// Strategy for sampling learning styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylePolicy {
    /// Exactly one style, chosen uniformly.
    #[default]
    OneHot,
    /// One to four styles with population shares from the VARK literature.
    VarkMixture,
}

impl std::str::FromStr for StylePolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "one-hot" | "one_hot" | "onehot" => Ok(Self::OneHot),
            "vark-mixture" | "vark_mixture" | "mixture" => Ok(Self::VarkMixture),
            _ => Err(SimError::Config(format!(
                "invalid style policy {s} (expected one-hot|vark-mixture)"
            ))),
        }
    }
}

/// Samples learning styles, average skills and per-concept skills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfileGenerator {
    pub style_policy: StylePolicy,
    /// Shift applied to the standard-normal average skill. Negative values
    /// model a weaker population.
    pub skill_bias: f64,
}

impl Default for LearnerProfileGenerator {
    fn default() -> Self {
        Self {
            style_policy: StylePolicy::OneHot,
            skill_bias: 0.0,
        }
    }
}

impl LearnerProfileGenerator {
    #[must_use]
    pub const fn new(style_policy: StylePolicy, skill_bias: f64) -> Self {
        Self {
            style_policy,
            skill_bias,
        }
    }

    pub fn sample_learning_style<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<LearnerStyle> {
        match self.style_policy {
            StylePolicy::OneHot => Ok(sample_one_hot(rng)),
            StylePolicy::VarkMixture => sample_vark_mixture(rng),
        }
    }

    pub fn sample_average_skill<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        standard_normal(rng) + self.skill_bias
    }

    /// Per-concept skills drawn as `N(avg_skill, 1)`.
    pub fn sample_skill_vector<R: Rng + ?Sized>(
        &self,
        n_concepts: usize,
        avg_skill: f64,
        rng: &mut R,
    ) -> Vec<f64> {
        self.sample_skill_vector_with(n_concepts, avg_skill, rng, |avg, _, rng| {
            avg + standard_normal(rng)
        })
    }

    /// Per-concept skills from a custom `(avg_skill, concept_idx, rng)` policy.
    pub fn sample_skill_vector_with<R, F>(
        &self,
        n_concepts: usize,
        avg_skill: f64,
        rng: &mut R,
        mut per_concept: F,
    ) -> Vec<f64>
    where
        R: Rng + ?Sized,
        F: FnMut(f64, usize, &mut R) -> f64,
    {
        (0..n_concepts)
            .map(|concept| per_concept(avg_skill, concept, rng))
            .collect()
    }
}

fn sample_one_hot<R: Rng + ?Sized>(rng: &mut R) -> LearnerStyle {
    let style = VarkStyle::all()[rng.random_range(0..N_LEARNING_STYLES)];
    LearnerStyle::one_hot(style)
}

fn sample_vark_mixture<R: Rng + ?Sized>(rng: &mut R) -> Result<LearnerStyle> {
    let draw: f64 = rng.random();
    let mut cumulative = 0.0;
    for (active, share) in [
        (1, ONE_STYLE_SHARE),
        (2, TWO_STYLE_SHARE),
        (3, THREE_STYLE_SHARE),
        (4, FOUR_STYLE_SHARE),
    ] {
        cumulative += share;
        if draw < cumulative {
            trace!(active, "sampled mixed learning style");
            return Ok(if active == 1 {
                sample_one_hot(rng)
            } else {
                mixed_weights(active, rng)
            });
        }
    }
    Err(SimError::InvalidState(format!(
        "style draw {draw} exceeded cumulative population share {cumulative}"
    )))
}

fn mixed_weights<R: Rng + ?Sized>(active: usize, rng: &mut R) -> LearnerStyle {
    let mut weights = [0.0; N_LEARNING_STYLES];
    for w in &mut weights {
        *w = (standard_normal(rng) + 1.0).max(0.0) + MIXTURE_FLOOR;
    }
    let inactive = N_LEARNING_STYLES - active;
    for idx in rand::seq::index::sample(rng, N_LEARNING_STYLES, inactive).into_vec() {
        weights[idx] = 0.0;
    }
    LearnerStyle::normalized(weights)
}
