//! Population and question-bank generation.

pub mod learner;
pub mod questions;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

pub use learner::{
    LearnerProfileGenerator, LearnerStyle, N_LEARNING_STYLES, StylePolicy, VarkStyle,
};
pub use questions::{
    DifficultyPolicy, Question, QuestionGenerator, concept_table_difficulty, norm_inv_power_law,
};

pub(crate) fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}
