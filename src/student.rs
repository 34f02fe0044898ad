//! Simulated students.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::generate::{LearnerProfileGenerator, LearnerStyle, Question};
use crate::irt::IrtParams;

pub const DEFAULT_DELTA_SCALE: f64 = 0.2;

/// Outcome of posing a question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub is_correct: bool,
    pub p_correct: f64,
}

/// A learner with a fixed learning style and mutable per-concept skills.
///
/// `Clone` is a deep copy; the initial population is cloned at every reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    learner_style: LearnerStyle,
    avg_skill: f64,
    skills: Vec<f64>,
}

impl Student {
    #[must_use]
    pub const fn new(learner_style: LearnerStyle, avg_skill: f64, skills: Vec<f64>) -> Self {
        Self {
            learner_style,
            avg_skill,
            skills,
        }
    }

    /// Draw a fresh student over `n_concepts` concepts.
    pub fn sample<R: Rng + ?Sized>(
        n_concepts: usize,
        profile: &LearnerProfileGenerator,
        rng: &mut R,
    ) -> Result<Self> {
        let learner_style = profile.sample_learning_style(rng)?;
        let avg_skill = profile.sample_average_skill(rng);
        let skills = profile.sample_skill_vector(n_concepts, avg_skill, rng);
        Ok(Self::new(learner_style, avg_skill, skills))
    }

    #[must_use]
    pub const fn learner_style(&self) -> &LearnerStyle {
        &self.learner_style
    }

    #[must_use]
    pub const fn avg_skill(&self) -> f64 {
        self.avg_skill
    }

    #[must_use]
    pub fn skills(&self) -> &[f64] {
        &self.skills
    }

    /// Show a teaching example for `concept_idx` presented in style
    /// `style_idx`. The skill gain is proportional to how much the student
    /// prefers that style.
    pub fn observe_example(
        &mut self,
        concept_idx: usize,
        style_idx: usize,
        delta_scale: f64,
    ) -> Result<()> {
        let weight = self.learner_style.weight(style_idx).ok_or_else(|| {
            SimError::InvalidArgument(format!("learning style index {style_idx} out of range"))
        })?;
        let n_concepts = self.skills.len();
        let skill = self.skills.get_mut(concept_idx).ok_or_else(|| {
            SimError::InvalidArgument(format!(
                "concept index {concept_idx} out of range for {n_concepts} concepts"
            ))
        })?;
        *skill += delta_scale * weight;
        Ok(())
    }

    /// Probability of answering `question` correctly with the current skills.
    pub fn p_correct(&self, question: &Question, irt: &IrtParams) -> Result<f64> {
        let concepts = question.concepts();
        if concepts.is_empty() {
            return Err(SimError::InvalidArgument(
                "question references no concepts".to_string(),
            ));
        }
        let relevant = concepts
            .iter()
            .map(|&concept| {
                self.skills.get(concept).copied().ok_or_else(|| {
                    SimError::InvalidArgument(format!(
                        "question references concept {concept} but the student knows {} concepts",
                        self.skills.len()
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        irt.p_correct_multi(&relevant, question.difficulty())
    }

    /// Answer a question. Skills are left untouched.
    pub fn answer_question<R: Rng + ?Sized>(
        &self,
        question: &Question,
        irt: &IrtParams,
        rng: &mut R,
    ) -> Result<Answer> {
        let p_correct = self.p_correct(question, irt)?;
        let draw: f64 = rng.random();
        Ok(Answer {
            is_correct: draw < p_correct,
            p_correct,
        })
    }
}
