//! Question pool generation.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SimError};

use super::standard_normal;

/// Base difficulty per concept type. Concepts beyond the table have no
/// offset.
const CONCEPT_TYPE_DIFFICULTY: [f64; 5] = [
    10.0, // difficult
    3.0,  // moderate
    0.0,  // moderate
    -4.0, // easy
    20.0, // extremely difficult
];

/// A question touching one or more concepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    concepts: Vec<usize>,
    difficulty: f64,
}

#[derive(Deserialize)]
struct RawQuestion {
    concepts: Vec<usize>,
    difficulty: f64,
}

impl TryFrom<RawQuestion> for Question {
    type Error = SimError;

    fn try_from(raw: RawQuestion) -> Result<Self> {
        Self::new(raw.concepts, raw.difficulty)
    }
}

impl Question {
    /// Build a question. Concepts must be non-empty and distinct.
    pub fn new(concepts: Vec<usize>, difficulty: f64) -> Result<Self> {
        if concepts.is_empty() {
            return Err(SimError::InvalidArgument(
                "a question needs at least one concept".to_string(),
            ));
        }
        for (i, concept) in concepts.iter().enumerate() {
            if concepts[..i].contains(concept) {
                return Err(SimError::InvalidArgument(format!(
                    "concept {concept} appears more than once in a question"
                )));
            }
        }
        Ok(Self {
            concepts,
            difficulty,
        })
    }

    #[must_use]
    pub fn concepts(&self) -> &[usize] {
        &self.concepts
    }

    #[must_use]
    pub const fn difficulty(&self) -> f64 {
        self.difficulty
    }
}

/// How question difficulty is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DifficultyPolicy {
    /// Handcrafted base difficulty of the first concept plus `N(0, 1)`.
    #[default]
    ConceptTable,
    /// Plain `N(0, 1)` for every question.
    StandardNormal,
}

impl DifficultyPolicy {
    pub fn sample<R: Rng + ?Sized>(self, concepts: &[usize], rng: &mut R) -> f64 {
        match self {
            Self::ConceptTable => concept_table_difficulty(concepts, rng),
            Self::StandardNormal => standard_normal(rng),
        }
    }
}

impl std::str::FromStr for DifficultyPolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "concept-table" | "concept_table" | "table" => Ok(Self::ConceptTable),
            "standard-normal" | "standard_normal" | "normal" => Ok(Self::StandardNormal),
            _ => Err(SimError::Config(format!(
                "invalid difficulty policy {s} (expected concept-table|standard-normal)"
            ))),
        }
    }
}

/// Default difficulty function keyed on the question's first concept.
pub fn concept_table_difficulty<R: Rng + ?Sized>(concepts: &[usize], rng: &mut R) -> f64 {
    let base = concepts
        .first()
        .and_then(|&concept| CONCEPT_TYPE_DIFFICULTY.get(concept))
        .copied()
        .unwrap_or(0.0);
    base + standard_normal(rng)
}

/// Normalized inverse power law over `1..=n`: weight of `i` is `1/i`.
#[must_use]
pub fn norm_inv_power_law(n: usize) -> Vec<f64> {
    let raw: Vec<f64> = (1..=n).map(|i| 1.0 / i as f64).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Samples questions over a fixed concept universe.
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    n_concepts: usize,
    max_concepts_per_question: usize,
    concept_count: WeightedIndex<f64>,
}

impl QuestionGenerator {
    pub fn new(n_concepts: usize, max_concepts_per_question: usize) -> Result<Self> {
        if n_concepts == 0 {
            return Err(SimError::InvalidArgument(
                "concept universe must not be empty".to_string(),
            ));
        }
        if max_concepts_per_question == 0 {
            return Err(SimError::InvalidArgument(
                "max_concepts_per_question must be at least 1".to_string(),
            ));
        }
        if max_concepts_per_question > n_concepts {
            return Err(SimError::InvalidArgument(format!(
                "max_concepts_per_question ({max_concepts_per_question}) exceeds \
                 the number of concepts ({n_concepts})"
            )));
        }
        let concept_count = WeightedIndex::new(norm_inv_power_law(max_concepts_per_question))
            .map_err(|err| SimError::InvalidState(format!("concept count weights: {err}")))?;
        Ok(Self {
            n_concepts,
            max_concepts_per_question,
            concept_count,
        })
    }

    #[must_use]
    pub const fn n_concepts(&self) -> usize {
        self.n_concepts
    }

    #[must_use]
    pub const fn max_concepts_per_question(&self) -> usize {
        self.max_concepts_per_question
    }

    /// Generate `count` questions, computing difficulty with `difficulty_fn`.
    pub fn generate<R, F>(&self, count: usize, rng: &mut R, mut difficulty_fn: F) -> Vec<Question>
    where
        R: Rng + ?Sized,
        F: FnMut(&[usize], &mut R) -> f64,
    {
        let questions: Vec<Question> = (0..count)
            .map(|_| {
                let concepts = self.sample_concepts(rng);
                let difficulty = difficulty_fn(&concepts, rng);
                Question {
                    concepts,
                    difficulty,
                }
            })
            .collect();
        debug!(
            count,
            n_concepts = self.n_concepts,
            max_concepts = self.max_concepts_per_question,
            "generated question pool"
        );
        questions
    }

    pub fn generate_with_policy<R: Rng + ?Sized>(
        &self,
        count: usize,
        policy: DifficultyPolicy,
        rng: &mut R,
    ) -> Vec<Question> {
        self.generate(count, rng, |concepts, rng| policy.sample(concepts, rng))
    }

    fn sample_concepts<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let k = self.concept_count.sample(rng) + 1;
        rand::seq::index::sample(rng, self.n_concepts, k).into_vec()
    }
}

/// Convenience wrapper around [`QuestionGenerator`].
pub fn generate<R, F>(
    count: usize,
    n_concepts: usize,
    max_concepts_per_question: usize,
    difficulty_fn: F,
    rng: &mut R,
) -> Result<Vec<Question>>
where
    R: Rng + ?Sized,
    F: FnMut(&[usize], &mut R) -> f64,
{
    let generator = QuestionGenerator::new(n_concepts, max_concepts_per_question)?;
    Ok(generator.generate(count, rng, difficulty_fn))
}
