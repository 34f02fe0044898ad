//! The initial population and question bank of a run.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::generate::{LearnerProfileGenerator, Question, QuestionGenerator};
use crate::persist::{read_json, write_json_atomic};
use crate::student::Student;

/// Everything needed to replay a run: initial students, questions, sizes and
/// the seed they were generated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub students: Vec<Student>,
    pub questions: Vec<Question>,
    pub n_concepts: usize,
    pub n_students: usize,
    pub n_questions: usize,
    pub seed: u64,
}

impl Population {
    /// Draw students first, then questions, from `rng`.
    pub fn generate<R: Rng + ?Sized>(
        simulation: &SimulationConfig,
        profile: &LearnerProfileGenerator,
        rng: &mut R,
    ) -> Result<Self> {
        let students = (0..simulation.n_students)
            .map(|_| Student::sample(simulation.n_concepts, profile, rng))
            .collect::<Result<Vec<_>>>()?;
        let generator =
            QuestionGenerator::new(simulation.n_concepts, simulation.max_concepts_per_question)?;
        let questions =
            generator.generate_with_policy(simulation.n_questions, simulation.difficulty, rng);

        let population = Self {
            students,
            questions,
            n_concepts: simulation.n_concepts,
            n_students: simulation.n_students,
            n_questions: simulation.n_questions,
            seed: simulation.seed,
        };
        population.validate()?;
        info!(
            n_students = population.n_students,
            n_concepts = population.n_concepts,
            n_questions = population.n_questions,
            seed = population.seed,
            "generated population"
        );
        Ok(population)
    }

    /// Check that the recorded sizes match the contents.
    pub fn validate(&self) -> Result<()> {
        if self.n_concepts == 0 {
            return Err(SimError::InvalidState(
                "population has no concepts".to_string(),
            ));
        }
        if self.students.len() != self.n_students {
            return Err(SimError::InvalidState(format!(
                "population lists {} students but records n_students = {}",
                self.students.len(),
                self.n_students
            )));
        }
        if self.questions.len() != self.n_questions {
            return Err(SimError::InvalidState(format!(
                "population lists {} questions but records n_questions = {}",
                self.questions.len(),
                self.n_questions
            )));
        }
        if let Some((i, student)) = self
            .students
            .iter()
            .enumerate()
            .find(|(_, s)| s.skills().len() != self.n_concepts)
        {
            return Err(SimError::InvalidState(format!(
                "student {i} has {} skills, expected {}",
                student.skills().len(),
                self.n_concepts
            )));
        }
        for (i, question) in self.questions.iter().enumerate() {
            if question.concepts().is_empty() {
                return Err(SimError::InvalidState(format!("question {i} has no concepts")));
            }
            if let Some(concept) = question.concepts().iter().find(|&&c| c >= self.n_concepts) {
                return Err(SimError::InvalidState(format!(
                    "question {i} references concept {concept} outside 0..{}",
                    self.n_concepts
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn default_file_name(&self) -> String {
        format!(
            "population-c{}-s{}-q{}-seed{}.json",
            self.n_concepts, self.n_students, self.n_questions, self.seed
        )
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)?;
        info!(path = %path.display(), "saved population");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let population: Self = read_json(path)?;
        population.validate()?;
        info!(
            path = %path.display(),
            n_students = population.n_students,
            seed = population.seed,
            "loaded population"
        );
        Ok(population)
    }
}
