//! Orchestration loop: students answer questions one after another while an
//! agent decides what to teach before each question.
//!
//! Every student gets all `n_questions` questions in order, then the next
//! student starts. A step shows one teaching example and asks one question;
//! the reward is `1.0` for a correct answer and `0.0` otherwise.

pub mod population;
pub mod runner;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::debug;

use crate::agents::{ActionSpace, AgentContext};
use crate::error::{Result, SimError};
use crate::forgetting::ForgettingModel;
use crate::generate::LearnerStyle;
use crate::irt::IrtParams;
use crate::student::{Answer, DEFAULT_DELTA_SCALE, Student};

pub use population::Population;
pub use runner::{RunSummary, run_simulation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvOptions {
    pub irt: IrtParams,
    pub delta_scale: f64,
    pub forgetting: ForgettingModel,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            irt: IrtParams::default(),
            delta_scale: DEFAULT_DELTA_SCALE,
            forgetting: ForgettingModel::None,
        }
    }
}

/// Per-step observation for the agent and for logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepInfo {
    /// Student who will answer the next question.
    pub student_idx: usize,
    /// Next question index; `0` marks the start of a new student.
    pub question_idx: usize,
    pub answer: Answer,
    /// Skills of the student taught in this step, after the example.
    pub skills: Vec<f64>,
    pub learner_style: LearnerStyle,
}

impl StepInfo {
    #[must_use]
    pub fn agent_context(&self) -> AgentContext<'_> {
        AgentContext {
            student_idx: self.student_idx,
            question_idx: self.question_idx,
            skills: &self.skills,
            learner_style: &self.learner_style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    /// `(student_idx, question_idx)` after the step.
    pub state: (usize, usize),
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

#[derive(Debug, Clone)]
pub struct StudentEnv {
    population: Population,
    students: Vec<Student>,
    space: ActionSpace,
    options: EnvOptions,
    step: usize,
    student_idx: usize,
    question_idx: usize,
}

impl StudentEnv {
    pub fn new(population: Population, options: EnvOptions) -> Result<Self> {
        population.validate()?;
        if population.students.is_empty() || population.questions.is_empty() {
            return Err(SimError::InvalidArgument(
                "an environment needs at least one student and one question".to_string(),
            ));
        }
        let students = population.students.clone();
        let space = ActionSpace::new(population.n_concepts);
        Ok(Self {
            population,
            students,
            space,
            options,
            step: 0,
            student_idx: 0,
            question_idx: 0,
        })
    }

    #[must_use]
    pub const fn action_space(&self) -> ActionSpace {
        self.space
    }

    #[must_use]
    pub const fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    #[must_use]
    pub const fn state(&self) -> (usize, usize) {
        (self.student_idx, self.question_idx)
    }

    #[must_use]
    pub const fn steps_taken(&self) -> usize {
        self.step
    }

    #[must_use]
    pub const fn max_steps(&self) -> usize {
        self.population.n_students * self.population.n_questions
    }

    /// Context for the very first selection, before any step was taken.
    #[must_use]
    pub fn current_context(&self) -> AgentContext<'_> {
        let student = &self.students[self.student_idx];
        AgentContext {
            student_idx: self.student_idx,
            question_idx: self.question_idx,
            skills: student.skills(),
            learner_style: student.learner_style(),
        }
    }

    /// Restore every student to its initial state and rewind to the first
    /// question of the first student.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        shuffle_students: bool,
        rng: &mut R,
    ) -> (usize, usize) {
        self.step = 0;
        self.student_idx = 0;
        self.question_idx = 0;
        self.students = self.population.students.clone();
        if shuffle_students {
            self.students.shuffle(rng);
        }
        debug!(shuffle_students, "environment reset");
        self.state()
    }

    pub fn step<R: Rng + ?Sized>(&mut self, action: usize, rng: &mut R) -> Result<StepOutcome> {
        let example = self.space.decode(action)?;
        let question = &self.population.questions[self.question_idx];
        let student = &mut self.students[self.student_idx];

        student.observe_example(example.concept, example.style, self.options.delta_scale)?;
        self.options.forgetting.apply(student, 1)?;
        let answer = student.answer_question(question, &self.options.irt, rng)?;
        let reward = if answer.is_correct { 1.0 } else { 0.0 };
        let skills = student.skills().to_vec();
        let learner_style = *student.learner_style();

        let n_questions = self.population.n_questions;
        self.step += 1;
        self.question_idx = (self.question_idx + 1) % n_questions;
        if self.step % n_questions == 0 {
            self.student_idx = (self.student_idx + 1) % self.population.n_students;
        }
        let done = self.step + 1 >= self.max_steps();

        Ok(StepOutcome {
            state: self.state(),
            reward,
            done,
            info: StepInfo {
                student_idx: self.student_idx,
                question_idx: self.question_idx,
                answer,
                skills,
                learner_style,
            },
        })
    }
}
