use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::agents::{Agent, AgentKind};
use crate::error::Result;

use super::StudentEnv;

/// Aggregate result of one pass over every student and question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub agent: AgentKind,
    pub steps: usize,
    pub total_reward: f64,
    pub mean_reward: f64,
    pub mean_p_correct: f64,
    /// Fraction of correct answers per student, in the order they were taught.
    pub student_accuracy: Vec<f64>,
}

/// Reset `env` (optionally shuffling the students), then let `agent` teach
/// until the environment reports done.
///
/// The first selection sees a reward of `0.0`; every later selection sees the
/// reward of the step before it.
pub fn run_simulation<R: Rng + ?Sized>(
    env: &mut StudentEnv,
    agent: &mut Agent,
    shuffle_students: bool,
    rng: &mut R,
) -> Result<RunSummary> {
    env.reset(shuffle_students, rng);
    let n_students = env.population().n_students;
    let mut correct = vec![0_u64; n_students];
    let mut asked = vec![0_u64; n_students];
    let mut total_reward = 0.0;
    let mut total_p = 0.0;
    let mut steps = 0_usize;

    let mut action = agent.select_action(0.0, &env.current_context(), rng)?;
    loop {
        let (student_idx, _) = env.state();
        let outcome = env.step(action, rng)?;
        steps += 1;
        total_reward += outcome.reward;
        total_p += outcome.info.answer.p_correct;
        asked[student_idx] += 1;
        if outcome.info.answer.is_correct {
            correct[student_idx] += 1;
        }
        if outcome.info.question_idx == 0 {
            debug!(
                student = student_idx,
                accuracy = ratio(correct[student_idx], asked[student_idx]),
                "student finished"
            );
        }
        if outcome.done {
            break;
        }
        action = agent.select_action(outcome.reward, &outcome.info.agent_context(), rng)?;
    }

    let summary = RunSummary {
        agent: agent.kind(),
        steps,
        total_reward,
        mean_reward: total_reward / steps as f64,
        mean_p_correct: total_p / steps as f64,
        student_accuracy: correct
            .iter()
            .zip(&asked)
            .map(|(&c, &a)| ratio(c, a))
            .collect(),
    };
    info!(
        agent = %summary.agent,
        steps = summary.steps,
        mean_reward = summary.mean_reward,
        "simulation finished"
    );
    Ok(summary)
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
