//! Non-learning reference policies.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

use super::AgentContext;
use super::action::ActionSpace;

/// Teaches a uniformly random concept in a uniformly random style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomAgent {
    space: ActionSpace,
}

impl RandomAgent {
    #[must_use]
    pub const fn new(space: ActionSpace) -> Self {
        Self { space }
    }

    #[must_use]
    pub const fn space(&self) -> ActionSpace {
        self.space
    }

    pub fn select_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
        let concept = rng.random_range(0..self.space.n_concepts());
        let style = rng.random_range(0..self.space.n_styles());
        self.space.encode(concept, style)
    }
}

/// Reads the true student state and teaches the weakest concept in the
/// student's strongest style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeakestSkillAgent {
    space: ActionSpace,
}

impl WeakestSkillAgent {
    #[must_use]
    pub const fn new(space: ActionSpace) -> Self {
        Self { space }
    }

    #[must_use]
    pub const fn space(&self) -> ActionSpace {
        self.space
    }

    pub fn select_action(&self, context: &AgentContext<'_>) -> Result<usize> {
        let concept = argmin(context.skills).ok_or_else(|| {
            SimError::InvalidArgument("weakest-skill agent needs the student's skills".to_string())
        })?;
        let style = context.learner_style.dominant();
        self.space.encode(concept, style)
    }
}

fn argmin(values: &[f64]) -> Option<usize> {
    let mut iter = values.iter().enumerate();
    let (mut best, mut best_value) = iter.next()?;
    for (i, value) in iter {
        if value < best_value {
            best = i;
            best_value = value;
        }
    }
    Some(best)
}
