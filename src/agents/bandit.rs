//! Multi-armed bandit with incremental value estimates.
//!
//! Every call to [`MultiArmBandit::select_action`] first credits the reward
//! it is handed to the action chosen on the previous call, then picks the
//! next action:
//!
//! ```text
//! Q[a] <- Q[a] + (1 / n) * (r - Q[a])
//! ```
//!
//! With [`StepSize::GlobalStep`] `n` is the agent's step counter shared by
//! all actions, not the visit count of `a`. Later rewards therefore move
//! the estimates less and less regardless of how rarely an action was
//! tried. [`StepSize::SampleAverage`] uses per-action visit counts, which
//! gives the usual sample mean.
//!
//! When the context reports the first question of a student, the previous
//! action is reset to 0 *before* the update, so the reward earned on the
//! last question of the previous student is credited to action 0.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SimError};

use super::AgentContext;
use super::epsilon::EpsilonSchedule;

pub const DEFAULT_WARMUP_MULTIPLIER: u64 = 5;
/// Upper bound on `warmup_multiplier`; larger values never leave warm-up.
pub const MAX_WARMUP_MULTIPLIER: u64 = 1_000_000;

/// What the agent does on the exploration branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exploration {
    /// Uniform over all actions (epsilon-greedy).
    #[default]
    Uniform,
    /// Proportional to the current value estimates.
    Proportional,
}

/// Step size of the incremental update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepSize {
    /// `1 / step_count`, shared by all actions.
    #[default]
    GlobalStep,
    /// `1 / visits(a)`.
    SampleAverage,
}

impl std::str::FromStr for StepSize {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "global-step" | "global" => Ok(Self::GlobalStep),
            "sample-average" | "sample-mean" | "per-action" => Ok(Self::SampleAverage),
            _ => Err(SimError::Config(format!(
                "invalid estimator {s} (expected global-step|sample-average)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BanditConfig {
    pub epsilon: EpsilonSchedule,
    /// Uniform exploration lasts `warmup_multiplier * n_actions` steps.
    pub warmup_multiplier: u64,
    pub step_size: StepSize,
}

impl BanditConfig {
    pub fn validate(&self) -> Result<()> {
        self.epsilon.validate()?;
        if self.warmup_multiplier > MAX_WARMUP_MULTIPLIER {
            return Err(SimError::Config(format!(
                "agent.warmup_multiplier must be at most {MAX_WARMUP_MULTIPLIER} (got {})",
                self.warmup_multiplier
            )));
        }
        Ok(())
    }
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            epsilon: EpsilonSchedule::default(),
            warmup_multiplier: DEFAULT_WARMUP_MULTIPLIER,
            step_size: StepSize::GlobalStep,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiArmBandit {
    exploration: Exploration,
    config: BanditConfig,
    value_estimates: Vec<f64>,
    visits: Vec<u64>,
    step_count: u64,
    previous_action: usize,
}

impl MultiArmBandit {
    pub fn new(n_actions: usize, exploration: Exploration, config: BanditConfig) -> Result<Self> {
        if n_actions == 0 {
            return Err(SimError::InvalidArgument(
                "a bandit needs at least one action".to_string(),
            ));
        }
        config.validate()?;
        Ok(Self {
            exploration,
            config,
            value_estimates: vec![0.0; n_actions],
            visits: vec![0; n_actions],
            step_count: 1,
            previous_action: 0,
        })
    }

    pub fn epsilon_greedy(n_actions: usize, config: BanditConfig) -> Result<Self> {
        Self::new(n_actions, Exploration::Uniform, config)
    }

    pub fn sample_proportional(n_actions: usize, config: BanditConfig) -> Result<Self> {
        Self::new(n_actions, Exploration::Proportional, config)
    }

    /// Start from explicit estimates instead of zeros.
    pub fn with_value_estimates(mut self, estimates: Vec<f64>) -> Result<Self> {
        if estimates.len() != self.value_estimates.len() {
            return Err(SimError::InvalidArgument(format!(
                "expected {} value estimates, got {}",
                self.value_estimates.len(),
                estimates.len()
            )));
        }
        self.value_estimates = estimates;
        Ok(self)
    }

    /// Check the invariants a deserialized bandit may have lost.
    pub fn validate(&self) -> Result<()> {
        let n_actions = self.value_estimates.len();
        if n_actions == 0 {
            return Err(SimError::InvalidState(
                "bandit has no value estimates".to_string(),
            ));
        }
        if self.visits.len() != n_actions {
            return Err(SimError::InvalidState(format!(
                "bandit has {} visit counts for {n_actions} actions",
                self.visits.len()
            )));
        }
        if self.step_count == 0 {
            return Err(SimError::InvalidState(
                "bandit step count must start at 1".to_string(),
            ));
        }
        if self.previous_action >= n_actions {
            return Err(SimError::InvalidState(format!(
                "previous action {} is outside {n_actions} actions",
                self.previous_action
            )));
        }
        if let Some(q) = self.value_estimates.iter().find(|q| !q.is_finite()) {
            return Err(SimError::InvalidState(format!(
                "bandit value estimate {q} is not finite"
            )));
        }
        self.config
            .validate()
            .map_err(|err| SimError::InvalidState(format!("bandit config: {err}")))
    }

    #[must_use]
    pub const fn exploration(&self) -> Exploration {
        self.exploration
    }

    #[must_use]
    pub const fn config(&self) -> &BanditConfig {
        &self.config
    }

    #[must_use]
    pub fn n_actions(&self) -> usize {
        self.value_estimates.len()
    }

    #[must_use]
    pub fn value_estimates(&self) -> &[f64] {
        &self.value_estimates
    }

    #[must_use]
    pub fn visits(&self) -> &[u64] {
        &self.visits
    }

    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }

    #[must_use]
    pub const fn previous_action(&self) -> usize {
        self.previous_action
    }

    #[must_use]
    pub fn warmup_steps(&self) -> u64 {
        self.config
            .warmup_multiplier
            .saturating_mul(self.n_actions() as u64)
    }

    #[must_use]
    pub fn in_warmup(&self) -> bool {
        self.step_count < self.warmup_steps()
    }

    /// Credit `reward` to the previous action.
    pub fn observe(&mut self, reward: f64, episode_start: bool) {
        if episode_start {
            self.previous_action = 0;
        }
        let action = self.previous_action;
        self.visits[action] += 1;
        let n = match self.config.step_size {
            StepSize::GlobalStep => self.step_count,
            StepSize::SampleAverage => self.visits[action],
        };
        let q = &mut self.value_estimates[action];
        *q += (reward - *q) / n as f64;
    }

    pub fn select_action<R: Rng + ?Sized>(
        &mut self,
        last_reward: f64,
        context: &AgentContext<'_>,
        rng: &mut R,
    ) -> Result<usize> {
        self.observe(last_reward, context.is_episode_start());
        let action = self.choose(rng)?;
        trace!(
            step = self.step_count,
            action,
            warmup = self.in_warmup(),
            "bandit selected action"
        );
        self.previous_action = action;
        self.step_count += 1;
        Ok(action)
    }

    /// Highest estimate; ties go to the lowest index.
    #[must_use]
    pub fn greedy_action(&self) -> usize {
        let mut best = 0;
        for (i, q) in self.value_estimates.iter().enumerate().skip(1) {
            if *q > self.value_estimates[best] {
                best = i;
            }
        }
        best
    }

    fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
        if self.in_warmup() {
            return Ok(self.uniform_action(rng));
        }
        let draw: f64 = rng.random();
        if draw > self.config.epsilon.value(self.step_count) {
            return Ok(self.greedy_action());
        }
        match self.exploration {
            Exploration::Uniform => Ok(self.uniform_action(rng)),
            Exploration::Proportional => self.proportional_action(rng),
        }
    }

    fn uniform_action<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.n_actions())
    }

    fn proportional_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
        if let Some(q) = self.value_estimates.iter().find(|q| **q < 0.0 || !q.is_finite()) {
            return Err(SimError::InvalidState(format!(
                "proportional exploration needs non-negative finite estimates, found {q}"
            )));
        }
        let total: f64 = self.value_estimates.iter().sum();
        if total == 0.0 {
            return Ok(0);
        }
        let dist = WeightedIndex::new(&self.value_estimates)
            .map_err(|err| SimError::InvalidState(format!("value estimate weights: {err}")))?;
        Ok(dist.sample(rng))
    }
}
