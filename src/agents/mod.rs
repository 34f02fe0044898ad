//! Teaching agents.
//!
//! Every agent maps `(last_reward, context)` to an action in the flat
//! `concept * n_styles + style` encoding (see [`ActionSpace`]). The set of
//! policies is closed:
//!
//! - [`RandomAgent`]: uniform baseline.
//! - [`WeakestSkillAgent`]: reads the true student state; calibration
//!   baseline.
//! - [`MultiArmBandit`] with [`Exploration::Uniform`] (epsilon-greedy) or
//!   [`Exploration::Proportional`] (explores in proportion to the value
//!   estimates).

pub mod action;
pub mod bandit;
pub mod baseline;
pub mod epsilon;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SimError};
use crate::generate::LearnerStyle;
use crate::persist::{read_json, write_json_atomic};

pub use action::{ActionSpace, TeachingExample};
pub use bandit::{BanditConfig, Exploration, MultiArmBandit, StepSize};
pub use baseline::{RandomAgent, WeakestSkillAgent};
pub use epsilon::EpsilonSchedule;

/// What the orchestration loop tells an agent before each selection.
#[derive(Debug, Clone, Copy)]
pub struct AgentContext<'a> {
    pub student_idx: usize,
    /// Index of the question about to be asked. `0` means a new student
    /// starts.
    pub question_idx: usize,
    pub skills: &'a [f64],
    pub learner_style: &'a LearnerStyle,
}

impl AgentContext<'_> {
    #[must_use]
    pub const fn is_episode_start(&self) -> bool {
        self.question_idx == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    Random,
    WeakestSkill,
    #[default]
    EpsilonGreedy,
    SampleProportional,
}

impl AgentKind {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Random,
            Self::WeakestSkill,
            Self::EpsilonGreedy,
            Self::SampleProportional,
        ]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::WeakestSkill => "weakest-skill",
            Self::EpsilonGreedy => "epsilon-greedy",
            Self::SampleProportional => "sample-proportional",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "random" => Ok(Self::Random),
            "weakest-skill" | "weakest" => Ok(Self::WeakestSkill),
            "epsilon-greedy" | "eps-greedy" | "greedy" => Ok(Self::EpsilonGreedy),
            "sample-proportional" | "proportional" | "sample-prob" => {
                Ok(Self::SampleProportional)
            }
            _ => Err(SimError::Config(format!(
                "invalid agent {s} \
                 (expected random|weakest-skill|epsilon-greedy|sample-proportional)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Agent {
    Random(RandomAgent),
    WeakestSkill(WeakestSkillAgent),
    Bandit(MultiArmBandit),
}

impl Agent {
    pub fn new(kind: AgentKind, space: ActionSpace, config: BanditConfig) -> Result<Self> {
        Ok(match kind {
            AgentKind::Random => Self::Random(RandomAgent::new(space)),
            AgentKind::WeakestSkill => Self::WeakestSkill(WeakestSkillAgent::new(space)),
            AgentKind::EpsilonGreedy => {
                Self::Bandit(MultiArmBandit::epsilon_greedy(space.len(), config)?)
            }
            AgentKind::SampleProportional => {
                Self::Bandit(MultiArmBandit::sample_proportional(space.len(), config)?)
            }
        })
    }

    #[must_use]
    pub const fn kind(&self) -> AgentKind {
        match self {
            Self::Random(_) => AgentKind::Random,
            Self::WeakestSkill(_) => AgentKind::WeakestSkill,
            Self::Bandit(bandit) => match bandit.exploration() {
                Exploration::Uniform => AgentKind::EpsilonGreedy,
                Exploration::Proportional => AgentKind::SampleProportional,
            },
        }
    }

    pub fn select_action<R: Rng + ?Sized>(
        &mut self,
        last_reward: f64,
        context: &AgentContext<'_>,
        rng: &mut R,
    ) -> Result<usize> {
        match self {
            Self::Random(agent) => agent.select_action(rng),
            Self::WeakestSkill(agent) => agent.select_action(context),
            Self::Bandit(bandit) => bandit.select_action(last_reward, context, rng),
        }
    }

    #[must_use]
    pub fn n_actions(&self) -> usize {
        match self {
            Self::Random(agent) => agent.space().len(),
            Self::WeakestSkill(agent) => agent.space().len(),
            Self::Bandit(bandit) => bandit.n_actions(),
        }
    }

    /// Fails unless the agent acts over exactly `space`.
    pub fn ensure_action_space(&self, space: ActionSpace) -> Result<()> {
        let fits = match self {
            Self::Random(agent) => agent.space() == space,
            Self::WeakestSkill(agent) => agent.space() == space,
            Self::Bandit(bandit) => bandit.n_actions() == space.len(),
        };
        if fits {
            Ok(())
        } else {
            Err(SimError::InvalidState(format!(
                "{} agent has {} actions but this population needs {}",
                self.kind(),
                self.n_actions(),
                space.len()
            )))
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Random(agent) => validate_space(agent.space()),
            Self::WeakestSkill(agent) => validate_space(agent.space()),
            Self::Bandit(bandit) => bandit.validate(),
        }
    }

    #[must_use]
    pub const fn as_bandit(&self) -> Option<&MultiArmBandit> {
        match self {
            Self::Bandit(bandit) => Some(bandit),
            _ => None,
        }
    }

    #[must_use]
    pub fn snapshot(&self, id: &str) -> AgentSnapshot {
        AgentSnapshot {
            id: id.to_string(),
            kind: self.kind(),
            saved_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            agent: self.clone(),
        }
    }

    pub fn restore(snapshot: AgentSnapshot) -> Result<Self> {
        if snapshot.agent.kind() != snapshot.kind {
            return Err(SimError::InvalidState(format!(
                "snapshot {} claims kind {} but holds a {} agent",
                snapshot.id,
                snapshot.kind,
                snapshot.agent.kind()
            )));
        }
        snapshot.agent.validate()?;
        Ok(snapshot.agent)
    }

    /// `<dir>/<id>-<kind>.json`
    pub fn snapshot_path(dir: &Path, id: &str, kind: AgentKind) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(dir.join(format!("{id}-{kind}.json")))
    }

    pub fn save(&self, dir: &Path, id: &str) -> Result<PathBuf> {
        let path = Self::snapshot_path(dir, id, self.kind())?;
        write_json_atomic(&path, &self.snapshot(id))?;
        info!(id, kind = %self.kind(), path = %path.display(), "saved agent snapshot");
        Ok(path)
    }

    pub fn load(dir: &Path, id: &str, kind: AgentKind) -> Result<Self> {
        let path = Self::snapshot_path(dir, id, kind)?;
        let snapshot: AgentSnapshot = read_json(&path)?;
        if snapshot.id != id {
            return Err(SimError::InvalidState(format!(
                "snapshot at {} belongs to {}",
                path.display(),
                snapshot.id
            )));
        }
        info!(id, kind = %kind, path = %path.display(), "restored agent snapshot");
        Self::restore(snapshot)
    }
}

/// Serialized agent state keyed by an experiment identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: String,
    pub kind: AgentKind,
    pub saved_at: DateTime<Utc>,
    pub version: String,
    pub agent: Agent,
}

fn validate_space(space: ActionSpace) -> Result<()> {
    if space.n_concepts() == 0 || space.n_styles() == 0 {
        return Err(SimError::InvalidState(format!(
            "action space {}x{} is empty",
            space.n_concepts(),
            space.n_styles()
        )));
    }
    Ok(())
}

fn validate_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !id.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(SimError::InvalidArgument(format!(
            "snapshot id {id:?} must be non-empty and use only letters, digits, '-', '_' or '.'"
        )))
    }
}
