use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agents::{AgentKind, BanditConfig, EpsilonSchedule, StepSize};
use crate::agents::bandit::DEFAULT_WARMUP_MULTIPLIER;
use crate::error::{Result, SimError};
use crate::forgetting::ForgettingModel;
use crate::generate::{DifficultyPolicy, LearnerProfileGenerator, StylePolicy};
use crate::irt::IrtParams;
use crate::student::DEFAULT_DELTA_SCALE;

/// Seed the original experiments were run with.
pub const DEFAULT_SEED: u64 = 9;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub population: PopulationConfig,
    pub irt: IrtParams,
    pub teaching: TeachingConfig,
    pub agent: AgentConfig,
}

impl Config {
    /// Defaults, then the global and project files (or one explicit file),
    /// then `IRTSIM_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        Self::load_with(explicit_path, project_root, |key| std::env::var(key).ok())
    }

    pub fn load_with<F>(
        explicit_path: Option<&Path>,
        project_root: &Path,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| lookup("IRTSIM_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                SimError::Config(format!("config file {} does not exist", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_overrides(&lookup)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a complete config from TOML text, without layering.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let patch: ConfigPatch =
            toml::from_str(raw).map_err(|err| SimError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("irtsim/config.toml"))
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&project_root.join("irtsim.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SimError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SimError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.simulation {
            self.simulation.merge(patch);
        }
        if let Some(patch) = patch.population {
            self.population.merge(patch);
        }
        if let Some(patch) = patch.irt {
            if let Some(value) = patch.discrimination {
                self.irt.discrimination = value;
            }
            if let Some(value) = patch.guessing {
                self.irt.guessing = value;
            }
        }
        if let Some(patch) = patch.teaching {
            self.teaching.merge(patch);
        }
        if let Some(patch) = patch.agent {
            self.agent.merge(patch);
        }
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_var::<u64, _>(lookup, "IRTSIM_SEED")? {
            self.simulation.seed = value;
        }
        if let Some(value) = parse_var::<usize, _>(lookup, "IRTSIM_N_STUDENTS")? {
            self.simulation.n_students = value;
        }
        if let Some(value) = parse_var::<usize, _>(lookup, "IRTSIM_N_CONCEPTS")? {
            self.simulation.n_concepts = value;
        }
        if let Some(value) = parse_var::<usize, _>(lookup, "IRTSIM_N_QUESTIONS")? {
            self.simulation.n_questions = value;
        }
        if let Some(value) = parse_var::<usize, _>(lookup, "IRTSIM_MAX_CONCEPTS")? {
            self.simulation.max_concepts_per_question = value;
        }
        if let Some(value) = parse_var::<DifficultyPolicy, _>(lookup, "IRTSIM_DIFFICULTY")? {
            self.simulation.difficulty = value;
        }

        if let Some(value) = parse_var::<f64, _>(lookup, "IRTSIM_SKILL_BIAS")? {
            self.population.skill_bias = value;
        }
        if let Some(value) = parse_var::<StylePolicy, _>(lookup, "IRTSIM_STYLE_POLICY")? {
            self.population.style_policy = value;
        }

        if let Some(value) = parse_var::<f64, _>(lookup, "IRTSIM_DELTA_SCALE")? {
            self.teaching.delta_scale = value;
        }
        if let Some(value) = parse_var::<ForgettingModel, _>(lookup, "IRTSIM_FORGETTING")? {
            self.teaching.forgetting = value;
        }

        if let Some(value) = parse_var::<AgentKind, _>(lookup, "IRTSIM_AGENT")? {
            self.agent.kind = value;
        }
        if let Some(value) = parse_var::<f64, _>(lookup, "IRTSIM_EPSILON")? {
            self.agent.epsilon = EpsilonSchedule::Constant { epsilon: value };
        }
        if let Some(value) = parse_var::<StepSize, _>(lookup, "IRTSIM_ESTIMATOR")? {
            self.agent.step_size = value;
        }
        if let Some(value) = lookup("IRTSIM_SNAPSHOT_DIR") {
            self.agent.snapshot_dir = Some(PathBuf::from(value));
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if sim.n_students == 0 || sim.n_concepts == 0 || sim.n_questions == 0 {
            return Err(SimError::Config(
                "simulation.n_students, n_concepts and n_questions must be positive".to_string(),
            ));
        }
        if sim.max_concepts_per_question == 0 || sim.max_concepts_per_question > sim.n_concepts {
            return Err(SimError::Config(format!(
                "simulation.max_concepts_per_question must be in 1..={} (got {})",
                sim.n_concepts, sim.max_concepts_per_question
            )));
        }
        if !self.population.skill_bias.is_finite() {
            return Err(SimError::Config("population.skill_bias must be finite".to_string()));
        }
        if !self.irt.discrimination.is_finite() || !(0.0..1.0).contains(&self.irt.guessing) {
            return Err(SimError::Config(format!(
                "irt.discrimination must be finite and irt.guessing in [0, 1) (got {} / {})",
                self.irt.discrimination, self.irt.guessing
            )));
        }
        if !self.teaching.delta_scale.is_finite() {
            return Err(SimError::Config("teaching.delta_scale must be finite".to_string()));
        }
        self.bandit_config().validate()
    }

    #[must_use]
    pub const fn profile_generator(&self) -> LearnerProfileGenerator {
        LearnerProfileGenerator::new(self.population.style_policy, self.population.skill_bias)
    }

    #[must_use]
    pub const fn bandit_config(&self) -> BanditConfig {
        BanditConfig {
            epsilon: self.agent.epsilon,
            warmup_multiplier: self.agent.warmup_multiplier,
            step_size: self.agent.step_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub n_students: usize,
    pub n_concepts: usize,
    pub n_questions: usize,
    pub max_concepts_per_question: usize,
    pub difficulty: DifficultyPolicy,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_students: 20,
            n_concepts: 5,
            n_questions: 500,
            max_concepts_per_question: 1,
            difficulty: DifficultyPolicy::ConceptTable,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    fn merge(&mut self, patch: SimulationPatch) {
        if let Some(value) = patch.n_students {
            self.n_students = value;
        }
        if let Some(value) = patch.n_concepts {
            self.n_concepts = value;
        }
        if let Some(value) = patch.n_questions {
            self.n_questions = value;
        }
        if let Some(value) = patch.max_concepts_per_question {
            self.max_concepts_per_question = value;
        }
        if let Some(value) = patch.difficulty {
            self.difficulty = value;
        }
        if let Some(value) = patch.seed {
            self.seed = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Added to every student's `N(0, 1)` average skill.
    pub skill_bias: f64,
    pub style_policy: StylePolicy,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            skill_bias: -3.0,
            style_policy: StylePolicy::OneHot,
        }
    }
}

impl PopulationConfig {
    fn merge(&mut self, patch: PopulationPatch) {
        if let Some(value) = patch.skill_bias {
            self.skill_bias = value;
        }
        if let Some(value) = patch.style_policy {
            self.style_policy = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeachingConfig {
    pub delta_scale: f64,
    pub forgetting: ForgettingModel,
}

impl Default for TeachingConfig {
    fn default() -> Self {
        Self {
            delta_scale: DEFAULT_DELTA_SCALE,
            forgetting: ForgettingModel::None,
        }
    }
}

impl TeachingConfig {
    fn merge(&mut self, patch: TeachingPatch) {
        if let Some(value) = patch.delta_scale {
            self.delta_scale = value;
        }
        if let Some(value) = patch.forgetting {
            self.forgetting = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub kind: AgentKind,
    pub warmup_multiplier: u64,
    pub step_size: StepSize,
    /// Where `--save-agent` and `--resume-agent` keep snapshots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_dir: Option<PathBuf>,
    pub epsilon: EpsilonSchedule,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            kind: AgentKind::EpsilonGreedy,
            warmup_multiplier: DEFAULT_WARMUP_MULTIPLIER,
            step_size: StepSize::GlobalStep,
            snapshot_dir: None,
            epsilon: EpsilonSchedule::default(),
        }
    }
}

impl AgentConfig {
    fn merge(&mut self, patch: AgentPatch) {
        if let Some(value) = patch.kind {
            self.kind = value;
        }
        if let Some(value) = patch.epsilon {
            self.epsilon = value;
        }
        if let Some(value) = patch.warmup_multiplier {
            self.warmup_multiplier = value;
        }
        if let Some(value) = patch.step_size {
            self.step_size = value;
        }
        if let Some(value) = patch.snapshot_dir {
            self.snapshot_dir = Some(value);
        }
    }

    /// Configured snapshot directory, else `<data dir>/irtsim/agents`.
    #[must_use]
    pub fn resolved_snapshot_dir(&self) -> PathBuf {
        self.snapshot_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from(".irtsim"))
                .join("irtsim/agents")
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    pub simulation: Option<SimulationPatch>,
    pub population: Option<PopulationPatch>,
    pub irt: Option<IrtPatch>,
    pub teaching: Option<TeachingPatch>,
    pub agent: Option<AgentPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimulationPatch {
    pub n_students: Option<usize>,
    pub n_concepts: Option<usize>,
    pub n_questions: Option<usize>,
    pub max_concepts_per_question: Option<usize>,
    pub difficulty: Option<DifficultyPolicy>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PopulationPatch {
    pub skill_bias: Option<f64>,
    pub style_policy: Option<StylePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct IrtPatch {
    pub discrimination: Option<f64>,
    pub guessing: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TeachingPatch {
    pub delta_scale: Option<f64>,
    pub forgetting: Option<ForgettingModel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgentPatch {
    pub kind: Option<AgentKind>,
    pub epsilon: Option<EpsilonSchedule>,
    pub warmup_multiplier: Option<u64>,
    pub step_size: Option<StepSize>,
    pub snapshot_dir: Option<PathBuf>,
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| SimError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}
