//! Common test utilities shared across integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use irtsim::agents::AgentContext;
use irtsim::generate::LearnerStyle;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Agent context in the middle of an episode, so no reset happens.
pub fn mid_episode<'a>(skills: &'a [f64], style: &'a LearnerStyle) -> AgentContext<'a> {
    AgentContext {
        student_idx: 0,
        question_idx: 1,
        skills,
        learner_style: style,
    }
}

/// Small, fast configuration for CLI runs.
pub const SMALL_CONFIG: &str = r#"
[simulation]
n_students = 2
n_concepts = 3
n_questions = 30
seed = 11

[population]
skill_bias = 0.0
"#;

/// Temp workspace with a config file and a snapshot directory.
pub struct CliFixture {
    pub dir: tempfile::TempDir,
    pub config_path: PathBuf,
}

impl CliFixture {
    pub fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("irtsim.toml");
        std::fs::write(&config_path, config).expect("write config");
        Self { dir, config_path }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.dir.path().join("agents")
    }

    /// `irtsim --config <fixture config> <args>` with env isolated to the
    /// fixture.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("irtsim").expect("binary");
        cmd.current_dir(self.root())
            .env("IRTSIM_ROOT", self.root())
            .env("IRTSIM_SNAPSHOT_DIR", self.snapshot_dir())
            .env_remove("IRTSIM_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config_path)
            .args(args);
        cmd
    }

    pub fn robot_json(&self, args: &[&str]) -> serde_json::Value {
        let mut full = vec!["--robot"];
        full.extend_from_slice(args);
        let output = self.command(&full).output().expect("run irtsim");
        assert!(
            output.status.success(),
            "irtsim {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("robot output is JSON")
    }
}
