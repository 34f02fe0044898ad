//! E2E Scenario: generate a population, run agents, persist and resume.

use irtsim::agents::{Agent, AgentKind, BanditConfig};
use irtsim::config::{Config, SimulationConfig};
use irtsim::env::{EnvOptions, Population, StudentEnv, run_simulation};
use predicates::prelude::*;

use super::common::{CliFixture, SMALL_CONFIG, seeded};

fn small_population(seed: u64) -> Population {
    let simulation = SimulationConfig {
        n_students: 4,
        n_concepts: 3,
        n_questions: 40,
        seed,
        ..SimulationConfig::default()
    };
    let config = Config::default();
    Population::generate(&simulation, &config.profile_generator(), &mut seeded(seed)).unwrap()
}

#[test]
fn every_agent_completes_a_run() {
    let population = small_population(9);
    for kind in AgentKind::all() {
        let mut env = StudentEnv::new(population.clone(), EnvOptions::default()).unwrap();
        let mut agent = Agent::new(*kind, env.action_space(), BanditConfig::default()).unwrap();
        let summary = run_simulation(&mut env, &mut agent, false, &mut seeded(1)).unwrap();
        assert_eq!(summary.agent, *kind);
        assert_eq!(summary.steps, 4 * 40 - 1);
        assert_eq!(summary.student_accuracy.len(), 4);
    }
}

#[test]
fn reset_between_runs_restores_the_population() {
    let population = small_population(5);
    let mut env = StudentEnv::new(population.clone(), EnvOptions::default()).unwrap();
    let mut agent =
        Agent::new(AgentKind::WeakestSkill, env.action_space(), BanditConfig::default()).unwrap();
    run_simulation(&mut env, &mut agent, false, &mut seeded(2)).unwrap();
    assert_ne!(env.students(), population.students.as_slice());

    env.reset(false, &mut seeded(3));
    assert_eq!(env.students(), population.students.as_slice());
    assert_eq!(env.population(), &population);
}

#[test]
fn saved_population_replays_identically() {
    let dir = tempfile::tempdir().unwrap();
    let population = small_population(21);
    let path = dir.path().join(population.default_file_name());
    population.save(&path).unwrap();
    let restored = Population::load(&path).unwrap();

    let run = |population: Population| {
        let mut env = StudentEnv::new(population, EnvOptions::default()).unwrap();
        let mut agent =
            Agent::new(AgentKind::EpsilonGreedy, env.action_space(), BanditConfig::default())
                .unwrap();
        run_simulation(&mut env, &mut agent, false, &mut seeded(4)).unwrap()
    };
    assert_eq!(run(population), run(restored));
}

#[test]
fn resumed_agent_continues_from_saved_state() {
    let dir = tempfile::tempdir().unwrap();
    let population = small_population(13);
    let mut env = StudentEnv::new(population, EnvOptions::default()).unwrap();
    let mut agent =
        Agent::new(AgentKind::EpsilonGreedy, env.action_space(), BanditConfig::default()).unwrap();
    let summary = run_simulation(&mut env, &mut agent, false, &mut seeded(6)).unwrap();
    agent.save(dir.path(), "first").unwrap();

    let mut resumed = Agent::load(dir.path(), "first", AgentKind::EpsilonGreedy).unwrap();
    assert_eq!(resumed, agent);
    run_simulation(&mut env, &mut resumed, false, &mut seeded(7)).unwrap();
    let steps = resumed.as_bandit().unwrap().step_count();
    assert_eq!(steps, 2 * summary.steps as u64 + 1);
}

#[test]
fn cli_generate_then_run_from_bundle() {
    let fixture = CliFixture::new(SMALL_CONFIG);
    let bundle = fixture.root().join("bundle.json");
    let bundle_arg = bundle.to_str().unwrap();

    let generated = fixture.robot_json(&["generate", "--out", bundle_arg]);
    assert_eq!(generated["status"], "ok");
    assert_eq!(generated["data"]["n_students"], 2);
    assert!(bundle.exists());

    let report = fixture.robot_json(&[
        "run",
        "--population",
        bundle_arg,
        "--agent",
        "sample-proportional",
        "--save-agent",
        "cohort-a",
    ]);
    assert_eq!(report["data"]["agent"], "sample-proportional");
    assert_eq!(report["data"]["steps"], 59);
    assert_eq!(report["data"]["population_seed"], 11);
    assert!(fixture.snapshot_dir().join("cohort-a-sample-proportional.json").exists());

    let resumed = fixture.robot_json(&[
        "run",
        "--population",
        bundle_arg,
        "--agent",
        "sample-proportional",
        "--resume-agent",
        "cohort-a",
    ]);
    assert_eq!(resumed["data"]["steps"], 59);
}

#[test]
fn cli_resume_with_wrong_population_size_fails() {
    let fixture = CliFixture::new(SMALL_CONFIG);
    fixture.robot_json(&["run", "--save-agent", "small"]);

    fixture
        .command(&["--robot", "run", "--resume-agent", "small"])
        .env("IRTSIM_N_CONCEPTS", "4")
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid_state"));
}

#[test]
fn cli_resume_baseline_with_wrong_population_size_fails() {
    let fixture = CliFixture::new(SMALL_CONFIG);
    fixture.robot_json(&["run", "--agent", "weakest-skill", "--save-agent", "oracle"]);

    fixture
        .command(&[
            "--robot",
            "run",
            "--agent",
            "weakest-skill",
            "--resume-agent",
            "oracle",
        ])
        .env("IRTSIM_N_CONCEPTS", "4")
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid_state"));
}
