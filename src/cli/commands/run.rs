//! irtsim run - Simulate a teaching run
//!
//! Builds (or loads) a population, lets one agent teach every student
//! through the whole question bank and reports rewards. Bandit state can be
//! saved after the run and resumed in a later one.

use std::path::PathBuf;

use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::agents::{ActionSpace, Agent, AgentKind};
use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::concepts::concept_name;
use crate::env::{EnvOptions, Population, RunSummary, StudentEnv, run_simulation};
use crate::error::Result;
use crate::generate::{N_LEARNING_STYLES, VarkStyle};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Population bundle written by `irtsim generate`
    #[arg(long, value_name = "PATH")]
    pub population: Option<PathBuf>,

    /// Teaching agent (random, weakest-skill, epsilon-greedy, sample-proportional)
    #[arg(long)]
    pub agent: Option<AgentKind>,

    /// Override the configured seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Shuffle the student order before the run
    #[arg(long)]
    pub shuffle: bool,

    /// Save the agent afterwards under this id
    #[arg(long, value_name = "ID")]
    pub save_agent: Option<String>,

    /// Start from a previously saved agent
    #[arg(long, value_name = "ID")]
    pub resume_agent: Option<String>,
}

#[derive(Serialize)]
struct RunReport {
    seed: u64,
    population_seed: u64,
    #[serde(flatten)]
    summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    value_estimates: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_agent: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &RunArgs) -> Result<()> {
    let config = &ctx.config;
    let seed = args.seed.unwrap_or(config.simulation.seed);
    let kind = args.agent.unwrap_or(config.agent.kind);
    let mut rng = StdRng::seed_from_u64(seed);

    let population = match &args.population {
        Some(path) => Population::load(path)?,
        None => {
            let mut simulation = config.simulation.clone();
            simulation.seed = seed;
            Population::generate(&simulation, &config.profile_generator(), &mut rng)?
        }
    };
    let population_seed = population.seed;

    let options = EnvOptions {
        irt: config.irt,
        delta_scale: config.teaching.delta_scale,
        forgetting: config.teaching.forgetting,
    };
    if !options.forgetting.is_implemented() {
        warn!(model = %options.forgetting, "forgetting model is a placeholder; the run will fail");
    }
    let mut env = StudentEnv::new(population, options)?;

    let snapshot_dir = config.agent.resolved_snapshot_dir();
    let mut agent = match &args.resume_agent {
        Some(id) => {
            let agent = Agent::load(&snapshot_dir, id, kind)?;
            agent.ensure_action_space(env.action_space())?;
            agent
        }
        None => Agent::new(kind, env.action_space(), config.bandit_config())?,
    };
    debug!(agent = %kind, seed, shuffle = args.shuffle, "starting run");

    let summary = run_simulation(&mut env, &mut agent, args.shuffle, &mut rng)?;

    let saved_agent = match &args.save_agent {
        Some(id) => Some(agent.save(&snapshot_dir, id)?),
        None => None,
    };

    let report = RunReport {
        seed,
        population_seed,
        summary,
        value_estimates: agent.as_bandit().map(|b| b.value_estimates().to_vec()),
        saved_agent,
    };

    if ctx.robot_mode {
        return emit_robot(&robot_ok(report));
    }
    emit_human(human_report(&report));
    Ok(())
}

fn human_report(report: &RunReport) -> HumanLayout {
    let summary = &report.summary;
    let mut layout = HumanLayout::new();
    layout
        .title("Simulation run")
        .kv("agent", summary.agent.as_str())
        .kv("seed", &report.seed.to_string())
        .kv("population seed", &report.population_seed.to_string())
        .kv("steps", &summary.steps.to_string())
        .kv("total reward", &format!("{:.0}", summary.total_reward))
        .kv("mean reward", &format!("{:.4}", summary.mean_reward))
        .kv("mean p(correct)", &format!("{:.4}", summary.mean_p_correct));
    if let Some(path) = &report.saved_agent {
        layout.kv("saved agent", &path.display().to_string());
    }

    layout.blank().section("Accuracy per student");
    for (idx, accuracy) in summary.student_accuracy.iter().enumerate() {
        layout.bullet(&format!("student {idx:>3}: {accuracy:.3}"));
    }

    if let Some(estimates) = &report.value_estimates {
        layout.blank().section("Top actions");
        let space = ActionSpace::new(estimates.len() / N_LEARNING_STYLES);
        let mut ranked: Vec<(usize, f64)> = estimates.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (action, value) in ranked.into_iter().take(5) {
            let Ok(example) = space.decode(action) else {
                continue;
            };
            let style = VarkStyle::from_index(example.style).map_or("?", VarkStyle::as_str);
            layout.bullet(&format!(
                "{} / {style}: {value:.4}",
                concept_name(example.concept)
            ));
        }
    }
    layout
}
