//! irtsim generate - Write a population bundle to disk

use std::path::PathBuf;

use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::concepts::concept_name;
use crate::env::Population;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output file (default: ./population-c{C}-s{S}-q{Q}-seed{N}.json)
    #[arg(long, short, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Override the configured seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Serialize)]
struct GenerateReport {
    path: PathBuf,
    seed: u64,
    n_students: usize,
    n_concepts: usize,
    n_questions: usize,
    mean_avg_skill: f64,
}

pub fn run(ctx: &AppContext, args: &GenerateArgs) -> Result<()> {
    let mut simulation = ctx.config.simulation.clone();
    if let Some(seed) = args.seed {
        simulation.seed = seed;
    }
    let mut rng = StdRng::seed_from_u64(simulation.seed);
    let population = Population::generate(&simulation, &ctx.config.profile_generator(), &mut rng)?;

    let path = args
        .out
        .clone()
        .unwrap_or_else(|| ctx.project_root.join(population.default_file_name()));
    population.save(&path)?;

    let mean_avg_skill = population
        .students
        .iter()
        .map(crate::student::Student::avg_skill)
        .sum::<f64>()
        / population.n_students as f64;
    let report = GenerateReport {
        path,
        seed: population.seed,
        n_students: population.n_students,
        n_concepts: population.n_concepts,
        n_questions: population.n_questions,
        mean_avg_skill,
    };

    if ctx.robot_mode {
        return emit_robot(&robot_ok(report));
    }

    let concepts = (0..report.n_concepts)
        .map(concept_name)
        .collect::<Vec<_>>()
        .join(" ");
    let mut layout = HumanLayout::new();
    layout
        .title("Population generated")
        .kv("path", &report.path.display().to_string())
        .kv("seed", &report.seed.to_string())
        .kv("students", &report.n_students.to_string())
        .kv("questions", &report.n_questions.to_string())
        .kv("concepts", &concepts)
        .kv("mean avg skill", &format!("{:.3}", report.mean_avg_skill));
    emit_human(layout);
    Ok(())
}
