//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod config;
pub mod generate;
pub mod run;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::run(ctx, args),
        Commands::Generate(args) => generate::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate a teaching run with one agent
    Run(run::RunArgs),

    /// Generate a population bundle (students and questions)
    Generate(generate::GenerateArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}
