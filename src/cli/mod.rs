use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub mod commands;
pub mod output;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "irtsim",
    version,
    about = "Simulate students under an IRT model and train teaching agents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the global and project files
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output on stdout
    #[arg(long, global = true)]
    pub robot: bool,
}
