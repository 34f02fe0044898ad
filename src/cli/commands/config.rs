//! irtsim config - Show the effective configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, robot_ok};
use crate::error::{Result, SimError};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print JSON instead of TOML
    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    if ctx.robot_mode {
        return emit_robot(&robot_ok(&ctx.config));
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        return Ok(());
    }
    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| SimError::Config(format!("render config: {err}")))?;
    print!("{rendered}");
    Ok(())
}
