use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

pub struct AppContext {
    /// Directory searched for `irtsim.toml`.
    pub project_root: PathBuf,
    pub config: Config,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let project_root = Self::find_project_root()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;

        Ok(Self {
            project_root,
            config,
            robot_mode: cli.robot,
            verbosity: cli.verbose,
        })
    }

    fn find_project_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("IRTSIM_ROOT") {
            return Ok(PathBuf::from(root));
        }
        Ok(std::env::current_dir()?)
    }
}
