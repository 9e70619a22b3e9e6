use std::{path::PathBuf, sync::Arc};

use tracing::instrument;

use crate::{config::Config, services::playback::SourceResolver};

use super::{
    CommandResult,
    args::Commands,
    commands::{config, resolve::ResolveCommand, simulate::SimulateCommand},
    types::Command,
};

/// High-level service for executing CLI commands.
///
/// Holds the effective configuration and turns parsed arguments into
/// commands that share it.
pub struct CliService {
    config: Arc<Config>,
    config_path: Option<PathBuf>,
}

impl CliService {
    /// Creates a new CLI service.
    ///
    /// # Arguments
    /// * `config` - Effective configuration
    /// * `config_path` - Explicit config file location, if one was given
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
        }
    }

    /// Executes a parsed command.
    ///
    /// # Errors
    /// Returns whatever `CliError` the command fails with.
    #[instrument(skip(self))]
    pub async fn execute(&self, command: Commands) -> CommandResult {
        self.build(command).execute().await
    }

    fn build(&self, command: Commands) -> Box<dyn Command> {
        match command {
            Commands::Resolve { paths } => Box::new(ResolveCommand::new(
                SourceResolver::new(self.config.resolver.clone()),
                paths,
            )),
            Commands::Config(command) => {
                config::build(command, Arc::clone(&self.config), self.config_path.clone())
            }
            Commands::Simulate(args) => {
                Box::new(SimulateCommand::new(Arc::clone(&self.config), args))
            }
        }
    }
}
