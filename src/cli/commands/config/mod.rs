//! Configuration management commands.
mod files;
mod get;
mod show;

use std::{path::PathBuf, sync::Arc};

pub use files::{InitCommand, PathCommand};
pub use get::GetCommand;
pub use show::{SchemaCommand, ShowCommand};

use crate::{
    cli::{Command, args::ConfigCommands},
    config::Config,
};

/// Builds the command for a parsed `config` subcommand.
///
/// # Arguments
///
/// * `command` - The parsed subcommand
/// * `config` - Effective configuration
/// * `config_path` - Explicit config file location, if one was given
pub fn build(
    command: ConfigCommands,
    config: Arc<Config>,
    config_path: Option<PathBuf>,
) -> Box<dyn Command> {
    match command {
        ConfigCommands::Show => Box::new(ShowCommand::new(config)),
        ConfigCommands::Get { path } => Box::new(GetCommand::new(config, path)),
        ConfigCommands::Schema => Box::new(SchemaCommand),
        ConfigCommands::Path => Box::new(PathCommand::new(config_path)),
        ConfigCommands::Init => Box::new(InitCommand::new(config_path)),
    }
}
