use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{Command, CommandResult},
    config::Config,
};

/// Prints the effective configuration, imports merged, as TOML.
pub struct ShowCommand {
    config: Arc<Config>,
}

impl ShowCommand {
    /// Creates a new ShowCommand
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for ShowCommand {
    async fn execute(&self) -> CommandResult {
        Ok(self.config.to_toml_string()?)
    }
}

/// Prints the JSON schema for the configuration file.
pub struct SchemaCommand;

#[async_trait]
impl Command for SchemaCommand {
    async fn execute(&self) -> CommandResult {
        Ok(Config::json_schema()?)
    }
}
