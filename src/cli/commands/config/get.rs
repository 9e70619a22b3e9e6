use std::sync::Arc;

use async_trait::async_trait;
use toml::Value;

use crate::{
    cli::{CliError, Command, CommandResult, formatting::format_toml_value},
    config::Config,
};

/// Command for reading a single value out of the effective configuration.
///
/// # Example Usage
///
/// ```bash
/// listenparty config get player.sample_interval_ms
/// listenparty config get resolver.cdn_host
/// ```
pub struct GetCommand {
    config: Arc<Config>,
    path: String,
}

impl GetCommand {
    /// Creates a new GetCommand for the dotted `path`.
    pub fn new(config: Arc<Config>, path: String) -> Self {
        Self { config, path }
    }
}

#[async_trait]
impl Command for GetCommand {
    /// Looks up and formats the value at the configured path.
    ///
    /// # Errors
    ///
    /// * `CliError::ConfigError` - If the configuration cannot be rendered
    /// * `CliError::InvalidArguments` - If the path names no value
    async fn execute(&self) -> CommandResult {
        let root = Value::try_from(self.config.as_ref())
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        let value = lookup(&root, &self.path).ok_or_else(|| {
            CliError::InvalidArguments(format!("Unknown configuration path '{}'", self.path))
        })?;

        Ok(format!("{}: {}", self.path, format_toml_value(value)))
    }
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |value, segment| value.get(segment))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn reads_nested_value() {
        let command = GetCommand::new(
            Arc::new(Config::default()),
            "player.sample_interval_ms".to_string(),
        );

        assert_eq!(command.execute().await.unwrap(), "player.sample_interval_ms: 500");
    }

    #[tokio::test]
    async fn unknown_path_is_an_argument_error() {
        let command = GetCommand::new(Arc::new(Config::default()), "player.tempo".to_string());

        assert!(matches!(
            command.execute().await,
            Err(CliError::InvalidArguments(_))
        ));
    }
}
