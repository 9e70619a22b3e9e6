use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::{format_description, format_header},
    },
    config::{Config, ConfigPaths},
};

/// Lists the configuration file and every file it imports.
pub struct PathCommand {
    config_path: Option<PathBuf>,
}

impl PathCommand {
    /// Creates a new PathCommand; `config_path` overrides the default location
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }
}

#[async_trait]
impl Command for PathCommand {
    /// # Errors
    ///
    /// Returns `CliError::ConfigError` if an imported file cannot be read.
    async fn execute(&self) -> CommandResult {
        let main = match &self.config_path {
            Some(path) => path.clone(),
            None => ConfigPaths::main_config()?,
        };

        let mut lines = vec![format_header("Configuration files")];

        if !main.exists() {
            lines.push(format!(
                "  {} {}",
                main.display(),
                format_description("(not created, defaults in use)")
            ));
            return Ok(lines.join("\n"));
        }

        for file in Config::get_all_config_files(&main)? {
            lines.push(format!("  {}", file.display()));
        }

        Ok(lines.join("\n"))
    }
}

/// Writes the default configuration to the main config file.
pub struct InitCommand {
    config_path: Option<PathBuf>,
}

impl InitCommand {
    /// Creates a new InitCommand; `config_path` overrides the default location
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }
}

#[async_trait]
impl Command for InitCommand {
    /// # Errors
    ///
    /// Returns `CliError::ConfigError` if the file cannot be written.
    async fn execute(&self) -> CommandResult {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => ConfigPaths::main_config()?,
        };

        if Config::write_default_file(&path).map_err(CliError::from)? {
            Ok(format!("Wrote default configuration to {}", path.display()))
        } else {
            Ok(format!("{} already exists, left untouched", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn init_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let command = InitCommand::new(Some(path.clone()));

        assert!(command.execute().await.unwrap().starts_with("Wrote"));
        assert!(path.exists());
        assert!(command.execute().await.unwrap().ends_with("left untouched"));
    }

    #[tokio::test]
    async fn path_lists_imports() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("config.toml");
        std::fs::write(&main, "imports = [\"@hosts\"]\n").unwrap();
        std::fs::write(dir.path().join("hosts.toml"), "[resolver]\n").unwrap();

        let output = PathCommand::new(Some(main)).execute().await.unwrap();

        assert!(output.contains("config.toml"));
        assert!(output.contains("hosts.toml"));
    }
}
