use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
///
/// Each variant carries enough context for a one-line message on stderr.
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid arguments were provided to a command.
    ///
    /// Returned when argument values parse but make no sense together,
    /// such as a negative duration or an unknown configuration path.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An error occurred in the configuration system.
    ///
    /// Wraps loading, parsing, and serialization failures.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The playback engine failed or stopped unexpectedly.
    #[error("Playback error: {0}")]
    PlaybackError(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<crate::ListenPartyError> for CliError {
    fn from(error: crate::ListenPartyError) -> Self {
        CliError::ConfigError(error.to_string())
    }
}

/// Type alias for command execution results.
///
/// Commands return their output as a String; the binary prints it.
pub type CommandResult = Result<String, CliError>;

/// Trait implemented by every CLI command.
///
/// Commands receive their parsed arguments and dependencies through
/// their constructors.
#[async_trait]
pub trait Command: Send + Sync {
    /// Executes the command.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for any execution failure, including invalid
    /// argument values and configuration errors.
    async fn execute(&self) -> CommandResult;
}
