//! Command-line interface.
//!
//! Arguments are parsed with clap into [`Commands`]; [`CliService`] turns
//! them into [`Command`]s that return their output as a string.

mod args;
/// Command implementations
pub mod commands;
pub mod formatting;
mod service;
mod types;

pub use args::{Cli, Commands, ConfigCommands, SimulateArgs};
pub use service::CliService;
pub use types::{CliError, Command, CommandResult};

#[cfg(test)]
mod tests;
