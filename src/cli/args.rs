use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line arguments for the `listenparty` binary
#[derive(Parser, Debug)]
#[command(name = "listenparty")]
#[command(about = "Persistent playback engine tools", version)]
pub struct Cli {
    /// Load configuration from this file instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to the rotating log file
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve media source paths to absolute URLs
    Resolve {
        /// Source paths to resolve
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Inspect or create configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Drive the engine against a simulated media element
    Simulate(SimulateArgs),
}

/// `config` subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print a single configuration value by dotted path
    Get {
        /// Path such as `player.sample_interval_ms`
        path: String,
    },
    /// Print the configuration JSON schema
    Schema,
    /// Print the configuration file locations
    Path,
    /// Write a default configuration file if none exists
    Init,
}

/// Arguments for `simulate`
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Media duration reported by the simulated element, in seconds
    #[arg(long, default_value_t = 180.0)]
    pub duration: f64,

    /// Delay before the simulated element reports metadata, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub load_latency: u64,

    /// How long each item plays before the next is selected, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub play_for: u64,

    /// Make the simulated element refuse to play
    #[arg(long)]
    pub reject_play: bool,

    /// Source paths that should fail to load (substring match)
    #[arg(long = "fail-on")]
    pub fail_on: Vec<String>,

    /// Source paths to select in turn
    #[arg(required = true)]
    pub paths: Vec<String>,
}
