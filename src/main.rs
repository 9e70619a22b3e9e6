//! listenparty command-line entry point.
//!
//! Resolves media paths, inspects configuration, and drives the playback
//! engine against a simulated element.

use std::{error::Error, process};

use clap::Parser;
use listenparty::{
    cli::{Cli, CliService, formatting::format_error},
    config::Config,
    tracing_config,
};
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_with_imports(path),
        None => Config::load_or_default(),
    };

    let log_level = loaded
        .as_ref()
        .map(|config| config.general.log_level)
        .unwrap_or_default();

    let _guard = if cli.log_file {
        Some(tracing_config::init_with_file(log_level)?)
    } else {
        tracing_config::init(log_level)?;
        None
    };

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to load configuration");
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };
    debug!(?config, "Configuration loaded");

    let service = CliService::new(config, cli.config.clone());

    match service.execute(cli.command).await {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
