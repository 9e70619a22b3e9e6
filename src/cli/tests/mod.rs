//! Unit tests for CLI module
//!
//! Tests argument parsing and formatting helpers.

#![allow(clippy::panic)]

use clap::Parser;
use toml::Value;

use crate::cli::{
    Cli, Commands, ConfigCommands,
    formatting::{format_seconds, format_toml_value},
};

#[test]
fn format_toml_value_scalars() {
    assert_eq!(format_toml_value(&Value::String("hello world".to_string())), "\"hello world\"");
    assert_eq!(format_toml_value(&Value::Integer(-123)), "-123");
    assert_eq!(format_toml_value(&Value::Float(-2.5)), "-2.5");
    assert_eq!(format_toml_value(&Value::Boolean(true)), "true");
}

#[test]
fn format_toml_value_collections_show_size() {
    let value = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
    assert_eq!(format_toml_value(&value), "[2]");

    let mut table = toml::map::Map::new();
    table.insert("a".to_string(), Value::Boolean(false));
    assert_eq!(format_toml_value(&Value::Table(table)), "{1}");
}

#[test]
fn format_seconds_as_minutes() {
    assert_eq!(format_seconds(0.0), "0:00");
    assert_eq!(format_seconds(61.9), "1:01");
    assert_eq!(format_seconds(-3.0), "0:00");
    assert_eq!(format_seconds(f64::NAN), "0:00");
}

#[test]
fn parses_resolve_paths() {
    let cli = Cli::try_parse_from(["listenparty", "resolve", "/uploads/a.mp3", "b.mp3"])
        .unwrap_or_else(|e| panic!("{e}"));

    match cli.command {
        Commands::Resolve { paths } => assert_eq!(paths, ["/uploads/a.mp3", "b.mp3"]),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn parses_config_get_with_global_config_flag() {
    let cli = Cli::try_parse_from([
        "listenparty",
        "config",
        "get",
        "player.seek_guard_ms",
        "--config",
        "/tmp/lp.toml",
    ])
    .unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/lp.toml")));
    assert!(matches!(
        cli.command,
        Commands::Config(ConfigCommands::Get { ref path }) if path == "player.seek_guard_ms"
    ));
}

#[test]
fn simulate_defaults() {
    let cli = Cli::try_parse_from(["listenparty", "simulate", "/uploads/a.mp3"])
        .unwrap_or_else(|e| panic!("{e}"));

    let Commands::Simulate(args) = cli.command else {
        panic!("expected simulate");
    };
    assert_eq!(args.duration, 180.0);
    assert_eq!(args.load_latency, 50);
    assert!(!args.reject_play);
}

#[test]
fn resolve_requires_a_path() {
    assert!(Cli::try_parse_from(["listenparty", "resolve"]).is_err());
}
