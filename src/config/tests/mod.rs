//! Unit tests for config module
//!
//! Tests configuration types, defaults, and serialization.
//! Filesystem access is confined to temporary directories.

#![allow(clippy::panic, clippy::unwrap_used)]

use std::fs;

use tempfile::TempDir;

use crate::config::{Config, LogLevel, PlayerConfig};

#[test]
fn config_serialize_toml() {
    let config = Config::default();

    let toml_str = config.to_toml_string().unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[player]"));
    assert!(toml_str.contains("[resolver]"));
    assert!(toml_str.contains("[keyboard]"));
}

#[test]
fn config_deserialize_partial_sections() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [player]
        seek_guard_ms = 250
    "#;

    let config: Config = toml::from_str(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.player.seek_guard_ms, 250);
    assert_eq!(config.player.sample_interval_ms, 500);
    assert!(config.keyboard.enabled);
}

#[test]
fn config_serialize_roundtrip() {
    let original = Config::default();

    let toml_str = original.to_toml_string().unwrap();
    let deserialized: Config = toml::from_str(&toml_str).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn config_empty_toml() {
    let config: Config = toml::from_str("").unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn player_config_guards_zero_interval() {
    let config = PlayerConfig {
        sample_interval_ms: 0,
        seek_guard_ms: 0,
        initial_volume: 180,
    };

    assert_eq!(config.sample_interval().as_millis(), 1);
    assert_eq!(config.seek_guard().as_millis(), 0);
    assert_eq!(config.initial_volume(), 100);
}

#[test]
fn json_schema_names_sections() {
    let schema = Config::json_schema().unwrap();

    assert!(schema.contains("sample_interval_ms"));
    assert!(schema.contains("uploads_prefix"));
}

#[test]
fn load_with_imports_merges_beneath_main_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("hosts.toml"),
        r#"
[resolver]
cdn_host = "https://cdn.example.test"
app_origin = "https://imported.example.test"
"#,
    )
    .unwrap();
    let main = dir.path().join("config.toml");
    fs::write(
        &main,
        r#"
imports = ["@hosts"]

[resolver]
app_origin = "https://party.example.test"
"#,
    )
    .unwrap();

    let config = Config::load_with_imports(&main).unwrap();

    assert_eq!(config.resolver.cdn_host, "https://cdn.example.test");
    assert_eq!(config.resolver.app_origin, "https://party.example.test");
    assert_eq!(config.resolver.uploads_prefix, "/uploads/");
}

#[test]
fn load_with_imports_rejects_cycles() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.toml"), "imports = [\"@b\"]\n").unwrap();
    fs::write(dir.path().join("b.toml"), "imports = [\"@a\"]\n").unwrap();

    let err = Config::load_with_imports(&dir.path().join("a.toml")).unwrap_err();

    assert!(err.to_string().contains("Circular import"));
}

#[test]
fn load_with_imports_reports_missing_file() {
    let dir = TempDir::new().unwrap();

    let result = Config::load_with_imports(&dir.path().join("missing.toml"));

    assert!(result.is_err());
}

#[test]
fn write_default_file_does_not_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    assert!(Config::write_default_file(&path).unwrap());
    assert!(!Config::write_default_file(&path).unwrap());

    let loaded = Config::load_with_imports(&path).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn collects_transitive_imports_once() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("shared.toml"), "").unwrap();
    fs::write(dir.path().join("a.toml"), "imports = [\"@shared\"]\n").unwrap();
    let main = dir.path().join("config.toml");
    fs::write(&main, "imports = [\"@a\", \"@shared\"]\n").unwrap();

    let files = Config::get_all_config_files(&main).unwrap();

    assert_eq!(files.len(), 3);
}
