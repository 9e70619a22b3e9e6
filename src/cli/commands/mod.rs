/// Configuration management commands
pub mod config;
/// Source path resolution
pub mod resolve;
/// Engine simulation against a simulated element
pub mod simulate;
