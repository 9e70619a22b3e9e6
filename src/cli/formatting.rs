//! Formatting utilities for CLI output.
//!
//! Provides consistent, colored formatting for headers, errors, and
//! configuration values.

use toml::Value;

use crate::services::playback::EngineState;

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats descriptions with muted styling
pub fn format_description(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats an engine state, colored by how healthy it is
pub fn format_state(state: &EngineState) -> String {
    let color = match state {
        EngineState::Playing(_) => Colors::GREEN,
        EngineState::Error(_, _) => Colors::RED,
        EngineState::Loading(_) | EngineState::Ready(_) => Colors::YELLOW,
        EngineState::Idle => Colors::DIM,
    };

    format!("{}{}{}", color, state, Colors::RESET)
}

/// Formats seconds as `m:ss`
pub fn format_seconds(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };

    format!("{}:{:02}", total / 60, total % 60)
}

/// Formats a TOML value for human-readable CLI output.
///
/// Complex types like arrays and tables show their size rather than
/// full contents.
///
/// # Examples
///
/// ```
/// use listenparty::cli::formatting::format_toml_value;
///
/// let value = toml::Value::String("hello".to_string());
/// assert_eq!(format_toml_value(&value), "\"hello\"");
///
/// let value = toml::Value::Integer(42);
/// assert_eq!(format_toml_value(&value), "42");
/// ```
pub fn format_toml_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(arr) => format!("[{}]", arr.len()),
        Value::Table(table) => format!("{{{}}}", table.len()),
        Value::Datetime(datetime) => datetime.to_string(),
    }
}
