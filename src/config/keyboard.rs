use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Keyboard shortcut configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Whether the global play/pause shortcut is active.
    pub enabled: bool,

    /// Key name that toggles playback (e.g. "space", "k").
    pub toggle_key: String,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            toggle_key: "space".to_string(),
        }
    }
}
