//! Configuration schema definitions and validation.
//!
//! Defines the complete configuration structure for listenparty: general
//! settings, playback engine tuning, source resolution hosts, and keyboard
//! shortcuts. All configurations are serializable to/from TOML format.

mod general;
mod keyboard;
mod loading;
mod paths;
mod player;
mod resolver;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogLevel};
pub use keyboard::KeyboardConfig;
pub use paths::ConfigPaths;
pub use player::PlayerConfig;
pub use resolver::ResolverConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure for listenparty.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Playback engine timing and defaults.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Media source URL rewriting rules.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Global keyboard shortcut settings.
    #[serde(default)]
    pub keyboard: KeyboardConfig,
}

impl Config {
    /// Renders the configuration as a TOML document.
    ///
    /// # Errors
    /// Returns error if the configuration cannot be serialized.
    pub fn to_toml_string(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::ListenPartyError::ConfigValidation {
            component: "config serialization".to_string(),
            details: e.to_string(),
        })
    }

    /// Returns the JSON schema describing the configuration file.
    ///
    /// # Errors
    /// Returns error if the schema cannot be rendered as JSON.
    pub fn json_schema() -> crate::Result<String> {
        let schema = schemars::schema_for!(Config);
        serde_json::to_string_pretty(&schema).map_err(|e| {
            crate::ListenPartyError::ConfigValidation {
                component: "config schema".to_string(),
                details: e.to_string(),
            }
        })
    }
}
