use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Playback engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// How often the engine samples the element's playhead, in milliseconds.
    pub sample_interval_ms: u64,

    /// How long position sampling stays suppressed after a seek, in milliseconds.
    pub seek_guard_ms: u64,

    /// Volume the intent store starts with (0-100).
    pub initial_volume: u8,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 500,
            seek_guard_ms: 100,
            initial_volume: 100,
        }
    }
}

impl PlayerConfig {
    /// Sampler period. Never zero, a zero period would spin the engine.
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }

    /// Seek suppression window.
    pub fn seek_guard(&self) -> Duration {
        Duration::from_millis(self.seek_guard_ms)
    }

    /// Initial volume clamped to the valid percent range.
    pub fn initial_volume(&self) -> u8 {
        self.initial_volume.min(100)
    }
}
