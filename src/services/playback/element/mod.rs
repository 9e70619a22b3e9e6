//! The media element boundary.
//!
//! The engine drives playback through [`MediaElement`] and hears back from it
//! through [`ElementEvent`]s on an unbounded channel. Every event is tagged
//! with the [`LoadToken`] of the `load` call that caused it, which is how the
//! engine tells a stale callback from a current one.

mod simulated;

use std::fmt;

use async_trait::async_trait;

pub use simulated::{ElementCall, SimulatedElement, SimulatedElementConfig};

/// Generation stamp attached to a `load` call and to every event it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LoadToken(pub u64);

impl LoadToken {
    /// The token that follows this one
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something the element reports about a load
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEventKind {
    /// Metadata is available; `duration` may be NaN or infinite for streams
    MetadataLoaded {
        /// Reported duration in seconds
        duration: f64,
    },
    /// Playback reached the end of the media
    Ended,
    /// The source could not be loaded or decoded
    Error {
        /// Element-reported cause
        cause: String,
    },
}

/// An element event tagged with the load that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ElementEvent {
    /// Load this event belongs to
    pub token: LoadToken,
    /// What happened
    pub kind: ElementEventKind,
}

/// The element refused to start playback, e.g. an autoplay policy
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct PlayRejection {
    /// Why playback was refused
    pub reason: String,
}

impl PlayRejection {
    /// Create a rejection with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A single media output the engine can bind to.
///
/// Owned solely by one engine. Synchronous methods must not block; `play`
/// is the only operation that can be refused.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Assign a new source and start loading it.
    ///
    /// Events produced by this load must carry `token`.
    fn load(&self, url: &str, token: LoadToken);

    /// Detach the current source and release its resources
    fn clear_source(&self);

    /// Set output volume, 0.0 to 1.0
    fn set_volume(&self, volume: f64);

    /// Set the mute flag
    fn set_muted(&self, muted: bool);

    /// Current playhead in seconds
    fn current_time(&self) -> f64;

    /// Media duration in seconds; NaN when unknown
    fn duration(&self) -> f64;

    /// Move the playhead
    fn set_current_time(&self, seconds: f64);

    /// Pause playback
    fn pause(&self);

    /// Start playback.
    ///
    /// # Errors
    ///
    /// Returns [`PlayRejection`] when the element refuses to play.
    async fn play(&self) -> Result<(), PlayRejection>;
}
