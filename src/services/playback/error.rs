use super::MediaId;

/// Non-fatal playback failures.
///
/// None of these ever propagate to UI code as hard errors: they are
/// recorded in engine state, absorbed by clamping, or logged.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// Source path matched no rewrite rule and was resolved against the origin
    #[error("no rewrite rule for '{source_path}', resolved against origin")]
    ResolutionFallthrough {
        /// The unmatched source path
        source_path: String,
    },

    /// The element failed to load the item's source
    #[error("failed to load {item}: {cause}")]
    LoadFailure {
        /// Item that failed
        item: MediaId,
        /// Element-reported cause
        cause: String,
    },

    /// The element refused to start playback
    #[error("playback of {item} rejected: {reason}")]
    PlayRejected {
        /// Item that was to be played
        item: MediaId,
        /// Why the element refused
        reason: String,
    },

    /// A seek target fell outside the media and was clamped
    #[error("seek to {requested}s clamped to {applied}s")]
    SeekOutOfRange {
        /// Requested position
        requested: f64,
        /// Position actually applied
        applied: f64,
    },
}

/// Errors returned by [`PlaybackEngine`](super::PlaybackEngine) handle operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine task has shut down
    #[error("playback engine is not running")]
    EngineStopped,
}
