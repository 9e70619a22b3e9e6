/// Shared building blocks for services
pub mod common;
/// Persistent playback engine, intent store, and source resolution
pub mod playback;

pub use playback::{
    EngineState, IntentStore, MediaElement, MediaRef, PlaybackEngine, PlaybackIntent,
    SourceResolver,
};
