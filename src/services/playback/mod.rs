//! Persistent playback.
//!
//! A single [`IntentStore`] describes what should be playing. A
//! [`PlaybackEngine`] reconciles one [`MediaElement`] toward that intent and
//! keeps playing while the rest of the application navigates around it.
//! [`SourceResolver`] turns media paths into fetchable URLs, and
//! [`KeyboardShortcuts`] wires the global play/pause key to the store.

/// Media element boundary and the simulated element
pub mod element;
mod engine;
mod error;
mod keyboard;
mod resolver;
mod store;
mod types;

pub use element::{
    ElementCall, ElementEvent, ElementEventKind, LoadToken, MediaElement, PlayRejection,
    SimulatedElement, SimulatedElementConfig,
};
pub use engine::PlaybackEngine;
pub use error::{EngineError, PlaybackError};
pub use keyboard::{FocusContext, KeyInput, KeyboardShortcuts, Modifiers, ShortcutOutcome};
pub use resolver::{Resolution, SourceResolver};
pub use store::{IntentChange, IntentFields, IntentStore, Subscription};
pub use types::{EngineState, MediaId, MediaRef, PlaybackIntent};
