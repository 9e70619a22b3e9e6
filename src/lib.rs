//! listenparty - persistent audio playback for a single-page listening app.
//!
//! Playback survives navigation: one intent store says what should be
//! playing, one engine owns the media element and keeps it in step, and
//! every page just reads or mutates the store.
//!
//! - Intent store with synchronous, filtered change notification
//! - Generation-stamped playback engine running as a tokio actor
//! - Media source resolution onto CDN, uploads, or origin hosts
//! - Guarded global play/pause shortcut
//! - TOML configuration with imports
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use listenparty::{
//!     config::Config,
//!     services::playback::{
//!         IntentStore, MediaRef, PlaybackEngine, SimulatedElement, SimulatedElementConfig,
//!         SourceResolver,
//!     },
//! };
//!
//! # async fn run() -> listenparty::Result<()> {
//! let config = Config::load_or_default()?;
//! let store = IntentStore::new(config.player.initial_volume());
//! let (element, events) = SimulatedElement::new(SimulatedElementConfig::default());
//!
//! let engine = PlaybackEngine::spawn(
//!     store.clone(),
//!     Arc::new(element),
//!     events,
//!     SourceResolver::new(config.resolver.clone()),
//!     &config.player,
//! );
//!
//! store.select(MediaRef::new("ep-1", "/uploads/media-uploads/ep-1.mp3"));
//! store.set_playing(true);
//! # let _ = engine;
//! # Ok(())
//! # }
//! ```

/// Configuration schema definitions and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface.
pub mod cli;

/// Playback services.
pub mod services;

/// Tracing subscriber setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{ListenPartyError, Result};
