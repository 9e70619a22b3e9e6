//! The persistent playback engine.
//!
//! One engine owns one media element for the lifetime of the host. It
//! follows the intent store, loading whatever is selected and driving the
//! transport toward `is_playing`, and writes position and duration back.
//! All engine logic runs on a single actor task; [`PlaybackEngine`] is a
//! cheap handle to it.

mod actor;

use std::sync::Arc;

use futures::Stream;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{info, instrument};

use actor::EngineActor;

use crate::{config::PlayerConfig, services::common::Property};

use super::{
    EngineError, EngineState, IntentFields, IntentStore, MediaElement, SourceResolver,
    element::ElementEvent,
};

pub(super) enum EngineCommand {
    Seek {
        seconds: f64,
        relative: bool,
        reply: oneshot::Sender<f64>,
    },
    Shutdown {
        done: oneshot::Sender<()>,
    },
}

/// Handle to a running playback engine.
///
/// Cloning is cheap. The engine stops, tearing down the element, when
/// [`shutdown`](Self::shutdown) is called or every handle is dropped.
#[derive(Clone)]
pub struct PlaybackEngine {
    commands: mpsc::Sender<EngineCommand>,
    state: Property<EngineState>,
}

impl PlaybackEngine {
    /// Start an engine bound to `store` and `element`.
    ///
    /// `events` is the element's event channel. Anything already selected in
    /// the store is loaded right away. Must be called within a tokio runtime.
    #[instrument(skip_all, fields(sample_ms = config.sample_interval_ms, guard_ms = config.seek_guard_ms))]
    pub fn spawn(
        store: IntentStore,
        element: Arc<dyn MediaElement>,
        events: mpsc::UnboundedReceiver<ElementEvent>,
        resolver: SourceResolver,
        config: &PlayerConfig,
    ) -> Self {
        let (commands, command_rx) = mpsc::channel(32);
        let state = Property::new(EngineState::Idle);

        let subscription = store.subscribe_to(
            IntentFields::SELECTED | IntentFields::PLAYING | IntentFields::VOLUME | IntentFields::MUTED,
        );

        let (actor, settled_rx) =
            EngineActor::new(store, element, resolver, state.clone(), config.seek_guard());
        let sample_interval = config.sample_interval();

        tokio::spawn(async move {
            actor
                .run(command_rx, events, subscription, settled_rx, sample_interval)
                .await;
        });

        info!("Playback engine started");

        Self { commands, state }
    }

    /// Current engine state
    pub fn state(&self) -> EngineState {
        self.state.get()
    }

    /// Stream of engine states, starting with the current one
    pub fn watch_state(&self) -> impl Stream<Item = EngineState> + Send + use<> {
        self.state.watch()
    }

    /// Raw state receiver, for `wait_for`-style waiting
    pub fn state_receiver(&self) -> watch::Receiver<EngineState> {
        self.state.receiver()
    }

    /// Whether the engine task is still running
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Seek to an absolute position.
    ///
    /// The target is clamped to `[0, duration]`. Returns the position applied.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EngineStopped`] if the engine has shut down.
    #[instrument(skip(self))]
    pub async fn seek(&self, seconds: f64) -> Result<f64, EngineError> {
        self.send_seek(seconds, false).await
    }

    /// Seek relative to the current playhead.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EngineStopped`] if the engine has shut down.
    #[instrument(skip(self))]
    pub async fn seek_relative(&self, delta_seconds: f64) -> Result<f64, EngineError> {
        self.send_seek(delta_seconds, true).await
    }

    /// Tear down the element binding and stop the engine task.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EngineStopped`] if the engine had already stopped.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        let (done, done_rx) = oneshot::channel();

        self.commands
            .send(EngineCommand::Shutdown { done })
            .await
            .map_err(|_| EngineError::EngineStopped)?;

        done_rx.await.map_err(|_| EngineError::EngineStopped)
    }

    async fn send_seek(&self, seconds: f64, relative: bool) -> Result<f64, EngineError> {
        let (reply, reply_rx) = oneshot::channel();

        self.commands
            .send(EngineCommand::Seek {
                seconds,
                relative,
                reply,
            })
            .await
            .map_err(|_| EngineError::EngineStopped)?;

        reply_rx.await.map_err(|_| EngineError::EngineStopped)
    }
}
