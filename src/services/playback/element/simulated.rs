use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{
    runtime::Handle,
    sync::mpsc,
    time::{Instant, sleep},
};
use tracing::trace;

use super::{ElementEvent, ElementEventKind, LoadToken, MediaElement, PlayRejection};

/// How a [`SimulatedElement`] behaves
#[derive(Debug, Clone)]
pub struct SimulatedElementConfig {
    /// Delay between `load` and the automatic metadata event
    pub load_latency: Duration,
    /// Delay before `play` settles
    pub play_latency: Duration,
    /// Duration reported once metadata loads; NaN for a live stream
    pub media_duration: f64,
    /// Emit metadata (or a load error) automatically after `load_latency`
    pub auto_metadata: bool,
    /// Emit `Ended` automatically when the playhead reaches the end
    pub auto_end: bool,
    /// Refuse every `play` call with this reason
    pub reject_play: Option<String>,
    /// URLs containing any of these fragments fail to load
    pub fail_on: Vec<String>,
}

impl Default for SimulatedElementConfig {
    fn default() -> Self {
        Self {
            load_latency: Duration::from_millis(50),
            play_latency: Duration::ZERO,
            media_duration: 180.0,
            auto_metadata: true,
            auto_end: true,
            reject_play: None,
            fail_on: Vec::new(),
        }
    }
}

impl SimulatedElementConfig {
    /// An element that never emits anything on its own; tests drive it with
    /// [`SimulatedElement::emit`].
    pub fn manual() -> Self {
        Self {
            auto_metadata: false,
            auto_end: false,
            ..Self::default()
        }
    }
}

/// A call made on a [`SimulatedElement`], recorded in order
#[derive(Debug, Clone, PartialEq)]
pub enum ElementCall {
    /// `load(url, token)`
    Load {
        /// Assigned source
        url: String,
        /// Generation of the load
        token: LoadToken,
    },
    /// `clear_source()`
    ClearSource,
    /// `set_volume(volume)`
    SetVolume(f64),
    /// `set_muted(muted)`
    SetMuted(bool),
    /// `set_current_time(seconds)`
    SetCurrentTime(f64),
    /// `pause()`
    Pause,
    /// `play()`
    Play,
}

/// In-memory media element driven by the tokio clock.
///
/// Cloning shares the element. Used by the `simulate` command and by tests,
/// where the paused tokio clock makes load and playback timing deterministic.
#[derive(Clone)]
pub struct SimulatedElement {
    inner: Arc<Inner>,
}

struct Inner {
    config: SimulatedElementConfig,
    state: Mutex<ElementState>,
    events: mpsc::UnboundedSender<ElementEvent>,
}

#[derive(Default)]
struct ElementState {
    source: Option<String>,
    token: LoadToken,
    reported_duration: Option<f64>,
    offset: f64,
    playing_since: Option<Instant>,
    epoch: u64,
    volume: f64,
    muted: bool,
    reject_play: Option<String>,
    calls: Vec<ElementCall>,
}

impl ElementState {
    fn position(&self) -> f64 {
        let elapsed = self
            .playing_since
            .map(|since| since.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        let position = self.offset + elapsed;

        match self.reported_duration {
            Some(duration) if duration.is_finite() => position.min(duration),
            _ => position,
        }
    }

    fn remaining(&self) -> Option<Duration> {
        let duration = self.reported_duration.filter(|d| d.is_finite())?;
        Some(Duration::from_secs_f64((duration - self.position()).max(0.0)))
    }

    fn invalidate(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }
}

impl SimulatedElement {
    /// Create an element and the receiving end of its event channel.
    pub fn new(config: SimulatedElementConfig) -> (Self, mpsc::UnboundedReceiver<ElementEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let state = ElementState {
            volume: 1.0,
            reject_play: config.reject_play.clone(),
            ..ElementState::default()
        };

        let element = Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(state),
                events,
            }),
        };

        (element, rx)
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<ElementCall> {
        self.lock().calls.clone()
    }

    /// Return and forget the recorded calls
    pub fn take_calls(&self) -> Vec<ElementCall> {
        std::mem::take(&mut self.lock().calls)
    }

    /// Currently assigned source
    pub fn source(&self) -> Option<String> {
        self.lock().source.clone()
    }

    /// Token of the most recent load
    pub fn current_token(&self) -> LoadToken {
        self.lock().token
    }

    /// Whether the playhead is advancing
    pub fn is_playing(&self) -> bool {
        self.lock().playing_since.is_some()
    }

    /// Last volume set, 0.0 to 1.0
    pub fn volume(&self) -> f64 {
        self.lock().volume
    }

    /// Last mute flag set
    pub fn is_muted(&self) -> bool {
        self.lock().muted
    }

    /// Change whether subsequent `play` calls are refused
    pub fn set_reject_play(&self, reason: Option<String>) {
        self.lock().reject_play = reason;
    }

    /// Emit an event for the current load
    pub fn emit(&self, kind: ElementEventKind) {
        let token = self.current_token();
        self.emit_for(token, kind);
    }

    /// Emit an event tagged with an arbitrary token, current or stale.
    pub fn emit_for(&self, token: LoadToken, kind: ElementEventKind) {
        {
            let mut state = self.lock();
            if token == state.token {
                match &kind {
                    ElementEventKind::MetadataLoaded { duration } => {
                        state.reported_duration = Some(*duration);
                    }
                    ElementEventKind::Ended => {
                        state.offset = state.position();
                        state.playing_since = None;
                        state.invalidate();
                    }
                    ElementEventKind::Error { .. } => {
                        state.playing_since = None;
                        state.invalidate();
                    }
                }
            }
        }

        trace!(%token, ?kind, "simulated element event");
        let _ = self.inner.events.send(ElementEvent { token, kind });
    }

    fn lock(&self) -> MutexGuard<'_, ElementState> {
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn record(&self, call: ElementCall) -> MutexGuard<'_, ElementState> {
        let mut state = self.lock();
        state.calls.push(call);
        state
    }

    fn spawn_metadata(&self, url: &str, token: LoadToken) {
        let Ok(runtime) = Handle::try_current() else {
            return;
        };

        let failed = self
            .inner
            .config
            .fail_on
            .iter()
            .any(|fragment| url.contains(fragment.as_str()));
        let element = self.clone();

        runtime.spawn(async move {
            sleep(element.inner.config.load_latency).await;

            if element.current_token() != token || element.source().is_none() {
                return;
            }

            let kind = if failed {
                ElementEventKind::Error {
                    cause: "media source not supported".to_string(),
                }
            } else {
                ElementEventKind::MetadataLoaded {
                    duration: element.inner.config.media_duration,
                }
            };
            element.emit_for(token, kind);
        });
    }

    fn schedule_end(&self, state: &ElementState) {
        if !self.inner.config.auto_end || state.playing_since.is_none() {
            return;
        }
        let Some(remaining) = state.remaining() else {
            return;
        };
        let Ok(runtime) = Handle::try_current() else {
            return;
        };

        let epoch = state.epoch;
        let token = state.token;
        let element = self.clone();

        runtime.spawn(async move {
            sleep(remaining).await;

            if element.lock().epoch == epoch {
                element.emit_for(token, ElementEventKind::Ended);
            }
        });
    }
}

#[async_trait]
impl MediaElement for SimulatedElement {
    fn load(&self, url: &str, token: LoadToken) {
        {
            let mut state = self.record(ElementCall::Load {
                url: url.to_string(),
                token,
            });
            state.source = Some(url.to_string());
            state.token = token;
            state.reported_duration = None;
            state.offset = 0.0;
            state.playing_since = None;
            state.invalidate();
        }

        if self.inner.config.auto_metadata {
            self.spawn_metadata(url, token);
        }
    }

    fn clear_source(&self) {
        let mut state = self.record(ElementCall::ClearSource);
        state.source = None;
        state.reported_duration = None;
        state.offset = 0.0;
        state.playing_since = None;
        state.invalidate();
    }

    fn set_volume(&self, volume: f64) {
        let mut state = self.record(ElementCall::SetVolume(volume));
        state.volume = volume.clamp(0.0, 1.0);
    }

    fn set_muted(&self, muted: bool) {
        let mut state = self.record(ElementCall::SetMuted(muted));
        state.muted = muted;
    }

    fn current_time(&self) -> f64 {
        self.lock().position()
    }

    fn duration(&self) -> f64 {
        self.lock().reported_duration.unwrap_or(f64::NAN)
    }

    fn set_current_time(&self, seconds: f64) {
        let mut state = self.record(ElementCall::SetCurrentTime(seconds));
        state.offset = seconds.max(0.0);
        if state.playing_since.is_some() {
            state.playing_since = Some(Instant::now());
        }
        state.invalidate();
        self.schedule_end(&state);
    }

    fn pause(&self) {
        let mut state = self.record(ElementCall::Pause);
        if state.playing_since.is_some() {
            state.offset = state.position();
            state.playing_since = None;
        }
        state.invalidate();
    }

    async fn play(&self) -> Result<(), PlayRejection> {
        let token = {
            let state = self.record(ElementCall::Play);
            if let Some(reason) = &state.reject_play {
                return Err(PlayRejection::new(reason.clone()));
            }
            if state.source.is_none() {
                return Err(PlayRejection::new("no source assigned"));
            }
            state.token
        };

        if !self.inner.config.play_latency.is_zero() {
            sleep(self.inner.config.play_latency).await;
        }

        let mut state = self.lock();
        if state.token != token || state.source.is_none() {
            return Err(PlayRejection::new("source changed before playback started"));
        }

        if state.playing_since.is_none() {
            state.playing_since = Some(Instant::now());
            state.invalidate();
            self.schedule_end(&state);
        }

        Ok(())
    }
}
