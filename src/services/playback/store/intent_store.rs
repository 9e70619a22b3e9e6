use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicUsize, Ordering},
};

use async_stream::stream;
use futures::Stream;
use tokio::sync::{mpsc, watch};
use tracing::trace;

use crate::services::playback::{MediaId, MediaRef, PlaybackIntent};

use super::{IntentChange, IntentFields, Subscription};

/// Shared source of truth for what should be playing.
///
/// Cloning is cheap; all clones share one intent. Every mutator is
/// synchronous and total, and enqueues an [`IntentChange`] for every
/// matching subscriber before it returns. Mutations that leave the intent
/// unchanged are not committed and notify nobody, except [`select`],
/// which always commits because re-selecting is how a failed load is retried.
///
/// [`select`]: IntentStore::select
#[derive(Clone)]
pub struct IntentStore {
    inner: Arc<StoreInner>,
}

pub(super) struct StoreInner {
    state: Mutex<StoreState>,
    snapshots: watch::Sender<Arc<PlaybackIntent>>,
    next_subscriber_id: AtomicUsize,
    initial_volume: u8,
}

struct StoreState {
    intent: Arc<PlaybackIntent>,
    sequence: u64,
    subscribers: Vec<Subscriber>,
}

struct Subscriber {
    id: usize,
    filter: IntentFields,
    sender: mpsc::UnboundedSender<IntentChange>,
}

impl Default for IntentStore {
    fn default() -> Self {
        Self::new(100)
    }
}

impl IntentStore {
    /// Creates an empty store whose volume starts (and resets) at `initial_volume`.
    pub fn new(initial_volume: u8) -> Self {
        let intent = Arc::new(PlaybackIntent::with_volume(initial_volume));
        let (snapshots, _) = watch::channel(Arc::clone(&intent));

        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(StoreState {
                    intent,
                    sequence: 0,
                    subscribers: Vec::new(),
                }),
                snapshots,
                next_subscriber_id: AtomicUsize::new(1),
                initial_volume: initial_volume.min(100),
            }),
        }
    }

    /// Immutable snapshot of the current intent.
    pub fn snapshot(&self) -> Arc<PlaybackIntent> {
        Arc::clone(&self.inner.lock().intent)
    }

    /// Id of the currently selected item.
    pub fn selected_id(&self) -> Option<MediaId> {
        self.snapshot().selected_id().cloned()
    }

    /// Number of committed mutations so far.
    pub fn sequence(&self) -> u64 {
        self.inner.lock().sequence
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.inner.lock();
        state.subscribers.retain(|sub| !sub.sender.is_closed());
        state.subscribers.len()
    }

    /// Replaces the selected item and rewinds position and duration.
    ///
    /// Leaves `is_playing` alone; the caller decides whether to auto-play.
    pub fn select(&self, item: MediaRef) {
        self.commit("select", IntentFields::SELECTED, |intent| {
            intent.selected_item = Some(item);
            intent.position_seconds = 0.0;
            intent.duration_seconds = 0.0;
        });
    }

    /// Sets the desired transport state. No-op without a selected item.
    pub fn set_playing(&self, playing: bool) {
        self.commit("set_playing", IntentFields::empty(), |intent| {
            intent.is_playing = playing;
        });
    }

    /// Flips the desired transport state. No-op without a selected item.
    pub fn toggle_playing(&self) {
        self.commit("toggle_playing", IntentFields::empty(), |intent| {
            intent.is_playing = !intent.is_playing;
        });
    }

    /// Records the playhead, clamped to `[0, duration]` once duration is known.
    pub fn set_position(&self, seconds: f64) {
        self.commit("set_position", IntentFields::empty(), |intent| {
            intent.position_seconds = sanitize_seconds(seconds);
        });
    }

    /// Records the media duration, clamped to `[0, ∞)`.
    ///
    /// Re-clamps the position so it never exceeds the new duration.
    pub fn set_duration(&self, seconds: f64) {
        self.commit("set_duration", IntentFields::empty(), |intent| {
            intent.duration_seconds = sanitize_seconds(seconds);
        });
    }

    /// Sets the volume, clamped to `[0, 100]`. Any audible volume unmutes.
    pub fn set_volume(&self, percent: i32) {
        let percent = u8::try_from(percent.clamp(0, 100)).unwrap_or(100);

        self.commit("set_volume", IntentFields::empty(), |intent| {
            intent.volume_percent = percent;
            if percent > 0 {
                intent.is_muted = false;
            }
        });
    }

    /// Flips the mute flag.
    pub fn toggle_mute(&self) {
        self.commit("toggle_mute", IntentFields::empty(), |intent| {
            intent.is_muted = !intent.is_muted;
        });
    }

    /// Resets every field, dismissing the global player.
    pub fn clear(&self) {
        let initial_volume = self.inner.initial_volume;

        self.commit("clear", IntentFields::empty(), |intent| {
            *intent = PlaybackIntent::with_volume(initial_volume);
        });
    }

    /// Subscribe to every committed mutation.
    ///
    /// The queue is unbounded and keeps every change until it is drained,
    /// including the position updates a running engine commits every sample
    /// interval. Consumers that only render the current intent should use
    /// [`watch`](Self::watch), which keeps the latest snapshot only, or narrow
    /// the queue with [`subscribe_to`](Self::subscribe_to).
    pub fn subscribe(&self) -> Subscription {
        self.subscribe_to(IntentFields::all())
    }

    /// Subscribe to mutations touching any of `fields`.
    ///
    /// Changes that touch none of `fields` are never queued.
    pub fn subscribe_to(&self, fields: IntentFields) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);

        self.inner.lock().subscribers.push(Subscriber {
            id,
            filter: fields,
            sender,
        });

        Subscription::new(id, Arc::downgrade(&self.inner), receiver)
    }

    /// Stream of snapshots.
    ///
    /// Yields the current snapshot immediately, then the latest snapshot
    /// after each committed mutation. A slow consumer sees only the latest.
    pub fn watch(&self) -> impl Stream<Item = Arc<PlaybackIntent>> + Send + use<> {
        tokio_stream::wrappers::WatchStream::new(self.inner.snapshots.subscribe())
    }

    /// Stream of the selected item, yielding only when its identity changes.
    pub fn watch_selection(&self) -> impl Stream<Item = Option<MediaRef>> + Send + use<> {
        let mut rx = self.inner.snapshots.subscribe();

        stream! {
            let mut last: Option<Option<MediaId>> = None;

            loop {
                let selected = rx.borrow_and_update().selected_item.clone();
                let id = selected.as_ref().map(|item| item.id.clone());

                if last.as_ref() != Some(&id) {
                    last = Some(id);
                    yield selected;
                }

                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    fn commit(
        &self,
        operation: &'static str,
        always: IntentFields,
        mutate: impl FnOnce(&mut PlaybackIntent),
    ) {
        let mut state = self.inner.lock();

        let mut next = PlaybackIntent::clone(&state.intent);
        mutate(&mut next);
        enforce_invariants(&mut next);

        let fields = IntentFields::between(&state.intent, &next) | always;
        if fields.is_empty() {
            return;
        }

        state.sequence += 1;
        let snapshot = Arc::new(next);
        state.intent = Arc::clone(&snapshot);

        let change = IntentChange {
            fields,
            snapshot: Arc::clone(&snapshot),
            sequence: state.sequence,
        };

        state.subscribers.retain(|sub| {
            if sub.sender.is_closed() {
                return false;
            }
            !sub.filter.intersects(fields) || sub.sender.send(change.clone()).is_ok()
        });

        self.inner.snapshots.send_replace(snapshot);

        trace!(operation, ?fields, sequence = change.sequence, "intent committed");
    }
}

impl StoreInner {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub(super) fn remove_subscriber(&self, id: usize) {
        self.lock().subscribers.retain(|sub| sub.id != id);
    }
}

fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() { seconds.max(0.0) } else { 0.0 }
}

/// No transport without a subject; no playhead past the end.
fn enforce_invariants(intent: &mut PlaybackIntent) {
    if intent.selected_item.is_none() {
        intent.is_playing = false;
    }

    intent.duration_seconds = sanitize_seconds(intent.duration_seconds);
    intent.position_seconds = sanitize_seconds(intent.position_seconds);

    if intent.duration_seconds > 0.0 && intent.position_seconds > intent.duration_seconds {
        intent.position_seconds = intent.duration_seconds;
    }
}
