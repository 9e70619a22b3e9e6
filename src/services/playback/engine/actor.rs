use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior, interval},
};
use tracing::{debug, info, trace, warn};

use crate::services::{
    common::Property,
    playback::{
        EngineState, IntentChange, IntentFields, IntentStore, MediaElement, MediaRef,
        PlaybackError, PlaybackIntent, SourceResolver, Subscription,
        element::{ElementEvent, ElementEventKind, LoadToken, PlayRejection},
    },
};

use super::EngineCommand;

pub(super) struct PlaySettled {
    generation: LoadToken,
    result: Result<(), PlayRejection>,
}

/// Owns the element and every piece of engine state. Runs on one task.
pub(super) struct EngineActor {
    store: IntentStore,
    element: Arc<dyn MediaElement>,
    resolver: SourceResolver,
    state: Property<EngineState>,
    generation: LoadToken,
    play_pending: bool,
    bound_duration: f64,
    pending_seek: Option<f64>,
    seek_guard: Duration,
    seek_guard_until: Option<Instant>,
    settled_tx: mpsc::UnboundedSender<PlaySettled>,
}

impl EngineActor {
    pub(super) fn new(
        store: IntentStore,
        element: Arc<dyn MediaElement>,
        resolver: SourceResolver,
        state: Property<EngineState>,
        seek_guard: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PlaySettled>) {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();

        let actor = Self {
            store,
            element,
            resolver,
            state,
            generation: LoadToken::default(),
            play_pending: false,
            bound_duration: 0.0,
            pending_seek: None,
            seek_guard,
            seek_guard_until: None,
            settled_tx,
        };

        (actor, settled_rx)
    }

    pub(super) async fn run(
        mut self,
        mut commands: mpsc::Receiver<EngineCommand>,
        mut events: mpsc::UnboundedReceiver<ElementEvent>,
        mut subscription: Subscription,
        mut settled_rx: mpsc::UnboundedReceiver<PlaySettled>,
        sample_interval: Duration,
    ) {
        let mut sampler = interval(sample_interval);
        sampler.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.reconcile_initial();

        loop {
            tokio::select! {
                change = subscription.recv() => match change {
                    Some(change) => self.on_intent_change(&change),
                    None => {
                        debug!("Intent store closed");
                        break;
                    }
                },
                Some(event) = events.recv() => self.on_element_event(event),
                Some(settled) = settled_rx.recv() => self.on_play_settled(settled),
                command = commands.recv() => match command {
                    Some(EngineCommand::Seek { seconds, relative, reply }) => {
                        let applied = self.seek(seconds, relative);
                        let _ = reply.send(applied);
                    }
                    Some(EngineCommand::Shutdown { done }) => {
                        self.teardown();
                        let _ = done.send(());
                        info!("Playback engine stopped");
                        return;
                    }
                    None => {
                        debug!("All engine handles dropped");
                        break;
                    }
                },
                _ = sampler.tick() => self.sample(),
            }
        }

        self.teardown();
        info!("Playback engine stopped");
    }

    fn reconcile_initial(&mut self) {
        let intent = self.store.snapshot();

        self.apply_volume(&intent);
        if let Some(item) = &intent.selected_item {
            self.bind(item.clone());
        }
        self.reconcile_transport();
    }

    fn on_intent_change(&mut self, change: &IntentChange) {
        let intent = &change.snapshot;

        if change.touches(IntentFields::SELECTED) {
            self.on_selection(intent.selected_item.as_ref());
        }

        if change.touches(IntentFields::VOLUME | IntentFields::MUTED) {
            self.apply_volume(intent);
        }

        self.reconcile_transport();
    }

    /// Edge-triggered on item identity.
    fn on_selection(&mut self, selected: Option<&MediaRef>) {
        let current = self.state.get();

        match (selected, &current) {
            (None, EngineState::Idle) => {}
            (None, _) => self.teardown(),
            (Some(item), EngineState::Error(failed, _)) if item.same_item(failed) => {
                debug!(item = %item.id, "Retrying failed load");
                self.bind(item.clone());
            }
            (Some(item), other) if other.item().is_some_and(|bound| bound.same_item(item)) => {
                trace!(item = %item.id, "Selection unchanged, keeping binding");
                self.restore_timeline();
            }
            (Some(item), _) => self.bind(item.clone()),
        }
    }

    /// Level-triggered on `is_playing`.
    fn reconcile_transport(&mut self) {
        let desired = self.store.snapshot().is_playing;

        match self.state.get() {
            EngineState::Ready(_) if desired && !self.play_pending => self.start_play(),
            EngineState::Playing(item) if !desired => {
                self.element.pause();
                self.sync_position();
                self.transition(EngineState::Ready(item));
            }
            EngineState::Error(item, _) if desired => {
                debug!(item = %item.id, "Play requested after load failure, reloading");
                self.bind(item);
            }
            _ => {}
        }
    }

    fn bind(&mut self, item: MediaRef) {
        self.detach();
        self.generation = self.generation.next();
        self.play_pending = false;
        self.bound_duration = 0.0;
        self.pending_seek = None;
        self.seek_guard_until = None;

        let url = self.resolver.resolve(&item);

        self.store.set_position(0.0);
        self.store.set_duration(0.0);
        self.apply_volume(&self.store.snapshot());
        self.element.load(&url, self.generation);

        debug!(item = %item.id, %url, generation = %self.generation, "Binding element");
        self.transition(EngineState::Loading(item));
    }

    /// `select` rewinds the store even when the item is unchanged; put the
    /// bound item's timeline back.
    fn restore_timeline(&mut self) {
        match self.state.get() {
            EngineState::Ready(_) | EngineState::Playing(_) => {
                self.store.set_duration(self.bound_duration);
                self.sync_position();
            }
            EngineState::Loading(_) => {
                if let Some(target) = self.pending_seek {
                    self.store.set_position(target);
                }
            }
            _ => {}
        }
    }

    /// Pause and release the element's source, if anything is bound.
    fn detach(&self) {
        if self.state.with(|state| *state != EngineState::Idle) {
            self.element.pause();
            self.element.clear_source();
        }
    }

    fn teardown(&mut self) {
        self.detach();
        self.generation = self.generation.next();
        self.play_pending = false;
        self.bound_duration = 0.0;
        self.pending_seek = None;
        self.seek_guard_until = None;
        self.transition(EngineState::Idle);
    }

    fn start_play(&mut self) {
        self.play_pending = true;

        let element = Arc::clone(&self.element);
        let settled_tx = self.settled_tx.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            let result = element.play().await;
            let _ = settled_tx.send(PlaySettled { generation, result });
        });
    }

    fn on_play_settled(&mut self, settled: PlaySettled) {
        if settled.generation != self.generation {
            trace!(
                generation = %settled.generation,
                current = %self.generation,
                "Discarding stale play completion"
            );
            return;
        }
        self.play_pending = false;

        let state = self.state.get();
        let Some(item) = state.item().cloned() else {
            return;
        };

        match settled.result {
            Ok(()) => match state {
                EngineState::Ready(_) if self.store.snapshot().is_playing => {
                    self.transition(EngineState::Playing(item));
                }
                EngineState::Playing(_) => {}
                _ => self.element.pause(),
            },
            Err(rejection) => {
                let error = PlaybackError::PlayRejected {
                    item: item.id.clone(),
                    reason: rejection.reason,
                };
                warn!("{error}");
                self.store.set_playing(false);
            }
        }
    }

    fn on_element_event(&mut self, event: ElementEvent) {
        if event.token != self.generation {
            trace!(
                generation = %event.token,
                current = %self.generation,
                kind = ?event.kind,
                "Discarding stale element event"
            );
            return;
        }

        let state = self.state.get();

        match (event.kind, state) {
            (ElementEventKind::MetadataLoaded { duration }, EngineState::Loading(item)) => {
                let duration = effective_duration(duration, &item);
                self.bound_duration = duration;
                self.store.set_duration(duration);
                self.apply_pending_seek(duration);
                self.transition(EngineState::Ready(item));
                self.reconcile_transport();
            }
            (ElementEventKind::Ended, EngineState::Playing(item) | EngineState::Ready(item)) => {
                self.element.pause();
                self.play_pending = false;
                self.sync_position();
                self.store.set_playing(false);
                self.transition(EngineState::Ready(item));
            }
            (
                ElementEventKind::Error { cause },
                EngineState::Loading(item) | EngineState::Ready(item) | EngineState::Playing(item),
            ) => {
                let error = PlaybackError::LoadFailure {
                    item: item.id.clone(),
                    cause: cause.clone(),
                };
                warn!("{error}");

                self.play_pending = false;
                self.pending_seek = None;
                self.seek_guard_until = None;
                self.store.set_playing(false);
                self.transition(EngineState::Error(item, cause));
            }
            (kind, state) => {
                trace!(?kind, state = state.name(), "Ignoring element event");
            }
        }
    }

    fn seek(&mut self, seconds: f64, relative: bool) -> f64 {
        let intent = self.store.snapshot();
        let bound = self.state.with(EngineState::is_bound);

        let requested = if relative {
            let base = if bound {
                self.element.current_time()
            } else {
                intent.position_seconds
            };
            base + seconds
        } else {
            seconds
        };

        let applied = clamp_position(requested, intent.duration_seconds);
        if applied != requested {
            let error = PlaybackError::SeekOutOfRange { requested, applied };
            debug!("{error}");
        }

        self.store.set_position(applied);

        if bound {
            self.element.set_current_time(applied);
            self.seek_guard_until = Some(Instant::now() + self.seek_guard);
        } else if self.state.with(|state| matches!(state, EngineState::Loading(_))) {
            self.pending_seek = Some(applied);
        }

        applied
    }

    /// Carries a seek made during load over to the element once the media
    /// length is known.
    fn apply_pending_seek(&mut self, duration: f64) {
        let Some(target) = self.pending_seek.take() else {
            return;
        };

        let applied = clamp_position(target, duration);
        debug!(target, applied, "Applying seek requested during load");

        self.store.set_position(applied);
        self.element.set_current_time(applied);
        self.seek_guard_until = Some(Instant::now() + self.seek_guard);
    }

    fn sample(&mut self) {
        if !self.state.with(EngineState::is_bound) {
            return;
        }

        if let Some(until) = self.seek_guard_until {
            if Instant::now() < until {
                trace!("Seek in flight, skipping position sample");
                return;
            }
            self.seek_guard_until = None;
        }

        self.sync_position();
    }

    fn sync_position(&self) {
        self.store.set_position(self.element.current_time());
    }

    fn apply_volume(&self, intent: &PlaybackIntent) {
        self.element.set_volume(intent.element_volume());
        self.element.set_muted(intent.is_muted);
    }

    fn transition(&self, next: EngineState) {
        let from = self.state.with(|state| state.name());
        let to = next.name();
        let item = next.item().map(|item| item.id.to_string());

        if self.state.set(next) {
            debug!(from, to, ?item, generation = %self.generation, "Engine transition");
        }
    }
}

/// The element's duration when it reports a usable one, else the backend's
/// hint, else zero.
fn effective_duration(reported: f64, item: &MediaRef) -> f64 {
    if reported.is_finite() && reported >= 0.0 {
        return reported;
    }

    item.duration_hint_seconds
        .filter(|hint| hint.is_finite() && *hint >= 0.0)
        .unwrap_or(0.0)
}

fn clamp_position(seconds: f64, duration: f64) -> f64 {
    if !seconds.is_finite() {
        return 0.0;
    }

    let upper = if duration > 0.0 { duration } else { f64::INFINITY };
    seconds.clamp(0.0, upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_duration_wins_when_finite() {
        let item = MediaRef::new("a", "/a.mp3").with_duration_hint(90.0);

        assert_eq!(effective_duration(120.5, &item), 120.5);
    }

    #[test]
    fn hint_covers_streams_without_duration() {
        let item = MediaRef::new("a", "/a.mp3").with_duration_hint(90.0);

        assert_eq!(effective_duration(f64::NAN, &item), 90.0);
        assert_eq!(effective_duration(f64::INFINITY, &item), 90.0);
        assert_eq!(effective_duration(f64::NAN, &MediaRef::new("b", "/b.mp3")), 0.0);
    }

    #[test]
    fn seek_targets_clamp_into_media() {
        assert_eq!(clamp_position(-4.0, 60.0), 0.0);
        assert_eq!(clamp_position(75.0, 60.0), 60.0);
        assert_eq!(clamp_position(75.0, 0.0), 75.0);
        assert_eq!(clamp_position(f64::NAN, 60.0), 0.0);
    }
}
