//! Integration tests for the playback intent store.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use futures::{FutureExt, StreamExt};
use listenparty::services::playback::{IntentFields, IntentStore, MediaRef};

fn episode(id: &str) -> MediaRef {
    MediaRef::new(id, format!("/uploads/media-uploads/{id}.mp3")).with_title(format!("Episode {id}"))
}

mod invariants {
    use super::*;

    #[test]
    fn play_without_selection_stays_stopped() {
        let store = IntentStore::default();

        store.set_playing(true);
        assert!(!store.snapshot().is_playing);

        store.toggle_playing();
        assert!(!store.snapshot().is_playing);
        assert_eq!(store.sequence(), 0);
    }

    #[test]
    fn position_never_passes_duration() {
        let store = IntentStore::default();
        store.select(episode("a"));
        store.set_duration(120.0);

        store.set_position(170.0);
        assert_eq!(store.snapshot().position_seconds, 120.0);

        store.set_position(-5.0);
        assert_eq!(store.snapshot().position_seconds, 0.0);
    }

    #[test]
    fn shrinking_duration_pulls_position_back() {
        let store = IntentStore::default();
        store.select(episode("a"));
        store.set_duration(300.0);
        store.set_position(250.0);

        store.set_duration(200.0);

        let intent = store.snapshot();
        assert_eq!(intent.duration_seconds, 200.0);
        assert_eq!(intent.position_seconds, 200.0);
    }

    #[test]
    fn unknown_duration_leaves_position_unbounded() {
        let store = IntentStore::default();
        store.select(episode("a"));

        store.set_position(42.5);
        assert_eq!(store.snapshot().position_seconds, 42.5);

        store.set_position(f64::NAN);
        assert_eq!(store.snapshot().position_seconds, 0.0);
    }

    #[test]
    fn clear_resets_everything() {
        let store = IntentStore::new(80);
        store.select(episode("a"));
        store.set_playing(true);
        store.set_duration(60.0);
        store.set_position(30.0);
        store.set_volume(20);
        store.toggle_mute();

        store.clear();

        let intent = store.snapshot();
        assert!(intent.selected_item.is_none());
        assert!(!intent.is_playing);
        assert_eq!(intent.position_seconds, 0.0);
        assert_eq!(intent.duration_seconds, 0.0);
        assert_eq!(intent.volume_percent, 80);
        assert!(!intent.is_muted);
    }

    #[test]
    fn select_rewinds_but_keeps_transport() {
        let store = IntentStore::default();
        store.select(episode("a"));
        store.set_duration(60.0);
        store.set_position(30.0);
        store.set_playing(true);

        store.select(episode("b"));

        let intent = store.snapshot();
        assert_eq!(intent.selected_id().map(|id| id.as_str()), Some("b"));
        assert_eq!(intent.position_seconds, 0.0);
        assert_eq!(intent.duration_seconds, 0.0);
        assert!(intent.is_playing);
    }

    #[test]
    fn volume_clamps_and_unmutes() {
        let store = IntentStore::default();
        store.toggle_mute();
        assert!(store.snapshot().is_muted);

        store.set_volume(0);
        assert!(store.snapshot().is_muted);

        store.set_volume(250);
        let intent = store.snapshot();
        assert_eq!(intent.volume_percent, 100);
        assert!(!intent.is_muted);

        store.set_volume(-10);
        assert_eq!(store.snapshot().volume_percent, 0);
    }

    #[test]
    fn snapshots_are_immutable() {
        let store = IntentStore::default();
        store.select(episode("a"));
        let before = store.snapshot();

        store.select(episode("b"));

        assert_eq!(before.selected_id().map(|id| id.as_str()), Some("a"));
    }
}

mod notifications {
    use super::*;

    #[test]
    fn subscribers_are_notified_before_mutator_returns() {
        let store = IntentStore::default();
        let mut first = store.subscribe();
        let mut second = store.subscribe();

        store.select(episode("a"));

        let change = first.try_recv().unwrap();
        assert!(change.touches(IntentFields::SELECTED));
        assert_eq!(change.sequence, 1);
        assert_eq!(change.snapshot.selected_id().map(|id| id.as_str()), Some("a"));
        assert_eq!(second.try_recv().unwrap(), change);
    }

    #[test]
    fn unchanged_mutations_notify_nobody() {
        let store = IntentStore::default();
        let mut subscription = store.subscribe();

        store.set_volume(100);
        store.set_playing(false);
        store.set_position(0.0);

        assert!(subscription.try_recv().is_none());
        assert_eq!(store.sequence(), 0);
    }

    #[test]
    fn reselecting_the_same_item_still_commits() {
        let store = IntentStore::default();
        let mut subscription = store.subscribe_to(IntentFields::SELECTED);

        store.select(episode("a"));
        store.select(episode("a"));

        assert_eq!(subscription.drain().len(), 2);
    }

    #[test]
    fn filtered_subscribers_only_see_their_fields() {
        let store = IntentStore::default();
        let mut volume = store.subscribe_to(IntentFields::VOLUME | IntentFields::MUTED);

        store.select(episode("a"));
        store.set_playing(true);
        store.set_volume(40);
        store.toggle_mute();

        let changes = volume.drain();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].fields, IntentFields::VOLUME);
        assert_eq!(changes[1].fields, IntentFields::MUTED);
        assert_eq!(changes[1].sequence, 4);
    }

    #[test]
    fn clear_reports_every_field_it_reset() {
        let store = IntentStore::default();
        store.select(episode("a"));
        store.set_playing(true);
        let mut subscription = store.subscribe();

        store.clear();

        let change = subscription.try_recv().unwrap();
        assert_eq!(change.fields, IntentFields::SELECTED | IntentFields::PLAYING);
        assert!(change.snapshot.selected_item.is_none());
    }

    #[test]
    fn sequence_is_monotonic() {
        let store = IntentStore::default();
        let mut subscription = store.subscribe();

        store.select(episode("a"));
        store.set_playing(true);
        store.set_duration(10.0);
        store.set_position(5.0);

        let sequences: Vec<u64> = subscription.drain().iter().map(|c| c.sequence).collect();
        assert_eq!(sequences, [1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn watch_yields_current_snapshot_first() {
        let store = IntentStore::default();
        store.select(episode("a"));

        let mut snapshots = Box::pin(store.watch());
        let first = snapshots.next().await.unwrap();
        assert_eq!(first.selected_id().map(|id| id.as_str()), Some("a"));

        store.set_playing(true);
        let next = snapshots.next().await.unwrap();
        assert!(next.is_playing);
    }

    #[tokio::test]
    async fn watch_keeps_only_the_latest_snapshot() {
        let store = IntentStore::default();
        store.select(episode("a"));
        store.set_duration(600.0);
        let mut snapshots = Box::pin(store.watch());

        for second in 1..=500 {
            store.set_position(f64::from(second));
        }

        let latest = snapshots.next().await.unwrap();
        assert_eq!(latest.position_seconds, 500.0);
        assert!(snapshots.next().now_or_never().is_none());
    }

    #[test]
    fn position_updates_skip_transport_subscribers() {
        let store = IntentStore::default();
        store.select(episode("a"));
        store.set_duration(600.0);
        let mut transport = store.subscribe_to(IntentFields::SELECTED | IntentFields::PLAYING);

        for second in 1..=500 {
            store.set_position(f64::from(second));
        }
        store.set_playing(true);

        let changes = transport.drain();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].fields, IntentFields::PLAYING);
    }

    #[tokio::test]
    async fn watch_selection_ignores_other_fields() {
        let store = IntentStore::default();
        let mut selections = Box::pin(store.watch_selection());

        assert_eq!(selections.next().await.unwrap(), None);

        store.select(episode("a"));
        assert_eq!(
            selections.next().await.unwrap().map(|item| item.id.to_string()),
            Some("a".to_string())
        );

        store.set_playing(true);
        store.set_volume(10);
        store.select(episode("b"));
        assert_eq!(
            selections.next().await.unwrap().map(|item| item.id.to_string()),
            Some("b".to_string())
        );
    }

    #[tokio::test]
    async fn subscription_is_a_stream() {
        let store = IntentStore::default();
        let subscription = store.subscribe();

        store.select(episode("a"));
        store.set_playing(true);
        drop(store);

        let changes: Vec<_> = subscription.collect().await;
        assert_eq!(changes.len(), 2);
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn unsubscribe_is_idempotent() {
        let store = IntentStore::default();
        let mut subscription = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);

        subscription.unsubscribe();
        subscription.unsubscribe();

        assert!(!subscription.is_active());
        assert_eq!(store.subscriber_count(), 0);

        store.select(episode("a"));
        assert!(subscription.try_recv().is_none());
    }

    #[test]
    fn dropping_a_subscription_unsubscribes() {
        let store = IntentStore::default();

        for _ in 0..100 {
            let _subscription = store.subscribe();
        }

        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = IntentStore::default();
        let mut subscription = store.subscribe();
        drop(store);

        assert!(!subscription.is_active());
        subscription.unsubscribe();
        assert!(subscription.try_recv().is_none());
    }

    #[test]
    fn clones_share_state() {
        let store = IntentStore::default();
        let other = store.clone();
        let mut subscription = other.subscribe();

        store.select(episode("a"));

        assert_eq!(other.selected_id().map(|id| id.to_string()), Some("a".to_string()));
        assert!(subscription.try_recv().is_some());
    }
}
