use std::sync::Arc;

use bitflags::bitflags;

use crate::services::playback::PlaybackIntent;

bitflags! {
    /// Fields of [`PlaybackIntent`] touched by a mutation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IntentFields: u8 {
        /// `selected_item`
        const SELECTED = 0b0000_0001;
        /// `is_playing`
        const PLAYING = 0b0000_0010;
        /// `position_seconds`
        const POSITION = 0b0000_0100;
        /// `duration_seconds`
        const DURATION = 0b0000_1000;
        /// `volume_percent`
        const VOLUME = 0b0001_0000;
        /// `is_muted`
        const MUTED = 0b0010_0000;
    }
}

impl IntentFields {
    /// Fields that differ between two intents.
    pub fn between(old: &PlaybackIntent, new: &PlaybackIntent) -> Self {
        let mut fields = Self::empty();

        fields.set(Self::SELECTED, old.selected_item != new.selected_item);
        fields.set(Self::PLAYING, old.is_playing != new.is_playing);
        fields.set(Self::POSITION, old.position_seconds != new.position_seconds);
        fields.set(Self::DURATION, old.duration_seconds != new.duration_seconds);
        fields.set(Self::VOLUME, old.volume_percent != new.volume_percent);
        fields.set(Self::MUTED, old.is_muted != new.is_muted);

        fields
    }
}

/// A committed mutation of the intent store.
///
/// Carries an immutable snapshot of the intent as it was right after the
/// mutation, so subscribers never observe a half-applied update.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentChange {
    /// Which fields this mutation touched
    pub fields: IntentFields,
    /// Intent right after the mutation
    pub snapshot: Arc<PlaybackIntent>,
    /// Monotonic per-store mutation counter, starting at 1
    pub sequence: u64,
}

impl IntentChange {
    /// Whether this change touched any of `fields`
    pub fn touches(&self, fields: IntentFields) -> bool {
        self.fields.intersects(fields)
    }
}
