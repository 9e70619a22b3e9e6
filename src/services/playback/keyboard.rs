//! Global play/pause shortcut.

use bitflags::bitflags;
use tracing::trace;

use crate::config::KeyboardConfig;

use super::IntentStore;

bitflags! {
    /// Modifier keys held during a key press
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        /// Control
        const CTRL = 0b0001;
        /// Meta / Command / Super
        const META = 0b0010;
        /// Alt / Option
        const ALT = 0b0100;
        /// Shift
        const SHIFT = 0b1000;
    }
}

impl Modifiers {
    /// Modifiers that turn a key press into someone else's shortcut
    pub const CHORD: Self = Self::CTRL.union(Self::META).union(Self::ALT);
}

/// Where keyboard focus was when the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusContext {
    /// Single-line text field
    TextInput,
    /// Multi-line text field
    TextArea,
    /// Drop-down select
    Select,
    /// Rich-text or other content-editable region
    ContentEditable,
    /// Anything else, including nothing focused
    #[default]
    Other,
}

impl FocusContext {
    /// Whether key presses here belong to the focused control
    pub fn is_editable(self) -> bool {
        !matches!(self, FocusContext::Other)
    }
}

/// A key press delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// Key name, e.g. `" "`, `"Space"`, `"k"`
    pub key: String,
    /// Focus at the time of the press
    pub focus: FocusContext,
    /// Whether this is an auto-repeat of a held key
    pub repeat: bool,
    /// Modifiers held
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// Plain press of `key` with nothing focused
    pub fn pressed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            focus: FocusContext::Other,
            repeat: false,
            modifiers: Modifiers::empty(),
        }
    }

    /// Same press with a different focus
    pub fn in_focus(mut self, focus: FocusContext) -> Self {
        self.focus = focus;
        self
    }

    /// Same press with modifiers held
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Same press marked as auto-repeat
    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }
}

/// What the handler did with a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutOutcome {
    /// The press toggled playback; the host should suppress its default action
    Consumed,
    /// The press was left alone
    Ignored,
}

impl ShortcutOutcome {
    /// Whether the host should prevent the default action
    pub fn is_consumed(self) -> bool {
        self == ShortcutOutcome::Consumed
    }
}

/// Maps the configured toggle key onto the intent store.
#[derive(Debug, Clone)]
pub struct KeyboardShortcuts {
    enabled: bool,
    toggle_key: String,
}

impl KeyboardShortcuts {
    /// Create a handler from configuration
    pub fn new(config: &KeyboardConfig) -> Self {
        Self {
            enabled: config.enabled,
            toggle_key: normalize_key(&config.toggle_key),
        }
    }

    /// Toggle playback if `input` is the toggle key pressed outside any editable control.
    pub fn handle(&self, store: &IntentStore, input: &KeyInput) -> ShortcutOutcome {
        if !self.enabled || normalize_key(&input.key) != self.toggle_key {
            return ShortcutOutcome::Ignored;
        }

        if input.focus.is_editable() || input.repeat || input.modifiers.intersects(Modifiers::CHORD)
        {
            trace!(focus = ?input.focus, repeat = input.repeat, "Toggle key left to host");
            return ShortcutOutcome::Ignored;
        }

        store.toggle_playing();
        ShortcutOutcome::Consumed
    }
}

fn normalize_key(key: &str) -> String {
    match key {
        " " => "space".to_string(),
        other => match other.trim().to_ascii_lowercase().as_str() {
            "spacebar" => "space".to_string(),
            normalized => normalized.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::playback::MediaRef;

    fn store_with_selection() -> IntentStore {
        let store = IntentStore::default();
        store.select(MediaRef::new("ep-1", "/uploads/ep-1.mp3"));
        store
    }

    fn shortcuts() -> KeyboardShortcuts {
        KeyboardShortcuts::new(&KeyboardConfig::default())
    }

    #[test]
    fn space_toggles_playback() {
        let store = store_with_selection();

        assert_eq!(
            shortcuts().handle(&store, &KeyInput::pressed(" ")),
            ShortcutOutcome::Consumed
        );
        assert!(store.snapshot().is_playing);

        shortcuts().handle(&store, &KeyInput::pressed("Space"));
        assert!(!store.snapshot().is_playing);
    }

    #[test]
    fn editable_focus_keeps_the_key() {
        let store = store_with_selection();

        for focus in [
            FocusContext::TextInput,
            FocusContext::TextArea,
            FocusContext::Select,
            FocusContext::ContentEditable,
        ] {
            let outcome = shortcuts().handle(&store, &KeyInput::pressed(" ").in_focus(focus));
            assert_eq!(outcome, ShortcutOutcome::Ignored, "{focus:?}");
        }
        assert!(!store.snapshot().is_playing);
    }

    #[test]
    fn chords_and_repeats_are_ignored() {
        let store = store_with_selection();
        let handler = shortcuts();

        assert!(!handler
            .handle(&store, &KeyInput::pressed(" ").with_modifiers(Modifiers::CTRL))
            .is_consumed());
        assert!(!handler
            .handle(&store, &KeyInput::pressed(" ").with_modifiers(Modifiers::META))
            .is_consumed());
        assert!(!handler.handle(&store, &KeyInput::pressed(" ").repeated()).is_consumed());
        assert!(handler
            .handle(&store, &KeyInput::pressed(" ").with_modifiers(Modifiers::SHIFT))
            .is_consumed());
    }

    #[test]
    fn disabled_shortcuts_do_nothing() {
        let store = store_with_selection();
        let handler = KeyboardShortcuts::new(&KeyboardConfig {
            enabled: false,
            ..KeyboardConfig::default()
        });

        assert_eq!(handler.handle(&store, &KeyInput::pressed(" ")), ShortcutOutcome::Ignored);
        assert!(!store.snapshot().is_playing);
    }

    #[test]
    fn custom_toggle_key() {
        let store = store_with_selection();
        let handler = KeyboardShortcuts::new(&KeyboardConfig {
            enabled: true,
            toggle_key: "K".to_string(),
        });

        assert!(!handler.handle(&store, &KeyInput::pressed(" ")).is_consumed());
        assert!(handler.handle(&store, &KeyInput::pressed("k")).is_consumed());
        assert!(store.snapshot().is_playing);
    }

    #[test]
    fn toggle_without_selection_still_consumes_but_stays_stopped() {
        let store = IntentStore::default();

        assert!(shortcuts().handle(&store, &KeyInput::pressed(" ")).is_consumed());
        assert!(!store.snapshot().is_playing);
    }
}
