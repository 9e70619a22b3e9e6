use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a selectable media item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Create a media id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A selectable playable item.
///
/// Identity is [`MediaRef::id`]: two refs with the same id are the same
/// logical item even if the rest of the metadata was refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Item identity
    pub id: MediaId,

    /// Where the media lives; relative path, CDN path, or absolute URL
    pub source_path: String,

    /// Duration advertised by the backend, used when the element can't tell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hint_seconds: Option<f64>,

    /// Artwork URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_art_url: Option<String>,

    /// Title shown in the player bar
    pub display_title: String,
}

impl MediaRef {
    /// Create a ref with just an id and a source path.
    ///
    /// The display title defaults to the id.
    pub fn new(id: impl Into<String>, source_path: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_title: id.clone(),
            id: MediaId::new(id),
            source_path: source_path.into(),
            duration_hint_seconds: None,
            cover_art_url: None,
        }
    }

    /// Set the display title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.display_title = title.into();
        self
    }

    /// Set the duration hint
    pub fn with_duration_hint(mut self, seconds: f64) -> Self {
        self.duration_hint_seconds = Some(seconds);
        self
    }

    /// Set the cover art URL
    pub fn with_cover_art(mut self, url: impl Into<String>) -> Self {
        self.cover_art_url = Some(url.into());
        self
    }

    /// Whether `other` names the same logical item
    pub fn same_item(&self, other: &MediaRef) -> bool {
        self.id == other.id
    }
}

/// What should be playing, as held by the intent store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackIntent {
    /// Currently chosen item
    pub selected_item: Option<MediaRef>,

    /// Desired transport state
    pub is_playing: bool,

    /// Last known playhead position in seconds
    pub position_seconds: f64,

    /// Duration in seconds, 0 until the engine reports one
    pub duration_seconds: f64,

    /// Desired volume, 0-100
    pub volume_percent: u8,

    /// Desired mute flag
    pub is_muted: bool,
}

impl Default for PlaybackIntent {
    fn default() -> Self {
        Self::with_volume(100)
    }
}

impl PlaybackIntent {
    /// Empty intent starting at the given volume
    pub fn with_volume(volume_percent: u8) -> Self {
        Self {
            selected_item: None,
            is_playing: false,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            volume_percent: volume_percent.min(100),
            is_muted: false,
        }
    }

    /// Id of the selected item, if any
    pub fn selected_id(&self) -> Option<&MediaId> {
        self.selected_item.as_ref().map(|item| &item.id)
    }

    /// Volume as the element expects it, 0.0 to 1.0
    pub fn element_volume(&self) -> f64 {
        f64::from(self.volume_percent) / 100.0
    }
}

/// Lifecycle of the engine's binding to the media element
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EngineState {
    /// Nothing bound
    #[default]
    Idle,

    /// Source assigned, waiting for metadata
    Loading(MediaRef),

    /// Metadata known, paused
    Ready(MediaRef),

    /// Element is playing
    Playing(MediaRef),

    /// Load failed; the item stays selected so the user can retry
    Error(MediaRef, String),
}

impl EngineState {
    /// Item this state is about
    pub fn item(&self) -> Option<&MediaRef> {
        match self {
            EngineState::Idle => None,
            EngineState::Loading(item)
            | EngineState::Ready(item)
            | EngineState::Playing(item)
            | EngineState::Error(item, _) => Some(item),
        }
    }

    /// Short state name for logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Loading(_) => "loading",
            EngineState::Ready(_) => "ready",
            EngineState::Playing(_) => "playing",
            EngineState::Error(_, _) => "error",
        }
    }

    /// Whether metadata is known and the playhead is meaningful
    pub fn is_bound(&self) -> bool {
        matches!(self, EngineState::Ready(_) | EngineState::Playing(_))
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => f.write_str("idle"),
            EngineState::Error(item, cause) => write!(f, "error({}: {cause})", item.id),
            other => match other.item() {
                Some(item) => write!(f, "{}({})", other.name(), item.id),
                None => f.write_str(other.name()),
            },
        }
    }
}
