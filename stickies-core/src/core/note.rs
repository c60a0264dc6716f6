use serde::{Deserialize, Serialize};

/// Width of a note window when none is stored.
pub const DEFAULT_NOTE_WIDTH: i32 = 240;
/// Height of a note window when none is stored.
pub const DEFAULT_NOTE_HEIGHT: i32 = 240;

fn default_width() -> i32 {
    DEFAULT_NOTE_WIDTH
}

fn default_height() -> i32 {
    DEFAULT_NOTE_HEIGHT
}

/// Screen position and size of a window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One persisted sticky note: its text and the geometry of its window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub content: String,
    /// Left edge; `None` until the note has been placed on screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    /// Top edge; `None` until the note has been placed on screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
}

impl Note {
    /// Creates a note that has been placed at `bounds`.
    pub fn placed(id: String, content: String, bounds: Bounds) -> Self {
        Self {
            id,
            content,
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: bounds.width,
            height: bounds.height,
        }
    }

    /// Stored geometry, or `None` when the position was never recorded.
    pub fn bounds(&self) -> Option<Bounds> {
        Some(Bounds {
            x: self.x?,
            y: self.y?,
            width: self.width,
            height: self.height,
        })
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.x = Some(bounds.x);
        self.y = Some(bounds.y);
        self.width = bounds.width;
        self.height = bounds.height;
    }
}

/// Partial note used when opening a window; absent fields get defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub id: Option<String>,
    pub content: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl From<Note> for NoteDraft {
    fn from(note: Note) -> Self {
        Self {
            id: Some(note.id),
            content: Some(note.content),
            x: note.x,
            y: note.y,
            width: Some(note.width),
            height: Some(note.height),
        }
    }
}

/// Returns the current wall-clock time in milliseconds as a note id.
pub fn timestamp_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
