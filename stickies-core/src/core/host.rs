//! The seam between the core and the windowing toolkit.

use crate::{Bounds, NoteColor, Result, SurfaceEvent};
use std::fmt;

const NOTE_LABEL_PREFIX: &str = "note-";

/// Process-unique handle of a live note window.
///
/// Rendered as the toolkit window label `note-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn label(self) -> String {
        self.to_string()
    }

    /// Parses a label produced by [`label`](Self::label).
    pub fn from_label(label: &str) -> Option<Self> {
        label
            .strip_prefix(NOTE_LABEL_PREFIX)
            .and_then(|n| n.parse().ok())
            .map(Self)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NOTE_LABEL_PREFIX}{}", self.0)
    }
}

/// Usable size of the primary display, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    pub width: i32,
    pub height: i32,
}

/// Everything the toolkit needs to open a note window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub bounds: Bounds,
    pub color: NoteColor,
    pub always_on_top: bool,
    pub opacity: f64,
}

/// Window operations the core needs from a GUI toolkit.
///
/// Note windows are frameless, non-resizable and addressed by [`WindowId`].
/// Implementations forward toolkit notifications back to the control thread
/// as [`crate::AppEvent`]s.
pub trait WindowHost {
    fn work_area(&self) -> WorkArea;

    fn open_note_window(&mut self, window: WindowId, spec: &WindowSpec) -> Result<()>;

    /// Destroys the window without raising another close request.
    fn close_window(&mut self, window: WindowId) -> Result<()>;

    fn focus_window(&mut self, window: WindowId) -> Result<()>;

    /// Current bounds, or `None` once the window is gone.
    fn bounds(&self, window: WindowId) -> Option<Bounds>;

    fn is_always_on_top(&self, window: WindowId) -> Option<bool>;

    fn set_always_on_top(&mut self, window: WindowId, on_top: bool) -> Result<()>;

    fn set_opacity(&mut self, window: WindowId, opacity: f64) -> Result<()>;

    /// Delivers `event` to the page in `window`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StickiesError::WindowNotFound`] if the window has been
    /// destroyed.
    fn send(&mut self, window: WindowId, event: &SurfaceEvent) -> Result<()>;

    /// Shows a yes/no question; the answer comes back as
    /// [`crate::UiEvent::ConfirmAnswered`] for `window`.
    fn confirm(&mut self, window: WindowId, message: &str);

    /// Whether the settings panel window currently exists.
    fn is_settings_panel_open(&self) -> bool;

    fn open_settings_panel(&mut self) -> Result<()>;

    fn focus_settings_panel(&mut self) -> Result<()>;

    fn send_to_settings_panel(&mut self, event: &SurfaceEvent) -> Result<()>;

    fn unregister_hotkeys(&mut self);

    fn exit(&mut self);
}
