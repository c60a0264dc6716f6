//! Typed messages exchanged between note surfaces, the toolkit and the
//! controller.
//!
//! Surfaces talk upward with [`SurfaceCommand`] and hear back through
//! [`SurfaceEvent`]. Everything the control thread reacts to arrives as an
//! [`AppEvent`] over a single channel.
//!
//! The serde forms are what crosses the webview boundary: variants are tagged
//! with a `type` field and payload keys are camelCase.
//!
//! ```rust
//! use stickies_core::SurfaceEvent;
//!
//! let json = serde_json::to_string(&SurfaceEvent::PinStatus { pinned: true }).unwrap();
//! assert_eq!(json, r#"{"type":"pinStatus","pinned":true}"#);
//! ```

use crate::{Settings, SettingsPatch, WindowId};
use serde::{Deserialize, Serialize};

/// Requests sent by a note surface or the settings panel to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SurfaceCommand {
    /// Upsert the note with the full current text.
    SaveNote { id: String, content: String },
    /// Delete the sender's note and close its window.
    DeleteNote,
    /// Flip the sender window's always-on-top state.
    TogglePin,
    /// Set the sender window's opacity.
    SetOpacity { opacity: f64 },
    /// Open a fresh blank note.
    RequestNewNote,
    /// Ask for the current settings; answered with [`SurfaceEvent::SettingsData`].
    GetSettings,
    /// Merge a partial update into the settings and broadcast the result.
    SaveSettings { patch: SettingsPatch },
}

/// Messages sent by the controller to a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SurfaceEvent {
    /// The note this window displays, sent once the page has loaded.
    InitialContent { id: String, content: String },
    /// Settings after a save (and once after load).
    SettingsPushed { settings: Settings },
    /// Reply to [`SurfaceCommand::TogglePin`].
    PinStatus { pinned: bool },
    /// Reply to [`SurfaceCommand::GetSettings`].
    SettingsData { settings: Settings },
    /// The window's opacity changed; the page renders it.
    ApplyOpacity { opacity: f64 },
}

/// Raw user interaction inside a note window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UiEvent {
    /// The text field now holds `text`.
    Input { text: String },
    DeleteClicked,
    /// Answer to a confirmation the surface asked for.
    ConfirmAnswered { confirmed: bool },
    TogglePinClicked,
    ToggleBackgroundClicked,
    NewNoteClicked,
    KeyDown {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
}

/// Notifications from the windowing toolkit, tray and hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The page inside a note window finished loading.
    PageLoaded(WindowId),
    /// A note window moved or was resized.
    Moved(WindowId),
    /// A note window gained (`true`) or lost focus.
    Focused(WindowId, bool),
    /// The user asked the OS to close a note window.
    CloseRequested(WindowId),
    /// Tray "New Note", tray double-click or the global hotkey.
    NewNote,
    /// Tray "Settings".
    OpenSettings,
    /// The application was re-activated (e.g. dock icon click).
    Activate,
    /// Tray "Quit".
    Quit,
}

/// Where a command came from, and where its reply goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Note(WindowId),
    SettingsPanel,
}

/// Everything the control thread processes.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Host(HostEvent),
    Ui(WindowId, UiEvent),
    Command(Endpoint, SurfaceCommand),
}
