//! Core library for Stickies: borderless, always-on-top desktop sticky notes.
//!
//! The primary entry point is [`App`], which owns the notes list, the settings
//! and every open note window, and is driven by [`AppEvent`]s through [`run`].
//! The windowing toolkit plugs in behind the [`WindowHost`] trait.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

#[cfg(test)]
mod testing;

// Re-export commonly used types.
#[doc(inline)]
pub use self::core::{
    app::{run, App, Flow},
    broadcaster::SettingsBroadcaster,
    controller::{default_position, NoteController, CASCADE_STEP},
    error::{Result, StickiesError},
    host::{WindowHost, WindowId, WindowSpec, WorkArea},
    message::{AppEvent, Endpoint, HostEvent, SurfaceCommand, SurfaceEvent, UiEvent},
    note::{timestamp_id, Bounds, Note, NoteDraft, DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH},
    settings::{LiveSettings, NoteColor, Settings, SettingsPatch, WindowDefaults},
    store::{default_data_dir, Store, DATA_DIR_ENV},
    surface::{NoteSurface, SurfaceAction, DELETE_PROMPT, FADED_OPACITY, FULL_OPACITY},
    timers::{TimerKey, TimerKind, Timers, CONTENT_DEBOUNCE, FADE_GRACE, MOVE_DEBOUNCE},
};
