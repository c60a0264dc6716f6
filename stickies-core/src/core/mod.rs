//! Internal domain modules for the Stickies core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod app;
pub mod broadcaster;
pub mod controller;
pub mod error;
pub mod host;
pub mod message;
pub mod note;
pub mod settings;
pub mod store;
pub mod surface;
pub mod timers;

#[doc(inline)]
pub use app::{run, App, Flow};
#[doc(inline)]
pub use broadcaster::SettingsBroadcaster;
#[doc(inline)]
pub use controller::NoteController;
#[doc(inline)]
pub use error::{Result, StickiesError};
#[doc(inline)]
pub use host::{WindowHost, WindowId, WindowSpec, WorkArea};
#[doc(inline)]
pub use message::{AppEvent, Endpoint, HostEvent, SurfaceCommand, SurfaceEvent, UiEvent};
#[doc(inline)]
pub use note::{Bounds, Note, NoteDraft};
#[doc(inline)]
pub use settings::{NoteColor, Settings, SettingsPatch};
#[doc(inline)]
pub use store::Store;
#[doc(inline)]
pub use surface::{NoteSurface, SurfaceAction};
#[doc(inline)]
pub use timers::{TimerKey, TimerKind, Timers};
