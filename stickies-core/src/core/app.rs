//! The control thread: one owner for every piece of mutable state.
//!
//! [`App`] receives [`AppEvent`]s, routes UI events to the matching
//! [`NoteSurface`], turns surface commands into controller and broadcaster
//! calls, and fires timers when they come due. [`run`] drives it from a
//! channel.

use crate::{
    AppEvent, Endpoint, HostEvent, NoteController, NoteDraft, NoteSurface, Result,
    Settings, SettingsBroadcaster, Store, SurfaceAction, SurfaceCommand, SurfaceEvent, TimerKey,
    TimerKind, Timers, WindowHost, WindowId,
};
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Application state plus the toolkit it drives.
pub struct App<H: WindowHost> {
    host: H,
    store: Store,
    controller: NoteController,
    broadcaster: SettingsBroadcaster,
    surfaces: HashMap<WindowId, NoteSurface>,
    timers: Timers,
}

impl<H: WindowHost> App<H> {
    /// Loads both documents from `store`. No window is opened until
    /// [`start`](Self::start).
    pub fn new(host: H, store: Store) -> Self {
        let notes = store.load_notes();
        let settings = store.load_settings();
        Self {
            host,
            store,
            controller: NoteController::new(notes),
            broadcaster: SettingsBroadcaster::new(settings),
            surfaces: HashMap::new(),
            timers: Timers::new(),
        }
    }

    /// Opens every stored note, or one blank note on first run.
    pub fn start(&mut self) {
        let settings = self.broadcaster.get().clone();
        for window in self.controller.open_stored(&mut self.host, &settings) {
            self.surfaces
                .entry(window)
                .or_insert_with(|| NoteSurface::new(settings.always_on_top));
        }
        log::info!("started with {} note windows", self.controller.window_count());
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn controller(&self) -> &NoteController {
        &self.controller
    }

    pub fn settings(&self) -> &Settings {
        self.broadcaster.get()
    }

    pub fn surface(&self, window: WindowId) -> Option<&NoteSurface> {
        self.surfaces.get(&window)
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Opens a blank note.
    ///
    /// # Errors
    ///
    /// Returns the toolkit's error if the window cannot be created.
    pub fn new_note(&mut self) -> Result<WindowId> {
        let settings = self.broadcaster.get().clone();
        let window = self
            .controller
            .create_note(&mut self.host, &settings, NoteDraft::default())?;
        self.surfaces
            .entry(window)
            .or_insert_with(|| NoteSurface::new(settings.always_on_top));
        Ok(window)
    }

    /// Processes one event.
    pub fn handle(&mut self, event: AppEvent, now: Instant) -> Flow {
        match event {
            AppEvent::Host(event) => return self.handle_host(event, now),
            AppEvent::Ui(window, event) => {
                let Some(surface) = self.surfaces.get_mut(&window) else {
                    log::debug!("ui event for unknown {window}");
                    return Flow::Continue;
                };
                let actions = surface.on_ui(event);
                self.apply(window, actions, now);
            }
            AppEvent::Command(from, command) => self.dispatch(from, command, now),
        }
        Flow::Continue
    }

    /// Runs every timer due at `now`.
    pub fn fire_due(&mut self, now: Instant) {
        for TimerKey { window, kind } in self.timers.take_due(now) {
            match kind {
                TimerKind::MoveSettle => {
                    self.controller.window_moved(&self.host, &self.store, window);
                }
                TimerKind::ContentSave | TimerKind::FocusFade => {
                    if let Some(surface) = self.surfaces.get_mut(&window) {
                        let actions = surface.on_timer(kind);
                        self.apply(window, actions, now);
                    }
                }
            }
        }
    }

    fn handle_host(&mut self, event: HostEvent, now: Instant) -> Flow {
        match event {
            HostEvent::PageLoaded(window) => {
                if let Some(initial) = self.controller.initial_content(window) {
                    self.deliver(window, initial, now);
                    let push = self.broadcaster.push_event();
                    self.deliver(window, push, now);
                }
            }
            HostEvent::Moved(window) => {
                if self.controller.contains_window(window) {
                    self.timers
                        .schedule(TimerKey::new(window, TimerKind::MoveSettle), now);
                }
            }
            HostEvent::Focused(window, focused) => {
                if let Some(surface) = self.surfaces.get_mut(&window) {
                    let actions = surface.on_focus(focused);
                    self.apply(window, actions, now);
                }
            }
            HostEvent::CloseRequested(window) => self.teardown(window, now),
            HostEvent::NewNote => self.open_new_note(),
            HostEvent::OpenSettings => self.open_settings_panel(),
            HostEvent::Activate => {
                if self.controller.window_count() == 0 {
                    self.open_new_note();
                }
            }
            HostEvent::Quit => {
                self.quit(now);
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    fn dispatch(&mut self, from: Endpoint, command: SurfaceCommand, now: Instant) {
        let window = match from {
            Endpoint::Note(window) => Some(window),
            Endpoint::SettingsPanel => None,
        };
        match command {
            SurfaceCommand::SaveNote { id, content } => {
                self.controller
                    .save_note(&self.host, &self.store, window, &id, &content);
            }
            SurfaceCommand::DeleteNote => {
                let Some(window) = window else { return };
                if let Err(e) = self.controller.mark_deleting(window) {
                    log::warn!("cannot delete: {e}");
                    return;
                }
                self.teardown(window, now);
            }
            SurfaceCommand::TogglePin => {
                let Some(window) = window else { return };
                match self.controller.toggle_pin(&mut self.host, window) {
                    Ok(pinned) => self.deliver(window, SurfaceEvent::PinStatus { pinned }, now),
                    Err(e) => log::warn!("failed to toggle pin on {window}: {e}"),
                }
            }
            SurfaceCommand::SetOpacity { opacity } => {
                let Some(window) = window else { return };
                if let Err(e) = self.controller.set_opacity(&mut self.host, window, opacity) {
                    log::warn!("failed to set opacity on {window}: {e}");
                }
            }
            SurfaceCommand::RequestNewNote => self.open_new_note(),
            SurfaceCommand::GetSettings => {
                let reply = SurfaceEvent::SettingsData {
                    settings: self.broadcaster.get().clone(),
                };
                self.reply(from, reply, now);
            }
            SurfaceCommand::SaveSettings { patch } => {
                let targets: Vec<WindowId> = self.controller.window_ids().collect();
                self.broadcaster
                    .update(&mut self.host, &self.store, &patch, targets.iter().copied());
                let push = self.broadcaster.push_event();
                for window in targets {
                    if let Some(surface) = self.surfaces.get_mut(&window) {
                        let actions = surface.on_event(&push);
                        self.apply(window, actions, now);
                    }
                }
            }
        }
    }

    fn apply(&mut self, window: WindowId, actions: Vec<SurfaceAction>, now: Instant) {
        for action in actions {
            match action {
                SurfaceAction::Send(command) => {
                    self.dispatch(Endpoint::Note(window), command, now)
                }
                SurfaceAction::Schedule(kind) => {
                    self.timers.schedule(TimerKey::new(window, kind), now)
                }
                SurfaceAction::Cancel(kind) => {
                    self.timers.cancel(TimerKey::new(window, kind));
                }
                SurfaceAction::Confirm(message) => self.host.confirm(window, &message),
                SurfaceAction::Focus => {
                    if let Err(e) = self.host.focus_window(window) {
                        log::debug!("cannot focus {window}: {e}");
                    }
                }
            }
        }
    }

    /// Sends `event` to the page and lets the surface react to it.
    fn deliver(&mut self, window: WindowId, event: SurfaceEvent, now: Instant) {
        if let Err(e) = self.host.send(window, &event) {
            log::debug!("dropping message to {window}: {e}");
        }
        if let Some(surface) = self.surfaces.get_mut(&window) {
            let actions = surface.on_event(&event);
            self.apply(window, actions, now);
        }
    }

    fn reply(&mut self, to: Endpoint, event: SurfaceEvent, now: Instant) {
        match to {
            Endpoint::Note(window) => self.deliver(window, event, now),
            Endpoint::SettingsPanel => {
                if let Err(e) = self.host.send_to_settings_panel(&event) {
                    log::debug!("settings panel did not take reply: {e}");
                }
            }
        }
    }

    /// Flushes, forgets and destroys a note window.
    fn teardown(&mut self, window: WindowId, now: Instant) {
        if let Some(mut surface) = self.surfaces.remove(&window) {
            let actions = surface.unload();
            // The flush must reach the controller while the window still
            // reports its bounds.
            self.apply(window, actions, now);
        }
        self.timers.cancel_window(window);
        if let Err(e) = self.controller.close_window(&mut self.host, &self.store, window) {
            log::debug!("close of {window} ignored: {e}");
        }
    }

    fn open_new_note(&mut self) {
        if let Err(e) = self.new_note() {
            log::error!("failed to open a new note: {e}");
        }
    }

    fn open_settings_panel(&mut self) {
        let result = if self.host.is_settings_panel_open() {
            self.host.focus_settings_panel()
        } else {
            self.host.open_settings_panel()
        };
        if let Err(e) = result {
            log::error!("failed to show settings: {e}");
        }
    }

    fn quit(&mut self, now: Instant) {
        let windows: Vec<WindowId> = self.controller.window_ids().collect();
        for window in windows {
            if let Some(surface) = self.surfaces.get_mut(&window) {
                let actions = surface.unload();
                self.apply(window, actions, now);
            }
        }
        self.host.unregister_hotkeys();
        log::info!("quitting");
        self.host.exit();
    }
}

/// Drives `app` from `events` until Quit or until every sender is dropped.
pub fn run<H: WindowHost>(app: &mut App<H>, events: &Receiver<AppEvent>) {
    loop {
        let received = match app.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match events.recv_timeout(wait) {
                    Ok(event) => Some(event),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match events.recv() {
                Ok(event) => Some(event),
                Err(_) => break,
            },
        };
        if let Some(event) = received {
            if app.handle(event, Instant::now()) == Flow::Exit {
                return;
            }
        }
        app.fire_due(Instant::now());
    }
    log::info!("event channel closed");
}
