//! In-memory [`WindowHost`] that records what the core asked of it.

use crate::{
    Bounds, Result, StickiesError, SurfaceEvent, WindowHost, WindowId, WindowSpec, WorkArea,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct FakeWindow {
    bounds: Bounds,
    on_top: bool,
    opacity: f64,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    windows: HashMap<WindowId, FakeWindow>,
    opened: Vec<(WindowId, WindowSpec)>,
    sent: Vec<(WindowId, SurfaceEvent)>,
    pub fail_open: bool,
    pub focused: Vec<WindowId>,
    pub closed: Vec<WindowId>,
    pub confirms: Vec<(WindowId, String)>,
    pub panel_sent: Vec<SurfaceEvent>,
    pub settings_panel_open: bool,
    pub settings_panel_opens: usize,
    pub settings_panel_focuses: usize,
    pub hotkeys_unregistered: bool,
    pub exited: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spec(&self, window: WindowId) -> Option<&WindowSpec> {
        self.opened
            .iter()
            .find(|(w, _)| *w == window)
            .map(|(_, spec)| spec)
    }

    pub fn sent_to(&self, window: WindowId) -> Vec<SurfaceEvent> {
        self.sent
            .iter()
            .filter(|(w, _)| *w == window)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn opacity(&self, window: WindowId) -> Option<f64> {
        self.windows.get(&window).map(|w| w.opacity)
    }

    /// Simulates the user dragging `window` to `(x, y)`.
    pub fn move_to(&mut self, window: WindowId, x: i32, y: i32) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.bounds.x = x;
            w.bounds.y = y;
        }
    }

    fn window_mut(&mut self, window: WindowId) -> Result<&mut FakeWindow> {
        self.windows
            .get_mut(&window)
            .ok_or_else(|| StickiesError::WindowNotFound(window.label()))
    }
}

impl WindowHost for FakeHost {
    fn work_area(&self) -> WorkArea {
        WorkArea {
            width: 1920,
            height: 1080,
        }
    }

    fn open_note_window(&mut self, window: WindowId, spec: &WindowSpec) -> Result<()> {
        if self.fail_open {
            return Err(StickiesError::Host("no display".to_string()));
        }
        self.windows.insert(
            window,
            FakeWindow {
                bounds: spec.bounds,
                on_top: spec.always_on_top,
                opacity: spec.opacity,
            },
        );
        self.opened.push((window, spec.clone()));
        Ok(())
    }

    fn close_window(&mut self, window: WindowId) -> Result<()> {
        self.windows
            .remove(&window)
            .ok_or_else(|| StickiesError::WindowNotFound(window.label()))?;
        self.closed.push(window);
        Ok(())
    }

    fn focus_window(&mut self, window: WindowId) -> Result<()> {
        self.window_mut(window)?;
        self.focused.push(window);
        Ok(())
    }

    fn bounds(&self, window: WindowId) -> Option<Bounds> {
        self.windows.get(&window).map(|w| w.bounds)
    }

    fn is_always_on_top(&self, window: WindowId) -> Option<bool> {
        self.windows.get(&window).map(|w| w.on_top)
    }

    fn set_always_on_top(&mut self, window: WindowId, on_top: bool) -> Result<()> {
        self.window_mut(window)?.on_top = on_top;
        Ok(())
    }

    fn set_opacity(&mut self, window: WindowId, opacity: f64) -> Result<()> {
        self.window_mut(window)?.opacity = opacity;
        Ok(())
    }

    fn send(&mut self, window: WindowId, event: &SurfaceEvent) -> Result<()> {
        self.window_mut(window)?;
        self.sent.push((window, event.clone()));
        Ok(())
    }

    fn confirm(&mut self, window: WindowId, message: &str) {
        self.confirms.push((window, message.to_string()));
    }

    fn is_settings_panel_open(&self) -> bool {
        self.settings_panel_open
    }

    fn open_settings_panel(&mut self) -> Result<()> {
        self.settings_panel_open = true;
        self.settings_panel_opens += 1;
        Ok(())
    }

    fn focus_settings_panel(&mut self) -> Result<()> {
        self.settings_panel_focuses += 1;
        Ok(())
    }

    fn send_to_settings_panel(&mut self, event: &SurfaceEvent) -> Result<()> {
        self.panel_sent.push(event.clone());
        Ok(())
    }

    fn unregister_hotkeys(&mut self) {
        self.hotkeys_unregistered = true;
    }

    fn exit(&mut self) {
        self.exited = true;
    }
}
