//! [`WindowHost`] backed by Tauri webview windows.

use std::sync::mpsc::Sender;

use stickies_core::{
    AppEvent, Bounds, HostEvent, Result, StickiesError, SurfaceEvent, UiEvent, WindowHost,
    WindowId, WindowSpec, WorkArea,
};
use tauri::{AppHandle, Emitter, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder, WindowEvent};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_global_shortcut::GlobalShortcutExt;

/// Label of the settings panel window.
pub const SETTINGS_LABEL: &str = "settings";

/// Event name the pages listen on for [`SurfaceEvent`]s.
pub const SURFACE_EVENT: &str = "surface-event";

const FALLBACK_WORK_AREA: WorkArea = WorkArea {
    width: 1280,
    height: 800,
};

pub struct TauriHost {
    app: AppHandle,
    events: Sender<AppEvent>,
}

impl TauriHost {
    pub fn new(app: AppHandle, events: Sender<AppEvent>) -> Self {
        Self { app, events }
    }

    fn window(&self, window: WindowId) -> Result<WebviewWindow> {
        self.app
            .get_webview_window(&window.label())
            .ok_or_else(|| StickiesError::WindowNotFound(window.label()))
    }

    fn emit(&self, label: &str, event: &SurfaceEvent) -> Result<()> {
        self.app
            .emit_to(label, SURFACE_EVENT, event)
            .map_err(host_error)
    }
}

fn host_error(e: tauri::Error) -> StickiesError {
    StickiesError::Host(e.to_string())
}

/// Reads the outer bounds of `window` in logical pixels.
fn logical_bounds(window: &WebviewWindow) -> tauri::Result<Bounds> {
    let scale = window.scale_factor()?;
    let position = window.outer_position()?.to_logical::<i32>(scale);
    let size = window.outer_size()?.to_logical::<i32>(scale);
    Ok(Bounds {
        x: position.x,
        y: position.y,
        width: size.width,
        height: size.height,
    })
}

impl WindowHost for TauriHost {
    fn work_area(&self) -> WorkArea {
        match self.app.primary_monitor() {
            Ok(Some(monitor)) => {
                let size = monitor
                    .work_area()
                    .size
                    .to_logical::<i32>(monitor.scale_factor());
                WorkArea {
                    width: size.width,
                    height: size.height,
                }
            }
            Ok(None) => FALLBACK_WORK_AREA,
            Err(e) => {
                log::warn!("failed to query primary monitor: {e}");
                FALLBACK_WORK_AREA
            }
        }
    }

    fn open_note_window(&mut self, window: WindowId, spec: &WindowSpec) -> Result<()> {
        let url = format!(
            "index.html?color={}&opacity={}",
            spec.color.as_str(),
            spec.opacity
        );
        let builder = WebviewWindowBuilder::new(&self.app, window.label(), WebviewUrl::App(url.into()))
            .title("Sticky Note")
            .inner_size(f64::from(spec.bounds.width), f64::from(spec.bounds.height))
            .position(f64::from(spec.bounds.x), f64::from(spec.bounds.y))
            .decorations(false)
            .resizable(false)
            .always_on_top(spec.always_on_top)
            .focused(true);
        #[cfg(not(target_os = "macos"))]
        let builder = builder.transparent(true);
        let webview = builder.build().map_err(host_error)?;

        let events = self.events.clone();
        webview.on_window_event(move |event| {
            let forwarded = match event {
                WindowEvent::Moved(_) | WindowEvent::Resized(_) => Some(HostEvent::Moved(window)),
                WindowEvent::Focused(focused) => Some(HostEvent::Focused(window, *focused)),
                WindowEvent::CloseRequested { api, .. } => {
                    api.prevent_close();
                    Some(HostEvent::CloseRequested(window))
                }
                _ => None,
            };
            if let Some(event) = forwarded {
                if events.send(AppEvent::Host(event)).is_err() {
                    log::warn!("control thread has stopped; dropped {event:?}");
                }
            }
        });
        log::debug!("opened {window} at {:?}", spec.bounds);
        Ok(())
    }

    fn close_window(&mut self, window: WindowId) -> Result<()> {
        self.window(window)?.destroy().map_err(host_error)
    }

    fn focus_window(&mut self, window: WindowId) -> Result<()> {
        self.window(window)?.set_focus().map_err(host_error)
    }

    fn bounds(&self, window: WindowId) -> Option<Bounds> {
        let webview = self.window(window).ok()?;
        match logical_bounds(&webview) {
            Ok(bounds) => Some(bounds),
            Err(e) => {
                log::warn!("failed to read bounds of {window}: {e}");
                None
            }
        }
    }

    fn is_always_on_top(&self, window: WindowId) -> Option<bool> {
        self.window(window).ok()?.is_always_on_top().ok()
    }

    fn set_always_on_top(&mut self, window: WindowId, on_top: bool) -> Result<()> {
        self.window(window)?
            .set_always_on_top(on_top)
            .map_err(host_error)
    }

    fn set_opacity(&mut self, window: WindowId, opacity: f64) -> Result<()> {
        self.window(window)?;
        self.emit(&window.label(), &SurfaceEvent::ApplyOpacity { opacity })
    }

    fn send(&mut self, window: WindowId, event: &SurfaceEvent) -> Result<()> {
        self.window(window)?;
        self.emit(&window.label(), event)
    }

    fn confirm(&mut self, window: WindowId, message: &str) {
        let events = self.events.clone();
        self.app
            .dialog()
            .message(message)
            .title("Sticky Notes")
            .kind(MessageDialogKind::Warning)
            .buttons(MessageDialogButtons::OkCancel)
            .show(move |confirmed| {
                let answer = AppEvent::Ui(window, UiEvent::ConfirmAnswered { confirmed });
                if events.send(answer).is_err() {
                    log::warn!("control thread has stopped; dropped answer for {window}");
                }
            });
    }

    fn is_settings_panel_open(&self) -> bool {
        self.app.get_webview_window(SETTINGS_LABEL).is_some()
    }

    fn open_settings_panel(&mut self) -> Result<()> {
        WebviewWindowBuilder::new(
            &self.app,
            SETTINGS_LABEL,
            WebviewUrl::App("settings.html".into()),
        )
        .title("Sticky Notes Settings")
        .inner_size(340.0, 380.0)
        .resizable(false)
        .center()
        .build()
        .map_err(host_error)?;
        Ok(())
    }

    fn focus_settings_panel(&mut self) -> Result<()> {
        self.app
            .get_webview_window(SETTINGS_LABEL)
            .ok_or_else(|| StickiesError::WindowNotFound(SETTINGS_LABEL.to_string()))?
            .set_focus()
            .map_err(host_error)
    }

    fn send_to_settings_panel(&mut self, event: &SurfaceEvent) -> Result<()> {
        if self.app.get_webview_window(SETTINGS_LABEL).is_none() {
            return Err(StickiesError::WindowNotFound(SETTINGS_LABEL.to_string()));
        }
        self.emit(SETTINGS_LABEL, event)
    }

    fn unregister_hotkeys(&mut self) {
        if let Err(e) = self.app.global_shortcut().unregister_all() {
            log::warn!("failed to unregister global shortcuts: {e}");
        }
    }

    fn exit(&mut self) {
        self.app.exit(0);
    }
}
