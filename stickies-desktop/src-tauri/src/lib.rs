pub mod host;
pub mod menu;

// Re-export core library
pub use stickies_core::*;

use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;

use host::{TauriHost, SETTINGS_LABEL};
use tauri::tray::{MouseButton, TrayIconBuilder, TrayIconEvent};
use tauri::{AppHandle, Manager, RunEvent, State, WebviewWindow};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};
use tauri_plugin_log::{Target, TargetKind};

/// Global hotkey that creates a new note.
pub const NEW_NOTE_SHORTCUT: &str = "CommandOrControl+Shift+N";

/// Hands events from Tauri callbacks to the control thread.
pub struct EventBus {
    sender: Sender<AppEvent>,
}

impl EventBus {
    pub fn new(sender: Sender<AppEvent>) -> Self {
        Self { sender }
    }

    pub fn send(&self, event: AppEvent) {
        if self.sender.send(event).is_err() {
            log::warn!("control thread has stopped; dropped event");
        }
    }

    pub fn host(&self, event: HostEvent) {
        self.send(AppEvent::Host(event));
    }
}

fn endpoint_for(window: &WebviewWindow) -> std::result::Result<Endpoint, String> {
    let label = window.label();
    if label == SETTINGS_LABEL {
        return Ok(Endpoint::SettingsPanel);
    }
    WindowId::from_label(label)
        .map(Endpoint::Note)
        .ok_or_else(|| format!("Unknown window: {label}"))
}

fn note_window(window: &WebviewWindow) -> std::result::Result<WindowId, String> {
    WindowId::from_label(window.label())
        .ok_or_else(|| format!("Not a note window: {}", window.label()))
}

/// Called by a note page once its script is ready for content.
#[tauri::command]
fn page_loaded(window: WebviewWindow, bus: State<'_, EventBus>) -> std::result::Result<(), String> {
    let id = note_window(&window)?;
    bus.host(HostEvent::PageLoaded(id));
    Ok(())
}

/// Forwards a user interaction on a note page.
#[tauri::command]
fn surface_ui(
    window: WebviewWindow,
    bus: State<'_, EventBus>,
    event: UiEvent,
) -> std::result::Result<(), String> {
    let id = note_window(&window)?;
    bus.send(AppEvent::Ui(id, event));
    Ok(())
}

/// Forwards a request from a note page or the settings panel.
#[tauri::command]
fn surface_command(
    window: WebviewWindow,
    bus: State<'_, EventBus>,
    command: SurfaceCommand,
) -> std::result::Result<(), String> {
    let from = endpoint_for(&window)?;
    bus.send(AppEvent::Command(from, command));
    Ok(())
}

/// Store in `$STICKIES_DATA_DIR`, else the platform app-data dir.
fn open_store(app: &AppHandle) -> Store {
    let fallback: PathBuf = app
        .path()
        .app_data_dir()
        .unwrap_or_else(|_| default_data_dir());
    Store::from_env_or(fallback)
}

fn setup_tray(app: &AppHandle) -> tauri::Result<()> {
    let tray_menu = menu::build_tray_menu(app)?;
    let mut tray = TrayIconBuilder::with_id("stickies")
        .tooltip("Sticky Notes")
        .menu(&tray_menu)
        .on_menu_event(|app, event| {
            let forwarded = match event.id().as_ref() {
                menu::MENU_NEW_NOTE => HostEvent::NewNote,
                menu::MENU_SETTINGS => HostEvent::OpenSettings,
                menu::MENU_QUIT => HostEvent::Quit,
                _ => return,
            };
            app.state::<EventBus>().host(forwarded);
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            } = event
            {
                tray.app_handle().state::<EventBus>().host(HostEvent::NewNote);
            }
        });
    if let Some(icon) = app.default_window_icon() {
        tray = tray.icon(icon.clone());
    }
    tray.build(app)?;
    Ok(())
}

fn register_shortcut(app: &AppHandle) {
    if let Err(e) = app.global_shortcut().register(NEW_NOTE_SHORTCUT) {
        log::warn!("failed to register {NEW_NOTE_SHORTCUT}: {e}");
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let (sender, receiver) = mpsc::channel::<AppEvent>();

    let app = tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .targets([
                    Target::new(TargetKind::Stdout),
                    Target::new(TargetKind::LogDir { file_name: None }),
                ])
                .level(log::LevelFilter::Info)
                .build(),
        )
        .plugin(tauri_plugin_dialog::init())
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(|app, _shortcut, event| {
                    if event.state() == ShortcutState::Pressed {
                        app.state::<EventBus>().host(HostEvent::NewNote);
                    }
                })
                .build(),
        )
        .manage(EventBus::new(sender.clone()))
        .setup(move |app| {
            let handle = app.handle().clone();
            let store = open_store(&handle);
            log::info!("storing notes in {}", store.dir().display());

            setup_tray(&handle)?;
            register_shortcut(&handle);

            let host = TauriHost::new(handle, sender);
            thread::Builder::new()
                .name("stickies-control".to_string())
                .spawn(move || {
                    let mut state = App::new(host, store);
                    state.start();
                    stickies_core::run(&mut state, &receiver);
                })?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            page_loaded,
            surface_ui,
            surface_command
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(on_run_event);
}

#[cfg_attr(not(target_os = "macos"), allow(unused_variables))]
fn on_run_event(app: &AppHandle, event: RunEvent) {
    match event {
        // Closing the last note keeps the process alive in the tray.
        RunEvent::ExitRequested { api, code, .. } if code.is_none() => api.prevent_exit(),
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => app.state::<EventBus>().host(HostEvent::Activate),
        _ => {}
    }
}
