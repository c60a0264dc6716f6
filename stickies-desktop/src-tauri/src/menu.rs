//! System tray menu for Stickies.

use tauri::{menu::*, AppHandle, Runtime};

pub const MENU_NEW_NOTE: &str = "tray_new_note";
pub const MENU_SETTINGS: &str = "tray_settings";
pub const MENU_QUIT: &str = "tray_quit";

/// Builds the tray menu: New Note, Settings, a separator, and Quit.
///
/// # Errors
///
/// Returns [`tauri::Error`] if any menu item fails to build.
pub fn build_tray_menu<R: Runtime>(app: &AppHandle<R>) -> Result<Menu<R>, tauri::Error> {
    let menu = MenuBuilder::new(app)
        .items(&[
            &MenuItemBuilder::with_id(MENU_NEW_NOTE, "New Note")
                .accelerator("CmdOrCtrl+Shift+N")
                .build(app)?,
            &MenuItemBuilder::with_id(MENU_SETTINGS, "Settings").build(app)?,
            &PredefinedMenuItem::separator(app)?,
            &MenuItemBuilder::with_id(MENU_QUIT, "Quit").build(app)?,
        ])
        .build()?;

    Ok(menu)
}
