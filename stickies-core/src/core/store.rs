//! JSON persistence for the notes list and the settings record.
//!
//! Both documents live side by side in one per-user directory and are
//! written independently. Reads never fail: a missing or malformed document
//! yields the empty list or the default settings. Writes go to a sibling
//! temp file that is then renamed over the target.

use crate::{Note, Result, Settings};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the notes document.
pub const NOTES_FILE: &str = "notes.json";
/// File name of the settings document.
pub const SETTINGS_FILE: &str = "settings.json";
/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "STICKIES_DATA_DIR";

/// Name of the data directory inside the per-user config directory.
const APP_DIR: &str = "stickies";

/// Returns the default per-user data directory: `stickies` under
/// [`dirs::config_dir`], else `~/.config/stickies`.
pub fn default_data_dir() -> PathBuf {
    data_dir_from(dirs::config_dir(), dirs::home_dir())
}

fn data_dir_from(config: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match (config, home) {
        (Some(config), _) => config.join(APP_DIR),
        (None, Some(home)) => home.join(".config").join(APP_DIR),
        (None, None) => PathBuf::from(".").join(APP_DIR),
    }
}

/// Reads and writes the two persisted documents under one directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Uses `$STICKIES_DATA_DIR` when set, otherwise `fallback`.
    pub fn from_env_or(fallback: PathBuf) -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(fallback),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn notes_path(&self) -> PathBuf {
        self.dir.join(NOTES_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// Loads the notes list; empty if the document is missing or corrupt.
    pub fn load_notes(&self) -> Vec<Note> {
        let Some(text) = read_document(&self.notes_path()) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Note>>(&text) {
            Ok(notes) => {
                log::info!("loaded {} notes from {}", notes.len(), self.notes_path().display());
                notes
            }
            Err(e) => {
                log::warn!("notes document {} is unreadable, starting empty: {e}", self.notes_path().display());
                Vec::new()
            }
        }
    }

    /// Loads settings, merging recognised keys over the defaults.
    pub fn load_settings(&self) -> Settings {
        let Some(text) = read_document(&self.settings_path()) else {
            return Settings::default();
        };
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(document) => Settings::from_document(&document),
            Err(e) => {
                log::warn!("settings document {} is unreadable, using defaults: {e}", self.settings_path().display());
                Settings::default()
            }
        }
    }

    /// Overwrites the notes document, logging any failure.
    pub fn save_notes(&self, notes: &[Note]) {
        if let Err(e) = self.try_save_notes(notes) {
            log::error!("failed to save notes: {e}");
        }
    }

    /// Overwrites the settings document, logging any failure.
    pub fn save_settings(&self, settings: &Settings) {
        if let Err(e) = self.try_save_settings(settings) {
            log::error!("failed to save settings: {e}");
        }
    }

    /// Overwrites the notes document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StickiesError::Io`] if the directory or file cannot be
    /// written, or [`crate::StickiesError::Json`] if serialization fails.
    pub fn try_save_notes(&self, notes: &[Note]) -> Result<()> {
        let json = serde_json::to_string_pretty(notes)?;
        write_document(&self.notes_path(), &json)?;
        log::debug!("saved {} notes", notes.len());
        Ok(())
    }

    /// Overwrites the settings document.
    ///
    /// # Errors
    ///
    /// Same as [`try_save_notes`](Self::try_save_notes).
    pub fn try_save_settings(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        write_document(&self.settings_path(), &json)
    }
}

fn read_document(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("{} does not exist yet", path.display());
            None
        }
        Err(e) => {
            log::warn!("failed to read {}: {e}", path.display());
            None
        }
    }
}

fn write_document(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
