//! The process-wide settings record and partial updates to it.
//!
//! Settings come in two flavours:
//!
//! - *live* settings ([`LiveSettings`]) are re-applied to every open note
//!   whenever the settings change. Only the font size is live.
//! - *window defaults* ([`WindowDefaults`]) are read once when a note window
//!   is opened and never pushed to windows that already exist.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paper color of a note window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Yellow,
    Pink,
    Blue,
    Green,
    Purple,
    Orange,
}

impl NoteColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }
}

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Text size of every note, in pixels.
    pub font_size: u32,
    /// Paper color of newly opened notes.
    pub default_color: NoteColor,
    /// Whether newly opened notes float above other windows.
    pub always_on_top: bool,
    /// Opacity of newly opened notes, in `[0, 1]`.
    pub default_opacity: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: 16,
            default_color: NoteColor::Yellow,
            always_on_top: true,
            default_opacity: 1.0,
        }
    }
}

/// The part of [`Settings`] that open windows follow immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveSettings {
    pub font_size: u32,
}

/// The part of [`Settings`] applied only when a window is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowDefaults {
    pub color: NoteColor,
    pub always_on_top: bool,
    pub opacity: f64,
}

impl Settings {
    /// Builds settings from a parsed settings document, key by key, over the
    /// defaults. Unknown keys are ignored and invalid values keep the default.
    pub fn from_document(document: &Value) -> Self {
        let mut settings = Self::default();
        settings.merge(&SettingsPatch::from_document(document));
        settings
    }

    /// Shallow-merges `patch` into `self`. A zero font size counts as
    /// absent; opacity is clamped into `[0, 1]`.
    pub fn merge(&mut self, patch: &SettingsPatch) {
        match patch.font_size {
            Some(0) => log::warn!("ignoring font size of 0px"),
            Some(size) => self.font_size = size,
            None => {}
        }
        if let Some(color) = patch.default_color {
            self.default_color = color;
        }
        if let Some(on_top) = patch.always_on_top {
            self.always_on_top = on_top;
        }
        if let Some(opacity) = patch.default_opacity {
            self.default_opacity = clamp_opacity(opacity);
        }
    }

    pub fn live(&self) -> LiveSettings {
        LiveSettings {
            font_size: self.font_size,
        }
    }

    pub fn window_defaults(&self) -> WindowDefaults {
        WindowDefaults {
            color: self.default_color,
            always_on_top: self.always_on_top,
            opacity: self.default_opacity,
        }
    }
}

/// A partial settings update; absent fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_color: Option<NoteColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_opacity: Option<f64>,
}

impl SettingsPatch {
    /// Reads every recognised key from `document` that holds a usable value.
    pub fn from_document(document: &Value) -> Self {
        let Some(map) = document.as_object() else {
            log::warn!("settings document is not an object; using defaults");
            return Self::default();
        };

        let mut patch = Self::default();
        for (key, value) in map {
            let accepted = match key.as_str() {
                "fontSize" => {
                    patch.font_size = value
                        .as_u64()
                        .and_then(|n| u32::try_from(n).ok())
                        .filter(|n| *n > 0);
                    patch.font_size.is_some()
                }
                "defaultColor" => {
                    patch.default_color = serde_json::from_value(value.clone()).ok();
                    patch.default_color.is_some()
                }
                "alwaysOnTop" => {
                    patch.always_on_top = value.as_bool();
                    patch.always_on_top.is_some()
                }
                "defaultOpacity" => {
                    patch.default_opacity = value.as_f64();
                    patch.default_opacity.is_some()
                }
                _ => true,
            };
            if !accepted {
                log::warn!("ignoring invalid settings value for {key}: {value}");
            }
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Clamps an opacity into `[0, 1]`; NaN becomes fully opaque.
pub fn clamp_opacity(value: f64) -> f64 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
