//! Per-window note logic, kept apart from rendering.
//!
//! A [`NoteSurface`] reacts to user interaction and controller messages and
//! answers with [`SurfaceAction`]s for the event loop to carry out. It never
//! touches the notes list or the settings directly; everything it wants goes
//! out as a [`SurfaceCommand`].

use crate::{SurfaceCommand, SurfaceEvent, TimerKind, UiEvent};

/// Opacity of a background-mode note after it has faded.
pub const FADED_OPACITY: f64 = 0.3;
/// Opacity of a note that has focus or is not in background mode.
pub const FULL_OPACITY: f64 = 1.0;
/// Question shown before deleting a note that still has text.
pub const DELETE_PROMPT: &str = "Delete this note?";

/// Side effect requested by a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceAction {
    Send(SurfaceCommand),
    Schedule(TimerKind),
    Cancel(TimerKind),
    /// Ask the user a yes/no question.
    Confirm(String),
    /// Give keyboard focus to the window.
    Focus,
}

/// UI state of one note window.
#[derive(Debug, Clone)]
pub struct NoteSurface {
    note_id: Option<String>,
    text: String,
    font_size: Option<u32>,
    always_on_top: bool,
    background_mode: bool,
    deleting: bool,
    confirming: bool,
    focused: bool,
    faded: bool,
}

impl NoteSurface {
    pub fn new(always_on_top: bool) -> Self {
        Self {
            note_id: None,
            text: String::new(),
            font_size: None,
            always_on_top,
            background_mode: false,
            deleting: false,
            confirming: false,
            focused: false,
            faded: false,
        }
    }

    pub fn note_id(&self) -> Option<&str> {
        self.note_id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font size last applied from a settings push.
    pub fn font_size(&self) -> Option<u32> {
        self.font_size
    }

    pub fn is_always_on_top(&self) -> bool {
        self.always_on_top
    }

    pub fn is_background_mode(&self) -> bool {
        self.background_mode
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn is_faded(&self) -> bool {
        self.faded
    }

    /// Handles a message from the controller.
    pub fn on_event(&mut self, event: &SurfaceEvent) -> Vec<SurfaceAction> {
        match event {
            SurfaceEvent::InitialContent { id, content } => {
                self.note_id = Some(id.clone());
                self.text = content.clone();
                vec![SurfaceAction::Focus]
            }
            // Only the font size follows live; color, pin and opacity
            // defaults are for windows opened afterwards.
            SurfaceEvent::SettingsPushed { settings } => {
                self.font_size = Some(settings.live().font_size);
                Vec::new()
            }
            SurfaceEvent::PinStatus { pinned } => {
                self.always_on_top = *pinned;
                Vec::new()
            }
            SurfaceEvent::SettingsData { .. } | SurfaceEvent::ApplyOpacity { .. } => Vec::new(),
        }
    }

    /// Handles user interaction inside the window.
    pub fn on_ui(&mut self, event: UiEvent) -> Vec<SurfaceAction> {
        match event {
            UiEvent::Input { text } => {
                self.text = text;
                vec![SurfaceAction::Schedule(TimerKind::ContentSave)]
            }
            UiEvent::DeleteClicked => self.request_delete(),
            UiEvent::ConfirmAnswered { confirmed } => {
                if !self.confirming {
                    return Vec::new();
                }
                self.confirming = false;
                if confirmed {
                    self.delete_now()
                } else {
                    Vec::new()
                }
            }
            UiEvent::TogglePinClicked => vec![SurfaceAction::Send(SurfaceCommand::TogglePin)],
            UiEvent::ToggleBackgroundClicked => self.toggle_background(),
            UiEvent::NewNoteClicked => vec![SurfaceAction::Send(SurfaceCommand::RequestNewNote)],
            UiEvent::KeyDown { key, ctrl, shift } => {
                if !ctrl || shift {
                    return Vec::new();
                }
                match key.to_ascii_lowercase().as_str() {
                    "t" => self.on_ui(UiEvent::TogglePinClicked),
                    "b" => self.on_ui(UiEvent::ToggleBackgroundClicked),
                    "w" => self.on_ui(UiEvent::DeleteClicked),
                    _ => Vec::new(),
                }
            }
        }
    }

    pub fn on_focus(&mut self, focused: bool) -> Vec<SurfaceAction> {
        self.focused = focused;
        if focused {
            let mut actions = vec![SurfaceAction::Cancel(TimerKind::FocusFade)];
            if self.faded {
                self.faded = false;
                actions.push(set_opacity(FULL_OPACITY));
            }
            actions
        } else if self.background_mode {
            vec![SurfaceAction::Schedule(TimerKind::FocusFade)]
        } else {
            Vec::new()
        }
    }

    pub fn on_timer(&mut self, kind: TimerKind) -> Vec<SurfaceAction> {
        match kind {
            TimerKind::ContentSave => self.save().into_iter().collect(),
            TimerKind::FocusFade if self.background_mode && !self.focused => {
                self.faded = true;
                vec![set_opacity(FADED_OPACITY)]
            }
            TimerKind::FocusFade | TimerKind::MoveSettle => Vec::new(),
        }
    }

    /// Final flush before the window goes away; nothing when deleting.
    pub fn unload(&mut self) -> Vec<SurfaceAction> {
        let mut actions = vec![SurfaceAction::Cancel(TimerKind::ContentSave)];
        if !self.deleting {
            actions.extend(self.save());
        }
        actions
    }

    fn save(&self) -> Option<SurfaceAction> {
        let Some(id) = &self.note_id else {
            log::debug!("no note loaded yet; skipping save");
            return None;
        };
        Some(SurfaceAction::Send(SurfaceCommand::SaveNote {
            id: id.clone(),
            content: self.text.clone(),
        }))
    }

    fn request_delete(&mut self) -> Vec<SurfaceAction> {
        if self.deleting || self.confirming {
            return Vec::new();
        }
        if self.text.trim().is_empty() {
            self.delete_now()
        } else {
            self.confirming = true;
            vec![SurfaceAction::Confirm(DELETE_PROMPT.to_string())]
        }
    }

    fn delete_now(&mut self) -> Vec<SurfaceAction> {
        self.deleting = true;
        vec![
            SurfaceAction::Cancel(TimerKind::ContentSave),
            SurfaceAction::Send(SurfaceCommand::DeleteNote),
        ]
    }

    fn toggle_background(&mut self) -> Vec<SurfaceAction> {
        self.background_mode = !self.background_mode;
        if self.background_mode {
            if self.focused {
                Vec::new()
            } else {
                vec![SurfaceAction::Schedule(TimerKind::FocusFade)]
            }
        } else {
            let mut actions = vec![SurfaceAction::Cancel(TimerKind::FocusFade)];
            if self.faded {
                self.faded = false;
                actions.push(set_opacity(FULL_OPACITY));
            }
            actions
        }
    }
}

fn set_opacity(opacity: f64) -> SurfaceAction {
    SurfaceAction::Send(SurfaceCommand::SetOpacity { opacity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    fn loaded(content: &str) -> NoteSurface {
        let mut s = NoteSurface::new(true);
        s.on_event(&SurfaceEvent::InitialContent {
            id: "n1".to_string(),
            content: content.to_string(),
        });
        s
    }

    fn sends(actions: &[SurfaceAction]) -> Vec<SurfaceCommand> {
        actions
            .iter()
            .filter_map(|a| match a {
                SurfaceAction::Send(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_load_sets_text_and_focuses() {
        let mut s = NoteSurface::new(true);
        let actions = s.on_event(&SurfaceEvent::InitialContent {
            id: "5".to_string(),
            content: "hi".to_string(),
        });
        assert_eq!(actions, vec![SurfaceAction::Focus]);
        assert_eq!(s.note_id(), Some("5"));
        assert_eq!(s.text(), "hi");
    }

    #[test]
    fn test_settings_push_applies_only_font_size() {
        let mut s = loaded("");
        let settings = Settings {
            font_size: 20,
            always_on_top: false,
            ..Settings::default()
        };
        s.on_event(&SurfaceEvent::SettingsPushed { settings });
        assert_eq!(s.font_size(), Some(20));
        assert!(s.is_always_on_top());
    }

    #[test]
    fn test_input_schedules_then_timer_saves_full_text() {
        let mut s = loaded("");
        assert_eq!(
            s.on_ui(UiEvent::Input { text: "a".to_string() }),
            vec![SurfaceAction::Schedule(TimerKind::ContentSave)]
        );
        s.on_ui(UiEvent::Input { text: "ab".to_string() });
        let actions = s.on_timer(TimerKind::ContentSave);
        assert_eq!(
            sends(&actions),
            vec![SurfaceCommand::SaveNote {
                id: "n1".to_string(),
                content: "ab".to_string()
            }]
        );
    }

    #[test]
    fn test_delete_empty_note_needs_no_confirmation() {
        let mut s = loaded("   \n");
        let actions = s.on_ui(UiEvent::DeleteClicked);
        assert_eq!(sends(&actions), vec![SurfaceCommand::DeleteNote]);
        assert!(s.is_deleting());
    }

    #[test]
    fn test_delete_with_content_asks_first() {
        let mut s = loaded("keep me?");
        let actions = s.on_ui(UiEvent::DeleteClicked);
        assert_eq!(actions, vec![SurfaceAction::Confirm(DELETE_PROMPT.to_string())]);
        assert!(!s.is_deleting());

        // A second click while the question is open does nothing.
        assert!(s.on_ui(UiEvent::DeleteClicked).is_empty());

        let actions = s.on_ui(UiEvent::ConfirmAnswered { confirmed: false });
        assert!(actions.is_empty());
        assert!(!s.is_deleting());

        s.on_ui(UiEvent::DeleteClicked);
        let actions = s.on_ui(UiEvent::ConfirmAnswered { confirmed: true });
        assert_eq!(sends(&actions), vec![SurfaceCommand::DeleteNote]);
        assert!(s.is_deleting());
    }

    #[test]
    fn test_stray_confirmation_ignored() {
        let mut s = loaded("text");
        assert!(s.on_ui(UiEvent::ConfirmAnswered { confirmed: true }).is_empty());
        assert!(!s.is_deleting());
    }

    #[test]
    fn test_unload_flushes_unless_deleting() {
        let mut s = loaded("draft");
        s.on_ui(UiEvent::Input { text: "draft 2".to_string() });
        let actions = s.unload();
        assert!(actions.contains(&SurfaceAction::Cancel(TimerKind::ContentSave)));
        assert_eq!(
            sends(&actions),
            vec![SurfaceCommand::SaveNote {
                id: "n1".to_string(),
                content: "draft 2".to_string()
            }]
        );

        let mut s = loaded("");
        s.on_ui(UiEvent::DeleteClicked);
        assert!(sends(&s.unload()).is_empty());
    }

    #[test]
    fn test_save_before_load_is_skipped() {
        let mut s = NoteSurface::new(true);
        s.on_ui(UiEvent::Input { text: "x".to_string() });
        assert!(s.on_timer(TimerKind::ContentSave).is_empty());
    }

    #[test]
    fn test_background_mode_fades_after_blur() {
        let mut s = loaded("");
        s.on_focus(true);
        assert!(s.on_ui(UiEvent::ToggleBackgroundClicked).is_empty());
        assert!(s.is_background_mode());

        assert_eq!(s.on_focus(false), vec![SurfaceAction::Schedule(TimerKind::FocusFade)]);
        let actions = s.on_timer(TimerKind::FocusFade);
        assert_eq!(sends(&actions), vec![SurfaceCommand::SetOpacity { opacity: FADED_OPACITY }]);
        assert!(s.is_faded());

        let actions = s.on_focus(true);
        assert!(actions.contains(&SurfaceAction::Cancel(TimerKind::FocusFade)));
        assert_eq!(sends(&actions), vec![SurfaceCommand::SetOpacity { opacity: FULL_OPACITY }]);
        assert!(!s.is_faded());
    }

    #[test]
    fn test_background_toggle_while_unfocused_schedules_fade() {
        let mut s = loaded("");
        assert_eq!(
            s.on_ui(UiEvent::ToggleBackgroundClicked),
            vec![SurfaceAction::Schedule(TimerKind::FocusFade)]
        );
        s.on_timer(TimerKind::FocusFade);
        assert!(s.is_faded());

        let actions = s.on_ui(UiEvent::ToggleBackgroundClicked);
        assert!(!s.is_background_mode());
        assert_eq!(sends(&actions), vec![SurfaceCommand::SetOpacity { opacity: FULL_OPACITY }]);
    }

    #[test]
    fn test_blur_without_background_mode_does_nothing() {
        let mut s = loaded("");
        s.on_focus(true);
        assert!(s.on_focus(false).is_empty());
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let mut s = loaded("");
        let key = |k: &str| UiEvent::KeyDown {
            key: k.to_string(),
            ctrl: true,
            shift: false,
        };
        assert_eq!(sends(&s.on_ui(key("T"))), vec![SurfaceCommand::TogglePin]);
        s.on_ui(key("b"));
        assert!(s.is_background_mode());
        assert_eq!(sends(&s.on_ui(key("w"))), vec![SurfaceCommand::DeleteNote]);
        assert!(s
            .on_ui(UiEvent::KeyDown {
                key: "t".to_string(),
                ctrl: false,
                shift: false
            })
            .is_empty());
    }

    #[test]
    fn test_pin_status_updates_flag() {
        let mut s = loaded("");
        s.on_event(&SurfaceEvent::PinStatus { pinned: false });
        assert!(!s.is_always_on_top());
    }
}
