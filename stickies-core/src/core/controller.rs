//! Owns the notes list and the live note windows.
//!
//! Every mutation of the list is written through to the [`Store`]. The only
//! exception is opening a note: the record is kept in memory and reaches
//! disk with its first content save or settled move.

use crate::core::settings::clamp_opacity;
use crate::{
    timestamp_id, Bounds, Note, NoteDraft, Result, Settings,
    StickiesError, Store, SurfaceEvent, WindowHost, WindowId, WindowSpec, WorkArea,
    DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH,
};
use std::collections::BTreeMap;

/// Horizontal and vertical offset between consecutive default placements.
pub const CASCADE_STEP: i32 = 30;

#[derive(Debug, Clone)]
struct NoteWindow {
    note_id: String,
    deleting: bool,
}

/// The note window controller.
#[derive(Debug, Default)]
pub struct NoteController {
    notes: Vec<Note>,
    windows: BTreeMap<WindowId, NoteWindow>,
    next_window: u64,
}

impl NoteController {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            windows: BTreeMap::new(),
            next_window: 1,
        }
    }

    /// All records, in creation order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn window_ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys().copied()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn contains_window(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    /// The note displayed in `window`.
    pub fn note_id(&self, window: WindowId) -> Option<&str> {
        self.windows.get(&window).map(|w| w.note_id.as_str())
    }

    pub fn window_for_note(&self, id: &str) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|(_, w)| w.note_id == id)
            .map(|(window, _)| *window)
    }

    pub fn is_deleting(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.deleting)
    }

    /// Opens every stored note, or a single blank one when there are none.
    pub fn open_stored<H: WindowHost>(&mut self, host: &mut H, settings: &Settings) -> Vec<WindowId> {
        let drafts: Vec<NoteDraft> = if self.notes.is_empty() {
            vec![NoteDraft::default()]
        } else {
            self.notes.iter().cloned().map(NoteDraft::from).collect()
        };

        let mut opened = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match self.create_note(host, settings, draft) {
                Ok(window) => opened.push(window),
                Err(e) => log::error!("failed to open note window: {e}"),
            }
        }
        opened
    }

    /// Opens a window for `draft`, filling in id, size and position.
    ///
    /// If a window already shows the requested id it is focused and returned
    /// instead of opening a second one.
    ///
    /// # Errors
    ///
    /// Returns [`StickiesError::Host`] if the toolkit cannot create the window;
    /// the notes list is left untouched in that case.
    pub fn create_note<H: WindowHost>(
        &mut self,
        host: &mut H,
        settings: &Settings,
        draft: NoteDraft,
    ) -> Result<WindowId> {
        if let Some(existing) = draft.id.as_deref().and_then(|id| self.window_for_note(id)) {
            host.focus_window(existing)?;
            return Ok(existing);
        }

        let id = match draft.id {
            Some(id) => id,
            None => self.fresh_id(timestamp_id()),
        };
        let width = draft.width.unwrap_or(DEFAULT_NOTE_WIDTH);
        let height = draft.height.unwrap_or(DEFAULT_NOTE_HEIGHT);
        let (default_x, default_y) =
            default_position(host.work_area(), width, height, self.notes.len());
        let bounds = Bounds {
            x: draft.x.unwrap_or(default_x),
            y: draft.y.unwrap_or(default_y),
            width,
            height,
        };

        let defaults = settings.window_defaults();
        let spec = WindowSpec {
            bounds,
            color: defaults.color,
            always_on_top: defaults.always_on_top,
            opacity: defaults.opacity,
        };

        let window = WindowId::new(self.next_window);
        self.next_window += 1;
        host.open_note_window(window, &spec)?;

        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) if note.bounds().is_none() => note.set_bounds(bounds),
            Some(_) => {}
            None => self.notes.push(Note::placed(
                id.clone(),
                draft.content.unwrap_or_default(),
                bounds,
            )),
        }
        log::info!("opened {window} for note {id}");
        self.windows.insert(
            window,
            NoteWindow {
                note_id: id,
                deleting: false,
            },
        );
        Ok(window)
    }

    /// The message that fills a freshly loaded page.
    pub fn initial_content(&self, window: WindowId) -> Option<SurfaceEvent> {
        let id = self.note_id(window)?;
        let content = self.note(id).map(|n| n.content.clone()).unwrap_or_default();
        Some(SurfaceEvent::InitialContent {
            id: id.to_string(),
            content,
        })
    }

    /// Stores the settled geometry of `window`. Returns whether anything was
    /// written.
    pub fn window_moved<H: WindowHost>(&mut self, host: &H, store: &Store, window: WindowId) -> bool {
        let Some(id) = self.note_id(window).map(str::to_owned) else {
            return false;
        };
        let Some(bounds) = host.bounds(window) else {
            log::debug!("{window} is gone; dropping its move");
            return false;
        };
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        note.set_bounds(bounds);
        store.save_notes(&self.notes);
        true
    }

    /// Inserts or replaces the record `id`, taking geometry from the window
    /// that sent it, and writes the whole list.
    pub fn save_note<H: WindowHost>(
        &mut self,
        host: &H,
        store: &Store,
        window: Option<WindowId>,
        id: &str,
        content: &str,
    ) {
        let existing = self.notes.iter().position(|n| n.id == id);
        let bounds = window
            .and_then(|w| host.bounds(w))
            .or_else(|| existing.and_then(|i| self.notes[i].bounds()))
            .unwrap_or_else(|| {
                let (x, y) = default_position(
                    host.work_area(),
                    DEFAULT_NOTE_WIDTH,
                    DEFAULT_NOTE_HEIGHT,
                    self.notes.len(),
                );
                Bounds {
                    x,
                    y,
                    width: DEFAULT_NOTE_WIDTH,
                    height: DEFAULT_NOTE_HEIGHT,
                }
            });

        let note = Note::placed(id.to_string(), content.to_string(), bounds);

        match existing {
            Some(i) => self.notes[i] = note,
            None => self.notes.push(note),
        }
        store.save_notes(&self.notes);
    }

    /// Flags `window` so that closing it removes its record.
    ///
    /// # Errors
    ///
    /// Returns [`StickiesError::WindowNotFound`] if `window` is not open.
    pub fn mark_deleting(&mut self, window: WindowId) -> Result<()> {
        let entry = self
            .windows
            .get_mut(&window)
            .ok_or_else(|| StickiesError::WindowNotFound(window.label()))?;
        entry.deleting = true;
        Ok(())
    }

    /// Forgets and destroys `window`. The record is removed (and the list
    /// written) only when the window was flagged for deletion.
    ///
    /// # Errors
    ///
    /// Returns [`StickiesError::WindowNotFound`] if `window` is not open.
    pub fn close_window<H: WindowHost>(
        &mut self,
        host: &mut H,
        store: &Store,
        window: WindowId,
    ) -> Result<()> {
        let entry = self
            .windows
            .remove(&window)
            .ok_or_else(|| StickiesError::WindowNotFound(window.label()))?;

        if entry.deleting {
            if let Some(i) = self.notes.iter().position(|n| n.id == entry.note_id) {
                self.notes.remove(i);
                store.save_notes(&self.notes);
            }
            log::info!("deleted note {}", entry.note_id);
        } else {
            log::info!("closed {window}; note {} stays stored", entry.note_id);
        }

        if let Err(e) = host.close_window(window) {
            log::debug!("{window} already gone: {e}");
        }
        Ok(())
    }

    /// Flips always-on-top for `window` and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`StickiesError::WindowNotFound`] if `window` is not open, or
    /// the toolkit's error if the change is rejected.
    pub fn toggle_pin<H: WindowHost>(&mut self, host: &mut H, window: WindowId) -> Result<bool> {
        let current = host
            .is_always_on_top(window)
            .ok_or_else(|| StickiesError::WindowNotFound(window.label()))?;
        self.set_always_on_top(host, window, !current)?;
        Ok(!current)
    }

    /// Session-only; never persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StickiesError::WindowNotFound`] if `window` is not open.
    pub fn set_always_on_top<H: WindowHost>(
        &mut self,
        host: &mut H,
        window: WindowId,
        on_top: bool,
    ) -> Result<()> {
        self.ensure_open(window)?;
        host.set_always_on_top(window, on_top)
    }

    /// Session-only; never persisted. `opacity` is clamped into `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`StickiesError::WindowNotFound`] if `window` is not open.
    pub fn set_opacity<H: WindowHost>(
        &mut self,
        host: &mut H,
        window: WindowId,
        opacity: f64,
    ) -> Result<()> {
        self.ensure_open(window)?;
        host.set_opacity(window, clamp_opacity(opacity))
    }

    fn ensure_open(&self, window: WindowId) -> Result<()> {
        if self.windows.contains_key(&window) {
            Ok(())
        } else {
            Err(StickiesError::WindowNotFound(window.label()))
        }
    }

    /// Returns `candidate`, bumped until no record or window uses it.
    fn fresh_id(&self, candidate: String) -> String {
        let taken = |id: &str| self.note(id).is_some() || self.window_for_note(id).is_some();
        if !taken(&candidate) {
            return candidate;
        }
        let Ok(mut n) = candidate.parse::<i64>() else {
            let mut suffix = 2;
            while taken(&format!("{candidate}-{suffix}")) {
                suffix += 1;
            }
            return format!("{candidate}-{suffix}");
        };
        loop {
            n += 1;
            let id = n.to_string();
            if !taken(&id) {
                return id;
            }
        }
    }
}

/// Centre of the work area, cascaded by [`CASCADE_STEP`] per existing note.
pub fn default_position(work: WorkArea, width: i32, height: i32, existing: usize) -> (i32, i32) {
    let offset = CASCADE_STEP.saturating_mul(i32::try_from(existing).unwrap_or(i32::MAX));
    (
        (work.width / 2 - width / 2).saturating_add(offset),
        (work.height / 2 - height / 2).saturating_add(offset),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use crate::NoteColor;
    use tempfile::TempDir;

    fn setup(notes: Vec<Note>) -> (TempDir, Store, FakeHost, NoteController) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        (dir, store, FakeHost::new(), NoteController::new(notes))
    }

    fn stored(id: &str, content: &str) -> Note {
        Note::placed(
            id.to_string(),
            content.to_string(),
            Bounds { x: 100, y: 100, width: 240, height: 240 },
        )
    }

    #[test]
    fn test_default_position_cascades() {
        let work = WorkArea {
            width: 1920,
            height: 1080,
        };
        assert_eq!(default_position(work, 240, 240, 0), (840, 420));
        assert_eq!(default_position(work, 240, 240, 2), (900, 480));
    }

    #[test]
    fn test_first_run_opens_one_blank_centered_note() {
        let (_dir, store, mut host, mut ctl) = setup(Vec::new());
        let opened = ctl.open_stored(&mut host, &Settings::default());
        assert_eq!(opened.len(), 1);

        let spec = host.spec(opened[0]).unwrap();
        assert_eq!(spec.bounds, Bounds { x: 840, y: 420, width: 240, height: 240 });
        assert!(spec.always_on_top);

        let id = ctl.note_id(opened[0]).unwrap();
        assert!(id.parse::<i64>().is_ok());
        assert_eq!(ctl.note(id).unwrap().content, "");
        // Opening alone does not write.
        assert!(!store.notes_path().exists());
    }

    #[test]
    fn test_stored_note_reopens_where_it_was() {
        let (_dir, _store, mut host, mut ctl) = setup(vec![stored("5", "hi")]);
        let opened = ctl.open_stored(&mut host, &Settings::default());
        assert_eq!(opened.len(), 1);
        let spec = host.spec(opened[0]).unwrap();
        assert_eq!(spec.bounds, Bounds { x: 100, y: 100, width: 240, height: 240 });
        assert_eq!(
            ctl.initial_content(opened[0]),
            Some(SurfaceEvent::InitialContent {
                id: "5".to_string(),
                content: "hi".to_string()
            })
        );
        assert_eq!(ctl.notes().len(), 1);
    }

    #[test]
    fn test_new_windows_use_window_defaults() {
        let (_dir, _store, mut host, mut ctl) = setup(Vec::new());
        let settings = Settings {
            default_color: NoteColor::Blue,
            always_on_top: false,
            default_opacity: 0.7,
            ..Settings::default()
        };
        let w = ctl.create_note(&mut host, &settings, NoteDraft::default()).unwrap();
        let spec = host.spec(w).unwrap();
        assert_eq!(spec.color, NoteColor::Blue);
        assert!(!spec.always_on_top);
        assert_eq!(spec.opacity, 0.7);
    }

    #[test]
    fn test_new_notes_cascade_and_get_unique_ids() {
        let (_dir, _store, mut host, mut ctl) = setup(Vec::new());
        let settings = Settings::default();
        let a = ctl.create_note(&mut host, &settings, NoteDraft::default()).unwrap();
        let b = ctl.create_note(&mut host, &settings, NoteDraft::default()).unwrap();
        assert_ne!(ctl.note_id(a), ctl.note_id(b));
        let (pa, pb) = (host.spec(a).unwrap().bounds, host.spec(b).unwrap().bounds);
        assert_eq!(pb.x - pa.x, CASCADE_STEP);
        assert_eq!(pb.y - pa.y, CASCADE_STEP);
    }

    #[test]
    fn test_same_id_is_never_opened_twice() {
        let (_dir, _store, mut host, mut ctl) = setup(vec![stored("5", "hi")]);
        let settings = Settings::default();
        let first = ctl.create_note(&mut host, &settings, stored("5", "hi").into()).unwrap();
        let again = ctl.create_note(&mut host, &settings, stored("5", "hi").into()).unwrap();
        assert_eq!(first, again);
        assert_eq!(ctl.window_count(), 1);
        assert_eq!(host.focused, vec![first]);
    }

    #[test]
    fn test_failed_window_leaves_list_alone() {
        let (_dir, _store, mut host, mut ctl) = setup(Vec::new());
        host.fail_open = true;
        assert!(ctl.create_note(&mut host, &Settings::default(), NoteDraft::default()).is_err());
        assert!(ctl.notes().is_empty());
        assert_eq!(ctl.window_count(), 0);
    }

    #[test]
    fn test_move_updates_geometry_and_writes() {
        let (_dir, store, mut host, mut ctl) = setup(vec![stored("5", "hi")]);
        let w = ctl.open_stored(&mut host, &Settings::default())[0];
        host.move_to(w, 300, 50);
        assert!(ctl.window_moved(&host, &store, w));
        let saved = store.load_notes();
        assert_eq!((saved[0].x, saved[0].y), (Some(300), Some(50)));
    }

    #[test]
    fn test_save_note_upserts_with_window_bounds() {
        let (_dir, store, mut host, mut ctl) = setup(vec![stored("5", "hi")]);
        let w = ctl.open_stored(&mut host, &Settings::default())[0];
        host.move_to(w, 10, 20);
        ctl.save_note(&host, &store, Some(w), "5", "hello");
        ctl.save_note(&host, &store, None, "9", "new");

        let saved = store.load_notes();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].content, "hello");
        assert_eq!((saved[0].x, saved[0].y), (Some(10), Some(20)));
        assert_eq!(saved[1].id, "9");
        assert_eq!(saved[1].width, DEFAULT_NOTE_WIDTH);
    }

    #[test]
    fn test_close_without_delete_keeps_record() {
        let (_dir, store, mut host, mut ctl) = setup(vec![stored("5", "hi")]);
        let w = ctl.open_stored(&mut host, &Settings::default())[0];
        ctl.close_window(&mut host, &store, w).unwrap();
        assert_eq!(ctl.window_count(), 0);
        assert_eq!(ctl.notes().len(), 1);
        assert!(host.closed.contains(&w));
        assert!(!store.notes_path().exists());
    }

    #[test]
    fn test_delete_removes_record_and_writes() {
        let (_dir, store, mut host, mut ctl) = setup(vec![stored("5", "hi"), stored("6", "there")]);
        let opened = ctl.open_stored(&mut host, &Settings::default());
        ctl.mark_deleting(opened[0]).unwrap();
        ctl.close_window(&mut host, &store, opened[0]).unwrap();
        let saved = store.load_notes();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, "6");
    }

    #[test]
    fn test_toggle_pin_flips_host_state() {
        let (_dir, _store, mut host, mut ctl) = setup(Vec::new());
        let w = ctl.create_note(&mut host, &Settings::default(), NoteDraft::default()).unwrap();
        assert!(!ctl.toggle_pin(&mut host, w).unwrap());
        assert!(ctl.toggle_pin(&mut host, w).unwrap());
    }

    #[test]
    fn test_opacity_is_clamped_and_unknown_window_rejected() {
        let (_dir, _store, mut host, mut ctl) = setup(Vec::new());
        let w = ctl.create_note(&mut host, &Settings::default(), NoteDraft::default()).unwrap();
        ctl.set_opacity(&mut host, w, 4.0).unwrap();
        assert_eq!(host.opacity(w), Some(1.0));
        assert!(matches!(
            ctl.set_opacity(&mut host, WindowId::new(99), 0.5),
            Err(StickiesError::WindowNotFound(_))
        ));
    }

    #[test]
    fn test_fresh_id_skips_taken_ids() {
        let ctl = NoteController::new(vec![stored("100", ""), stored("101", "")]);
        assert_eq!(ctl.fresh_id("100".to_string()), "102");
        assert_eq!(ctl.fresh_id("200".to_string()), "200");
    }
}
