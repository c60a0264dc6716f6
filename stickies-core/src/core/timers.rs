//! Per-window debounce and grace timers.
//!
//! A timer is identified by its window and kind, so each window holds at
//! most one timer of each kind. Scheduling an already pending timer moves
//! its deadline; that is how bursts collapse into a single action.

use crate::WindowId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Quiet period after the last move before geometry is saved.
pub const MOVE_DEBOUNCE: Duration = Duration::from_millis(300);
/// Quiet period after the last keystroke before content is saved.
pub const CONTENT_DEBOUNCE: Duration = Duration::from_millis(500);
/// Grace period after losing focus before a background note fades.
pub const FADE_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    MoveSettle,
    ContentSave,
    FocusFade,
}

impl TimerKind {
    pub fn delay(self) -> Duration {
        match self {
            Self::MoveSettle => MOVE_DEBOUNCE,
            Self::ContentSave => CONTENT_DEBOUNCE,
            Self::FocusFade => FADE_GRACE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerKey {
    pub window: WindowId,
    pub kind: TimerKind,
}

impl TimerKey {
    pub fn new(window: WindowId, kind: TimerKind) -> Self {
        Self { window, kind }
    }
}

/// Pending deadlines, owned by the control thread.
#[derive(Debug, Default)]
pub struct Timers {
    deadlines: HashMap<TimerKey, Instant>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)schedules `key` to fire one [`TimerKind::delay`] after `now`.
    pub fn schedule(&mut self, key: TimerKey, now: Instant) {
        self.deadlines.insert(key, now + key.kind.delay());
    }

    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.deadlines.remove(&key).is_some()
    }

    pub fn cancel_window(&mut self, window: WindowId) {
        self.deadlines.retain(|key, _| key.window != window);
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.deadlines.contains_key(&key)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerKey> {
        let mut due: Vec<(Instant, TimerKey)> = self
            .deadlines
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(key, at)| (*at, *key))
            .collect();
        due.sort();
        for (_, key) in &due {
            self.deadlines.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
