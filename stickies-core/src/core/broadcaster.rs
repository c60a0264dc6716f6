//! The settings singleton and its fan-out to open notes.

use crate::{Settings, SettingsPatch, Store, SurfaceEvent, WindowHost, WindowId};

/// Holds the current settings; every update is saved and then pushed.
#[derive(Debug, Clone, Default)]
pub struct SettingsBroadcaster {
    settings: Settings,
}

impl SettingsBroadcaster {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Merges `patch`, writes the result through and returns it.
    pub fn apply(&mut self, store: &Store, patch: &SettingsPatch) -> &Settings {
        self.settings.merge(patch);
        store.save_settings(&self.settings);
        log::info!("settings updated: {:?}", self.settings);
        &self.settings
    }

    /// The message every open note receives after a change.
    pub fn push_event(&self) -> SurfaceEvent {
        SurfaceEvent::SettingsPushed {
            settings: self.settings.clone(),
        }
    }

    /// Sends the current settings to each window in `targets`. Windows that
    /// have gone away are skipped. Returns how many received the push.
    pub fn broadcast<H, I>(&self, host: &mut H, targets: I) -> usize
    where
        H: WindowHost,
        I: IntoIterator<Item = WindowId>,
    {
        let event = self.push_event();
        let mut delivered = 0;
        for window in targets {
            match host.send(window, &event) {
                Ok(()) => delivered += 1,
                Err(e) => log::debug!("skipping settings push to {window}: {e}"),
            }
        }
        delivered
    }

    /// [`apply`](Self::apply) followed by [`broadcast`](Self::broadcast).
    pub fn update<H, I>(&mut self, host: &mut H, store: &Store, patch: &SettingsPatch, targets: I) -> usize
    where
        H: WindowHost,
        I: IntoIterator<Item = WindowId>,
    {
        self.apply(store, patch);
        self.broadcast(host, targets)
    }
}
