//! Switch / Remove commands consumed by the picker and the CLI.
//!
//! Indices handed in here come from an earlier snapshot of the history, so
//! every command re-reads the live order before touching anything.

use std::rc::Rc;

use crate::core::tracker::{SharedTracker, TrackerError};
use crate::host::settings::{Settings, SettingsError};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Register the tracker as the change handler for `key` on `settings`.
///
/// Errors inside the callback have nowhere to go, so they are logged.
pub fn watch_setting(settings: &mut dyn Settings, key: &str, tracker: SharedTracker) {
    settings.on_change(
        key,
        Box::new(move |value: &str| {
            let Ok(mut guard) = tracker.try_borrow_mut() else {
                tracing::warn!("tracker busy, dropped change to {value:?}");
                return;
            };
            match guard.on_external_change(value) {
                Ok(true) => tracing::debug!("tracking new scheme {value:?}"),
                Ok(false) => {}
                Err(e) => tracing::warn!("could not record scheme {value:?}: {e}"),
            }
        }),
    );
}

/// The tracker together with the host settings it drives.
pub struct SchemeSwitcher<S: Settings> {
    tracker: SharedTracker,
    settings: S,
    key: String,
}

impl<S: Settings> SchemeSwitcher<S> {
    /// Wire `tracker` to changes of `key` on `settings`.
    pub fn new(tracker: SharedTracker, mut settings: S, key: impl Into<String>) -> Self {
        let key = key.into();
        watch_setting(&mut settings, &key, Rc::clone(&tracker));
        Self {
            tracker,
            settings,
            key,
        }
    }

    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    pub fn setting_key(&self) -> &str {
        &self.key
    }

    /// Currently applied scheme, if the host has one.
    pub fn active(&self) -> Option<String> {
        self.settings.get(&self.key)
    }

    /// Snapshot of the history in MRU order.
    pub fn current_order(&self) -> Vec<String> {
        self.tracker.borrow().current_order().to_vec()
    }

    pub fn list_display_items(&self) -> Vec<String> {
        self.tracker.borrow().list_display_items()
    }

    /// Live position of `scheme`, for re-deriving a stale index.
    pub fn index_of(&self, scheme: &str) -> Option<usize> {
        self.tracker
            .borrow()
            .current_order()
            .iter()
            .position(|s| s == scheme)
    }

    /// Move `scheme` to the front of the history without applying it.
    pub fn promote(&mut self, scheme: &str) -> Result<(), CommandError> {
        self.tracker.borrow_mut().promote(scheme)?;
        Ok(())
    }

    /// Confirm the entry at `index`: promote it and make it active.
    pub fn switch(&mut self, index: Option<usize>) -> Result<(), CommandError> {
        self.apply(index, true)
    }

    /// Preview the entry at `index` without touching the history order.
    pub fn highlight(&mut self, index: Option<usize>) -> Result<(), CommandError> {
        self.apply(index, false)
    }

    /// Drop the entry at `index` from the history.  The active setting is
    /// left alone.
    pub fn remove(&mut self, index: Option<usize>) -> Result<Option<String>, CommandError> {
        let Some(index) = index else {
            return Ok(None);
        };
        let removed = self.tracker.borrow_mut().remove(index)?;
        tracing::debug!("removed {removed:?} from history");
        Ok(Some(removed))
    }

    /// Write `value` as the active setting.  Watchers fire as usual.
    pub fn set_active(&mut self, value: &str) -> Result<(), CommandError> {
        tracing::info!("Setting scheme to {value}");
        self.settings.set(&self.key, value)?;
        Ok(())
    }

    /// Feed the host's current value to the tracker as if it had just
    /// changed.  Returns whether it was promoted.
    pub fn sync(&mut self) -> Result<bool, CommandError> {
        let Some(current) = self.active() else {
            tracing::debug!("{} is not set, nothing to sync", self.key);
            return Ok(false);
        };
        let promoted = self.tracker.borrow_mut().on_external_change(&current)?;
        Ok(promoted)
    }

    fn apply(&mut self, index: Option<usize>, reorder: bool) -> Result<(), CommandError> {
        let Some(index) = index else {
            return Ok(());
        };
        let (scheme, len) = {
            let tracker = self.tracker.borrow();
            let order = tracker.current_order();
            (order.get(index).cloned(), order.len())
        };
        let scheme = scheme.ok_or(TrackerError::IndexOutOfRange { index, len })?;

        // A failed write still leaves the promotion in memory; apply the
        // scheme anyway and report the write error afterwards.
        let promoted = if reorder {
            self.tracker.borrow_mut().promote(&scheme)
        } else {
            Ok(())
        };

        if self.active().as_deref() != Some(scheme.as_str()) {
            self.set_active(&scheme)?;
        }
        promoted?;
        Ok(())
    }
}
