//! Picker state.
//!
//! The picker works on a snapshot of the history.  The snapshot is refreshed
//! after every command and on every tick, and selection follows the selected
//! scheme by value rather than by position.

use crate::config::AppConfig;
use crate::core::tracker::display_label;
use crate::host::settings::Settings;

use super::commands::SchemeSwitcher;

/// What confirming an entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    Switch,
    Remove,
}

impl PickerMode {
    pub fn title(self) -> &'static str {
        match self {
            PickerMode::Switch => "Switch Color Scheme",
            PickerMode::Remove => "Remove Color Scheme",
        }
    }

    pub fn confirm_verb(self) -> &'static str {
        match self {
            PickerMode::Switch => "switch",
            PickerMode::Remove => "remove",
        }
    }
}

/// Top-level picker state.
pub struct PickerState {
    pub mode: PickerMode,
    /// Full scheme identifiers, in MRU order.
    pub entries: Vec<String>,
    /// Display labels, parallel to `entries`.
    pub labels: Vec<String>,
    /// Scheme currently applied by the host.
    pub active: Option<String>,
    /// Highlighted row.
    pub selected: usize,
    /// First visible row.
    pub offset: usize,
    pub should_quit: bool,
    /// Last error, shown instead of the key hints.
    pub status_message: Option<String>,
    pub config: AppConfig,
}

impl PickerState {
    pub fn new(mode: PickerMode, config: AppConfig) -> Self {
        Self {
            mode,
            entries: Vec::new(),
            labels: Vec::new(),
            active: None,
            selected: 0,
            offset: 0,
            should_quit: false,
            status_message: None,
            config,
        }
    }

    pub fn selected_entry(&self) -> Option<&str> {
        self.entries.get(self.selected).map(String::as_str)
    }

    /// Re-read the history and active scheme, keeping the selection on the
    /// same scheme when it is still present.
    pub fn refresh<S: Settings>(&mut self, switcher: &SchemeSwitcher<S>) {
        let previous = self.selected_entry().map(str::to_string);
        self.entries = switcher.current_order();
        self.labels = self.entries.iter().map(|e| display_label(e)).collect();
        self.active = switcher.active();

        if let Some(pos) = previous.and_then(|p| self.entries.iter().position(|e| *e == p)) {
            self.selected = pos;
        }
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }

    /// Ensure the selected row is visible within a viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}
