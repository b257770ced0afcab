//! Input handling — maps key events to picker state changes and commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Action;
use crate::host::settings::Settings;

use super::commands::{CommandError, SchemeSwitcher};
use super::state::{PickerMode, PickerState};

/// Process a key event for the picker.
pub fn handle_key<S: Settings>(
    state: &mut PickerState,
    switcher: &mut SchemeSwitcher<S>,
    key: KeyEvent,
) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always cancels, regardless of bindings.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    let selected = state.selected;
    match action {
        Action::MoveUp => move_to(state, switcher, selected.saturating_sub(1)),
        Action::MoveDown => move_to(state, switcher, selected.saturating_add(1)),
        Action::First => move_to(state, switcher, 0),
        Action::Last => move_to(state, switcher, usize::MAX),
        Action::Confirm => confirm(state, switcher),
        Action::Cancel => state.should_quit = true,
    }
}

/// Select row `target` (clamped) and preview it in Switch mode.
fn move_to<S: Settings>(state: &mut PickerState, switcher: &mut SchemeSwitcher<S>, target: usize) {
    if state.entries.is_empty() {
        return;
    }
    let target = target.min(state.entries.len() - 1);
    if target == state.selected {
        return;
    }
    state.selected = target;
    state.status_message = None;

    if state.mode == PickerMode::Switch {
        let result = live_index(state, switcher).map_or(Ok(()), |i| switcher.highlight(Some(i)));
        report(state, result);
        state.refresh(switcher);
    }
}

fn confirm<S: Settings>(state: &mut PickerState, switcher: &mut SchemeSwitcher<S>) {
    if state.entries.is_empty() {
        return;
    }
    let Some(index) = live_index(state, switcher) else {
        state.refresh(switcher);
        state.status_message = Some("Entry is no longer in the history".into());
        return;
    };

    let result = match state.mode {
        PickerMode::Switch => switcher.switch(Some(index)),
        PickerMode::Remove => switcher.remove(Some(index)).map(|_| ()),
    };
    let ok = result.is_ok();
    report(state, result);
    state.refresh(switcher);
    state.should_quit = ok;
}

/// Position of the selected scheme in the live history.
fn live_index<S: Settings>(state: &PickerState, switcher: &SchemeSwitcher<S>) -> Option<usize> {
    state.selected_entry().and_then(|scheme| switcher.index_of(scheme))
}

fn report(state: &mut PickerState, result: Result<(), CommandError>) {
    if let Err(e) = result {
        tracing::warn!("{e}");
        state.status_message = Some(e.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::store::HistoryStore;
    use crate::core::tracker::SchemeTracker;
    use crate::host::settings::MemorySettings;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const KEY: &str = "color_scheme";

    fn setup(
        dir: &TempDir,
        mode: PickerMode,
        items: &[&str],
    ) -> (PickerState, SchemeSwitcher<MemorySettings>) {
        let store = HistoryStore::new(dir.path().join("history.json"));
        let entries: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        store.save(&entries).unwrap();
        let tracker = SchemeTracker::load(store).into_shared();
        let settings = MemorySettings::new().with_value(KEY, items.first().copied().unwrap_or(""));
        let switcher = SchemeSwitcher::new(tracker, settings, KEY);
        let mut state = PickerState::new(mode, AppConfig::default());
        state.refresh(&switcher);
        (state, switcher)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn moving_previews_and_enter_promotes() {
        let dir = TempDir::new().unwrap();
        let (mut state, mut sw) = setup(&dir, PickerMode::Switch, &["a", "b", "c"]);

        handle_key(&mut state, &mut sw, press(KeyCode::Down));
        assert_eq!(state.selected, 1);
        assert_eq!(sw.active().as_deref(), Some("b"));
        assert_eq!(sw.current_order(), ["a", "b", "c"]);

        handle_key(&mut state, &mut sw, press(KeyCode::Enter));
        assert!(state.should_quit);
        assert_eq!(sw.current_order(), ["b", "a", "c"]);
    }

    #[test]
    fn escape_cancels_without_changes() {
        let dir = TempDir::new().unwrap();
        let (mut state, mut sw) = setup(&dir, PickerMode::Switch, &["a", "b"]);
        handle_key(&mut state, &mut sw, press(KeyCode::Esc));
        assert!(state.should_quit);
        assert_eq!(sw.current_order(), ["a", "b"]);
        assert_eq!(sw.active().as_deref(), Some("a"));
    }

    #[test]
    fn remove_mode_does_not_preview() {
        let dir = TempDir::new().unwrap();
        let (mut state, mut sw) = setup(&dir, PickerMode::Remove, &["a", "b", "c"]);

        handle_key(&mut state, &mut sw, press(KeyCode::End));
        assert_eq!(state.selected, 2);
        assert_eq!(sw.active().as_deref(), Some("a"));

        handle_key(&mut state, &mut sw, press(KeyCode::Enter));
        assert!(state.should_quit);
        assert_eq!(sw.current_order(), ["a", "b"]);
        assert_eq!(state.entries, ["a", "b"]);
    }

    #[test]
    fn selection_follows_scheme_after_external_reorder() {
        let dir = TempDir::new().unwrap();
        let (mut state, mut sw) = setup(&dir, PickerMode::Remove, &["a", "b"]);
        handle_key(&mut state, &mut sw, press(KeyCode::Down));
        assert_eq!(state.selected_entry(), Some("b"));

        // A new scheme arrives from the host; "b" shifts to index 2.
        sw.settings_mut().set(KEY, "new").unwrap();
        handle_key(&mut state, &mut sw, press(KeyCode::Enter));
        assert_eq!(sw.current_order(), ["new", "a"]);
    }

    #[test]
    fn empty_history_ignores_keys() {
        let dir = TempDir::new().unwrap();
        let (mut state, mut sw) = setup(&dir, PickerMode::Switch, &[]);
        handle_key(&mut state, &mut sw, press(KeyCode::Down));
        handle_key(&mut state, &mut sw, press(KeyCode::Enter));
        assert!(!state.should_quit);
        assert!(sw.current_order().is_empty());
    }

    #[test]
    fn ctrl_c_quits() {
        let dir = TempDir::new().unwrap();
        let (mut state, mut sw) = setup(&dir, PickerMode::Switch, &["a"]);
        handle_key(
            &mut state,
            &mut sw,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }
}
