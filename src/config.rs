//! User configuration — picker keybindings, the watched setting, and file
//! locations.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/scheme-switch/config.toml` (default
//! `~/.config/scheme-switch/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const APP_DIR: &str = "scheme-switch";

/// Setting watched when nothing else is configured.
pub const DEFAULT_SETTING_KEY: &str = "color_scheme";

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    First,
    Last,
    Confirm,
    Cancel,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::First,
        Action::Last,
        Action::Confirm,
        Action::Cancel,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::First => "first",
            Action::Last => "last",
            Action::Confirm => "confirm",
            Action::Cancel => "cancel",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"↑"`, `"Ctrl+p"`, `"Enter"`).
    pub fn display(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            _ => key_name(self.code),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Up"`, `"Ctrl+p"`).
    fn to_config_string(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&key_name(self.code));
        s
    }

    /// Parse a key string like `"Ctrl+n"`, `"Up"`, `"k"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Single characters keep their case so `G` and `g` differ.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Name of the host setting that holds the active scheme.
    pub setting_key: String,
    /// Overrides the default history location.
    pub history_file: Option<PathBuf>,
    /// Overrides the default preferences location.
    pub preferences_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            setting_key: DEFAULT_SETTING_KEY.to_string(),
            history_file: None,
            preferences_file: None,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n), KeyBind::new(Char('p'), ctrl)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n), KeyBind::new(Char('n'), ctrl)]);
        m.insert(First, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(Last, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]);
        m.insert(Confirm, vec![KeyBind::new(Enter, n)]);
        m.insert(Cancel, vec![KeyBind::new(Esc, n), KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When several bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self, confirm_verb: &str) -> String {
        format!(
            "{}/{}: move | {}: {} | {}: cancel",
            self.short_binding(Action::MoveUp),
            self.short_binding(Action::MoveDown),
            self.short_binding(Action::Confirm),
            confirm_verb,
            self.short_binding(Action::Cancel),
        )
    }

    /// Resolved history file path.
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| data_dir().join(APP_DIR).join("history.json"))
    }

    /// Resolved preferences file path.
    pub fn preferences_path(&self) -> PathBuf {
        self.preferences_file
            .clone()
            .unwrap_or_else(|| config_dir().join(APP_DIR).join("preferences.conf"))
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("cannot read {}: {e}; using defaults", path.display());
                }
                Self::default()
            }
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "setting_key" => {
                    if !value.is_empty() {
                        config.setting_key = value.to_string();
                    }
                    continue;
                }
                "history_file" => {
                    config.history_file = (!value.is_empty()).then(|| PathBuf::from(value));
                    continue;
                }
                "preferences_file" => {
                    config.preferences_file = (!value.is_empty()).then(|| PathBuf::from(value));
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!("ignoring unknown config key {key:?}");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# scheme-switch configuration".to_string(),
            String::new(),
            format!("setting_key = {}", self.setting_key),
        ];
        if let Some(path) = &self.history_file {
            lines.push(format!("history_file = {}", path.display()));
        }
        if let Some(path) = &self.preferences_file {
            lines.push(format!("preferences_file = {}", path.display()));
        }
        lines.extend([
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ]);

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()))
}

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"))
}

/// Return the config file path (`$XDG_CONFIG_HOME/scheme-switch/config.toml`).
pub fn config_path() -> PathBuf {
    config_dir().join(APP_DIR).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_overrides_keys_and_paths() {
        let config = AppConfig::parse_config(
            "# comment\n\
             setting_key = theme\n\
             history_file = /tmp/h.json\n\
             confirm = Enter, Space\n\
             move_down = Ctrl+j\n\
             bogus = x\n",
        );
        assert_eq!(config.setting_key, "theme");
        assert_eq!(config.history_path(), PathBuf::from("/tmp/h.json"));
        assert_eq!(config.preferences_file, None);
        assert_eq!(
            config.bindings[&Action::Confirm],
            vec![
                KeyBind::new(KeyCode::Enter, KeyModifiers::NONE),
                KeyBind::new(KeyCode::Char(' '), KeyModifiers::NONE),
            ]
        );
        assert_eq!(
            config.match_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(Action::MoveDown)
        );
        // Unlisted actions keep their defaults.
        assert_eq!(
            config.match_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::Cancel)
        );
    }

    #[test]
    fn unparseable_bindings_keep_defaults() {
        let config = AppConfig::parse_config("cancel = Hyper+x, ???\n");
        assert_eq!(config.bindings[&Action::Cancel], AppConfig::default_bindings()[&Action::Cancel]);
    }

    #[test]
    fn serialise_round_trips() {
        let mut config = AppConfig::default();
        config.setting_key = "ui_theme".into();
        config.preferences_file = Some(PathBuf::from("/etc/prefs.conf"));
        let back = AppConfig::parse_config(&config.serialise());
        assert_eq!(back.setting_key, "ui_theme");
        assert_eq!(back.preferences_file, config.preferences_file);
        assert_eq!(back.bindings, config.bindings);
    }

    #[test]
    fn modifier_count_breaks_ties() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(Action::MoveDown)
        );
        assert_eq!(config.match_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE)), None);
    }
}
