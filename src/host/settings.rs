//! Host setting store — where the active color scheme lives.
//!
//! [`Settings`] is the small capability the rest of the app depends on.
//! [`FileSettings`] keeps values in a `key = value` preferences file;
//! [`MemorySettings`] keeps them in memory for tests.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Callback invoked with the new value of a watched key.
pub type ChangeCallback = Box<dyn FnMut(&str)>;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read preferences {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write preferences {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid setting {key:?}: {reason}")]
    InvalidValue { key: String, reason: &'static str },
}

/// Key/value settings with change notification.
pub trait Settings {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, notifying watchers of `key` if it changed.
    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;

    /// Register `callback` to run whenever `key` changes value.
    fn on_change(&mut self, key: &str, callback: ChangeCallback);
}

// ───────────────────────────────────────── listeners ─────────

/// Per-key callback registry.
#[derive(Default)]
struct Listeners {
    by_key: HashMap<String, Vec<ChangeCallback>>,
}

impl Listeners {
    fn add(&mut self, key: &str, callback: ChangeCallback) {
        self.by_key.entry(key.to_string()).or_default().push(callback);
    }

    fn notify(&mut self, key: &str, value: &str) {
        if let Some(callbacks) = self.by_key.get_mut(key) {
            for callback in callbacks.iter_mut() {
                callback(value);
            }
        }
    }
}

// ───────────────────────────────────────── in memory ─────────

/// Settings held only in memory.
#[derive(Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
    listeners: Listeners,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a value without notifying anyone.
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl Settings for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        validate(key, value)?;
        let previous = self.values.insert(key.to_string(), value.to_string());
        if previous.as_deref() != Some(value) {
            self.listeners.notify(key, value);
        }
        Ok(())
    }

    fn on_change(&mut self, key: &str, callback: ChangeCallback) {
        self.listeners.add(key, callback);
    }
}

// ───────────────────────────────────────── file backed ───────

/// Settings persisted to a `key = value` preferences file.
///
/// Every [`Settings::set`] rewrites the whole file.  [`FileSettings::reload`]
/// picks up edits made by other programs and notifies watchers.
pub struct FileSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
    listeners: Listeners,
}

impl FileSettings {
    /// Open the preferences file at `path`.  A missing file is empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = read_values(&path)?;
        Ok(Self {
            path,
            values,
            listeners: Listeners::default(),
        })
    }

    /// Re-read the file and notify watchers of every key whose value changed.
    /// Returns the keys that changed.
    pub fn reload(&mut self) -> Result<Vec<String>, SettingsError> {
        let fresh = read_values(&self.path)?;
        let changed: Vec<(String, String)> = fresh
            .iter()
            .filter(|(k, v)| self.values.get(*k) != Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.values = fresh;
        for (key, value) in &changed {
            tracing::debug!("{key} changed externally to {value:?}");
            self.listeners.notify(key, value);
        }
        Ok(changed.into_iter().map(|(k, _)| k).collect())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let write_err = |source: std::io::Error| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, serialise(&self.values)).map_err(write_err)
    }
}

impl Settings for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        validate(key, value)?;
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value.to_string());
        self.save()?;
        self.listeners.notify(key, value);
        Ok(())
    }

    fn on_change(&mut self, key: &str, callback: ChangeCallback) {
        self.listeners.add(key, callback);
    }
}

// ───────────────────────────────────────── file format ───────

/// Reject anything that would not read back unchanged from the file.
fn validate(key: &str, value: &str) -> Result<(), SettingsError> {
    let multiline = |s: &str| s.contains('\n') || s.contains('\r');
    let reason = if key.trim().is_empty() {
        Some("key must not be empty")
    } else if key.contains('=') || key.starts_with('#') || key.trim() != key {
        Some("key must not contain '=', start with '#' or have surrounding whitespace")
    } else if multiline(key) || multiline(value) {
        Some("values must be a single line")
    } else if value.trim() != value {
        Some("value must not have surrounding whitespace")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(parse(&contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(source) => Err(SettingsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse(s: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        values.insert(key.trim().to_string(), value.trim().to_string());
    }
    values
}

fn serialise(values: &BTreeMap<String, String>) -> String {
    let mut lines = vec!["# scheme-switch preferences".to_string(), String::new()];
    for (key, value) in values {
        lines.push(format!("{key} = {value}"));
    }
    lines.push(String::new());
    lines.join("\n")
}
