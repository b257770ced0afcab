//! On-disk persistence for the history list.
//!
//! The list is stored as a JSON array of strings.  Writes go to a `.tmp`
//! sibling first and are renamed over the target, so a reader never sees a
//! half-written file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Errors from reading or writing the history file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed history file {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON file holding the ordered history.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored list, treating every failure as an empty history.
    pub fn load(&self) -> Vec<String> {
        match self.read() {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                tracing::debug!("no history at {}, starting empty", self.path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("{e}; starting with empty history");
                Vec::new()
            }
        }
    }

    /// Read the stored list.  A missing or empty file yields `Ok(None)`.
    pub fn read(&self) -> Result<Option<Vec<String>>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Format {
                path: self.path.clone(),
                source,
            })
    }

    /// Overwrite the stored list with `entries`.
    pub fn save(&self, entries: &[String]) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, data).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
