//! The scheme tracker: MRU history plus its backing store.
//!
//! Every mutating call writes the full list before returning.  When a write
//! fails the in-memory change is kept and the tracker is marked dirty, so the
//! next mutating call rewrites the file even if it is otherwise a no-op.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use super::history::MruHistory;
use super::store::{HistoryStore, StoreError};

/// Tracker handle shared between the settings callback and UI commands.
pub type SharedTracker = Rc<RefCell<SchemeTracker>>;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("index {index} out of range for history of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to persist history: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct SchemeTracker {
    history: MruHistory,
    store: HistoryStore,
    /// Set when the last write failed and the file is behind memory.
    dirty: bool,
}

impl SchemeTracker {
    /// Load the tracker from `store`.  Unreadable state starts empty.
    pub fn load(store: HistoryStore) -> Self {
        let stored = store.load();
        let history = MruHistory::from_entries(stored.iter().cloned());
        if history.len() != stored.len() {
            tracing::debug!(
                "dropped {} duplicate history entries",
                stored.len() - history.len()
            );
        }
        Self {
            history,
            store,
            dirty: false,
        }
    }

    pub fn into_shared(self) -> SharedTracker {
        Rc::new(RefCell::new(self))
    }

    /// Entries in most-recently-used order.
    pub fn current_order(&self) -> &[String] {
        self.history.as_slice()
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// Move `item` to the front of the history, inserting it if new.
    pub fn promote(&mut self, item: &str) -> Result<(), TrackerError> {
        if !self.history.promote(item) && !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    /// Delete the entry at `index` and return it.
    pub fn remove(&mut self, index: usize) -> Result<String, TrackerError> {
        let len = self.history.len();
        let removed = self
            .history
            .remove(index)
            .ok_or(TrackerError::IndexOutOfRange { index, len })?;
        self.persist()?;
        Ok(removed)
    }

    /// React to the host reporting `current` as the active scheme.
    ///
    /// Only identifiers never seen before are promoted; a known one is most
    /// likely a preview while browsing and must not reorder the history.
    /// An empty value means the setting was cleared and is ignored.
    /// Returns whether a promotion happened.
    pub fn on_external_change(&mut self, current: &str) -> Result<bool, TrackerError> {
        if current.is_empty() || self.history.contains(current) {
            return Ok(false);
        }
        self.promote(current)?;
        Ok(true)
    }

    /// Last path component of every entry, in history order.
    pub fn list_display_items(&self) -> Vec<String> {
        self.history.as_slice().iter().map(|s| display_label(s)).collect()
    }

    fn persist(&mut self) -> Result<(), TrackerError> {
        match self.store.save(self.history.as_slice()) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{e}");
                self.dirty = true;
                Err(e.into())
            }
        }
    }
}

/// Human-readable label for a scheme path (its file name).
pub fn display_label(id: &str) -> String {
    Path::new(id)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn tracker_with(dir: &TempDir, items: &[&str]) -> SchemeTracker {
        let store = HistoryStore::new(dir.path().join("history.json"));
        let entries: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        store.save(&entries).unwrap();
        SchemeTracker::load(store)
    }

    fn reload(dir: &TempDir) -> Vec<String> {
        SchemeTracker::load(HistoryStore::new(dir.path().join("history.json")))
            .current_order()
            .to_vec()
    }

    #[test]
    fn promote_existing_moves_to_front_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker_with(&dir, &["a", "b", "c"]);
        t.promote("c").unwrap();
        assert_eq!(t.current_order(), ["c", "a", "b"]);
        assert_eq!(reload(&dir), ["c", "a", "b"]);
    }

    #[test]
    fn promote_new_prepends_and_keeps_relative_order() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker_with(&dir, &["a", "b"]);
        t.promote("n").unwrap();
        assert_eq!(t.current_order(), ["n", "a", "b"]);
        assert_eq!(reload(&dir), ["n", "a", "b"]);
    }

    #[test]
    fn promote_first_does_not_write() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker_with(&dir, &["a", "b"]);
        // Clobber the file; a redundant write would restore it.
        std::fs::write(t.store_path(), "sentinel").unwrap();
        t.promote("a").unwrap();
        assert_eq!(t.current_order(), ["a", "b"]);
        assert_eq!(std::fs::read_to_string(t.store_path()).unwrap(), "sentinel");
    }

    #[test]
    fn remove_excludes_element_and_shrinks_by_one() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker_with(&dir, &["a", "b", "c"]);
        assert_eq!(t.remove(1).unwrap(), "b");
        assert_eq!(t.current_order(), ["a", "c"]);
        assert_eq!(reload(&dir), ["a", "c"]);
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker_with(&dir, &["a"]);
        let err = t.remove(1).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::IndexOutOfRange { index: 1, len: 1 }
        ));
        assert_eq!(t.current_order(), ["a"]);
    }

    #[test]
    fn fresh_tracker_reads_persisted_order() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker_with(&dir, &[]);
        t.promote("c").unwrap();
        t.promote("b").unwrap();
        t.promote("a").unwrap();
        assert_eq!(reload(&dir), ["a", "b", "c"]);
    }

    #[test]
    fn external_change_only_promotes_new_identifiers() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker_with(&dir, &["x", "y"]);

        assert!(!t.on_external_change("y").unwrap());
        assert_eq!(t.current_order(), ["x", "y"]);

        assert!(t.on_external_change("z").unwrap());
        assert_eq!(t.current_order(), ["z", "x", "y"]);
        assert_eq!(reload(&dir), ["z", "x", "y"]);
    }

    #[test]
    fn external_change_ignores_empty_value() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker_with(&dir, &["x"]);
        assert!(!t.on_external_change("").unwrap());
        assert_eq!(t.current_order(), ["x"]);
    }

    #[test]
    fn absent_or_empty_store_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        assert!(SchemeTracker::load(HistoryStore::new(&path))
            .current_order()
            .is_empty());

        std::fs::write(&path, "").unwrap();
        assert!(SchemeTracker::load(HistoryStore::new(&path))
            .current_order()
            .is_empty());
    }

    #[test]
    fn duplicate_entries_in_store_are_collapsed() {
        let dir = TempDir::new().unwrap();
        let t = tracker_with(&dir, &["a", "b", "a"]);
        assert_eq!(t.current_order(), ["a", "b"]);
    }

    #[test]
    fn failed_write_keeps_memory_and_retries() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be makes every
        // write fail.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();
        let store = HistoryStore::new(blocker.join("history.json"));
        let mut t = SchemeTracker::load(store.clone());

        assert!(matches!(t.promote("a"), Err(TrackerError::Store(_))));
        assert_eq!(t.current_order(), ["a"]);

        std::fs::remove_file(&blocker).unwrap();
        // Already first, but the pending write is flushed.
        t.promote("a").unwrap();
        assert_eq!(store.load(), ["a"]);
    }

    #[test]
    fn failed_write_on_remove_keeps_memory_and_retries() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocked");
        let store = HistoryStore::new(blocker.join("history.json"));
        store.save(&["a".to_string(), "b".to_string()]).unwrap();
        let mut t = SchemeTracker::load(store.clone());

        // Swap the directory for a regular file so the next write fails.
        std::fs::remove_dir_all(&blocker).unwrap();
        std::fs::write(&blocker, "").unwrap();

        assert!(matches!(t.remove(0), Err(TrackerError::Store(_))));
        assert_eq!(t.current_order(), ["b"]);

        std::fs::remove_file(&blocker).unwrap();
        t.promote("b").unwrap();
        assert_eq!(store.load(), ["b"]);
    }

    #[test]
    fn display_items_use_file_names() {
        let dir = TempDir::new().unwrap();
        let t = tracker_with(
            &dir,
            &[
                "Packages/Color Scheme - Default/Monokai.sublime-color-scheme",
                "Solarized.tmTheme",
            ],
        );
        assert_eq!(
            t.list_display_items(),
            ["Monokai.sublime-color-scheme", "Solarized.tmTheme"]
        );
    }
}
