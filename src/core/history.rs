//! In-memory most-recently-used list.
//!
//! Position 0 is the most recently used entry.  Values are unique: every way
//! of building or mutating an [`MruHistory`] keeps at most one copy of each
//! identifier.

/// Ordered, duplicate-free list of identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MruHistory {
    entries: Vec<String>,
}

impl MruHistory {
    /// Build a history from stored entries, keeping the first occurrence of
    /// any duplicated value.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut out: Vec<String> = Vec::new();
        for entry in entries {
            if !out.contains(&entry) {
                out.push(entry);
            }
        }
        Self { entries: out }
    }

    /// Move `item` to the front, inserting it if absent.
    ///
    /// Returns `false` when `item` was already first and nothing changed.
    pub fn promote(&mut self, item: &str) -> bool {
        if self.first() == Some(item) {
            return false;
        }
        if let Some(pos) = self.position(item) {
            self.entries.remove(pos);
        }
        self.entries.insert(0, item.to_string());
        true
    }

    /// Remove and return the entry at `index`, or `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn contains(&self, item: &str) -> bool {
        self.position(item).is_some()
    }

    pub fn position(&self, item: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == item)
    }

    pub fn first(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
