//! In-process key-value mapping source.
//!
//! # Responsibilities
//! - Hold runtime-editable `path → destination` pairs
//! - Hand out ordered snapshots consumed like any parsed file
//!
//! # Design Decisions
//! - Mutating the store never touches a live chain; callers recompile
//!   and publish a new chain after a mutation
//! - Snapshots are sorted by path so compiled tables are reproducible

use dashmap::DashMap;

use crate::source::RedirectRecord;

#[derive(Debug, Default)]
pub struct RedirectStore {
    entries: DashMap<String, String>,
}

impl RedirectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `seed`, later records overwriting earlier ones.
    pub fn with_seed(seed: impl IntoIterator<Item = RedirectRecord>) -> Self {
        let store = Self::new();
        for record in seed {
            store.put(record.path, record.destination);
        }
        store
    }

    /// Insert or overwrite. Returns the previous destination, if any.
    pub fn put(&self, path: impl Into<String>, destination: impl Into<String>) -> Option<String> {
        self.entries.insert(path.into(), destination.into())
    }

    /// Remove a path. Returns the destination it pointed to.
    pub fn remove(&self, path: &str) -> Option<String> {
        self.entries.remove(path).map(|(_, destination)| destination)
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.entries.get(path).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every pair, sorted by path.
    pub fn records(&self) -> Vec<RedirectRecord> {
        let mut records: Vec<RedirectRecord> = self
            .entries
            .iter()
            .map(|entry| RedirectRecord::new(entry.key().clone(), entry.value().clone()))
            .collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));
        records
    }
}
