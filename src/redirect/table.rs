//! Immutable path → destination tables.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::source::RedirectRecord;

/// A finished mapping from path to destination.
///
/// Only [`TableBuilder::build`] produces one, and nothing hands out a
/// mutable view afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectTable {
    entries: HashMap<String, String>,
}

impl RedirectTable {
    /// An empty table (every lookup misses).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a single ordered record sequence.
    pub fn from_records(records: impl IntoIterator<Item = RedirectRecord>) -> Self {
        TableBuilder::new().extend(records).build()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Folds ordered record sequences into a [`RedirectTable`].
///
/// Sources are applied in the order they are added; within a source,
/// records apply in iteration order. A later record for the same path
/// replaces the earlier one.
#[derive(Debug, Default)]
pub struct TableBuilder {
    entries: HashMap<String, String>,
    overwritten: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: RedirectRecord) {
        match self.entries.entry(record.path) {
            Entry::Occupied(mut slot) => {
                let previous = slot.insert(record.destination);
                tracing::trace!(path = %slot.key(), previous = %previous, "Redirect entry overwritten");
                self.overwritten += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(record.destination);
            }
        }
    }

    /// Apply one source's records, in order.
    pub fn extend(mut self, records: impl IntoIterator<Item = RedirectRecord>) -> Self {
        for record in records {
            self.insert(record);
        }
        self
    }

    /// Number of records so far that replaced an existing path.
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }

    pub fn build(self) -> RedirectTable {
        RedirectTable {
            entries: self.entries,
        }
    }
}
