//! Materialized result sets

use serde::Serialize;

use super::entry::Entry;

/// Ordered entries produced by a query; empty is valid
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntryCollection {
    entries: Vec<Entry>,
}

impl EntryCollection {
    /// Creates an empty collection
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Returns true if nothing matched
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn first(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Entry ids in result order
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Entry> {
        self.entries
    }
}

impl From<Vec<Entry>> for EntryCollection {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}

impl IntoIterator for EntryCollection {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
