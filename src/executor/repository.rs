//! Result materialization
//!
//! [`ResultMaterializer`] is the seam between compilation and storage.
//! [`MemoryRepository`] is a reference implementation over an in-memory
//! entry list, loadable from a JSON fixture of the form
//! `{ "collections": [...], "entries": [...] }`.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::collection::{Collection, CollectionLookup};
use crate::observability::{log_event_with_fields, Event};
use crate::planner::EntryQuery;

use super::entry::Entry;
use super::errors::{StorageError, StorageResult};
use super::filters::PredicateFilter;
use super::sorter::ResultSorter;

/// Executes compiled entry queries
pub trait ResultMaterializer {
    /// Returns matching entries, ordered, with offset and limit applied
    fn execute(&self, query: &EntryQuery) -> StorageResult<Vec<Entry>>;

    /// Counts matching entries, ignoring offset and limit
    fn count(&self, query: &EntryQuery) -> StorageResult<usize>;
}

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    collections: Vec<Collection>,
    #[serde(default)]
    entries: Vec<Entry>,
}

/// In-memory collections and entries
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    collections: Vec<Collection>,
    entries: Vec<Entry>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON fixture file
    pub fn load(path: &Path) -> StorageResult<Self> {
        let content = fs::read_to_string(path)?;
        let repository = Self::from_json(&content)?;

        let path_str = path.display().to_string();
        let collections = repository.collections.len().to_string();
        let entries = repository.entries.len().to_string();
        log_event_with_fields(
            Event::FixtureLoaded,
            &[
                ("collections", collections.as_str()),
                ("entries", entries.as_str()),
                ("path", path_str.as_str()),
            ],
        );
        Ok(repository)
    }

    /// Parses a JSON fixture.
    ///
    /// Collection handles and entry ids must be unique, and every entry
    /// must belong to a declared collection.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;
        let mut repository = Self::new();
        for collection in fixture.collections {
            repository.insert_collection(collection)?;
        }
        for entry in fixture.entries {
            repository.insert_entry(entry)?;
        }
        Ok(repository)
    }

    pub fn insert_collection(&mut self, collection: Collection) -> StorageResult<()> {
        if self.find_by_handle(collection.handle()).is_some() {
            return Err(StorageError::new(format!(
                "duplicate collection [{}]",
                collection.handle()
            )));
        }
        self.collections.push(collection);
        Ok(())
    }

    pub fn insert_entry(&mut self, entry: Entry) -> StorageResult<()> {
        if self.find(&entry.id).is_some() {
            return Err(StorageError::new(format!("duplicate entry [{}]", entry.id)));
        }
        if self.find_by_handle(&entry.collection).is_none() {
            return Err(StorageError::new(format!(
                "entry [{}] belongs to unknown collection [{}]",
                entry.id, entry.collection
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Builder form of [`insert_collection`](Self::insert_collection),
    /// without the uniqueness check
    pub fn with_collection(mut self, collection: Collection) -> Self {
        self.collections.push(collection);
        self
    }

    /// Builder form of [`insert_entry`](Self::insert_entry), without checks
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Finds an entry by id
    pub fn find(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn matching<'a>(&'a self, query: &'a EntryQuery) -> impl Iterator<Item = &'a Entry> {
        let collections: BTreeSet<&str> = query.collections.iter().map(String::as_str).collect();
        self.entries.iter().filter(move |e| {
            collections.contains(e.collection.as_str())
                && PredicateFilter::matches(e, &query.predicates)
        })
    }
}

impl CollectionLookup for MemoryRepository {
    fn find_by_handle(&self, handle: &str) -> Option<Collection> {
        self.collections
            .iter()
            .find(|c| c.handle() == handle)
            .cloned()
    }

    fn handles(&self) -> Vec<String> {
        self.collections
            .iter()
            .map(|c| c.handle().to_string())
            .collect()
    }
}

impl ResultMaterializer for MemoryRepository {
    fn execute(&self, query: &EntryQuery) -> StorageResult<Vec<Entry>> {
        let mut entries: Vec<Entry> = self.matching(query).cloned().collect();
        ResultSorter::sort(&mut entries, &query.order_bys);

        let window = entries.into_iter().skip(query.offset);
        Ok(match query.limit {
            Some(limit) => window.take(limit).collect(),
            None => window.collect(),
        })
    }

    fn count(&self, query: &EntryQuery) -> StorageResult<usize> {
        Ok(self.matching(query).count())
    }
}
