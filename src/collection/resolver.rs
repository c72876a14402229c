//! Collection selector resolution
//!
//! Result = resolve(include) minus resolve(exclude), in include order,
//! deduplicated by handle. Every surviving handle must exist.

use crate::params::{ParameterSet, Selector};
use crate::planner::{QueryError, QueryResult};

use super::types::Collection;

/// Read-only collection lookup provided by the content repository
pub trait CollectionLookup {
    /// Finds a collection by handle
    fn find_by_handle(&self, handle: &str) -> Option<Collection>;

    /// All known handles, in repository order
    fn handles(&self) -> Vec<String>;
}

/// Resolves include/exclude selectors into concrete collections
pub struct CollectionResolver<'a, L: CollectionLookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: CollectionLookup + ?Sized> CollectionResolver<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Resolves the selectors carried by `params`.
    ///
    /// Fails with `CollectionNotFound` on the first unknown handle.
    pub fn resolve(&self, params: &ParameterSet) -> QueryResult<Vec<Collection>> {
        let included = params
            .include()
            .map(|s| self.expand(s))
            .unwrap_or_default();
        let excluded = params
            .exclude()
            .map(|s| self.expand(s))
            .unwrap_or_default();

        let mut handles: Vec<String> = Vec::with_capacity(included.len());
        for handle in included {
            if excluded.contains(&handle) || handles.contains(&handle) {
                continue;
            }
            handles.push(handle);
        }

        handles
            .iter()
            .map(|handle| {
                self.lookup
                    .find_by_handle(handle)
                    .ok_or_else(|| QueryError::CollectionNotFound(handle.clone()))
            })
            .collect()
    }

    fn expand(&self, selector: &Selector) -> Vec<String> {
        match selector {
            Selector::Wildcard => self.lookup.handles(),
            Selector::Handles(handles) => handles.clone(),
        }
    }
}
