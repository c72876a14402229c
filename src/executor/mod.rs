//! Query execution
//!
//! Compiled queries are handed to a [`ResultMaterializer`]. The in-memory
//! [`MemoryRepository`] executes them as follows:
//!
//! 1. Restrict to the query's collections
//! 2. Filter by every predicate (AND)
//! 3. Sort by every order-by, stably
//! 4. Apply offset, then limit
//!
//! Execution is deterministic: same query and same entries give the same
//! results in the same order.

mod entry;
mod errors;
mod filters;
mod repository;
mod result;
mod sorter;

pub use entry::Entry;
pub use errors::{StorageError, StorageResult};
pub use filters::PredicateFilter;
pub use repository::{MemoryRepository, ResultMaterializer};
pub use result::EntryCollection;
pub use sorter::ResultSorter;
