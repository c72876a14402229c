//! entryquery - a deterministic compiler from content-tag parameters to
//! entry queries
//!
//! Raw tag parameters flow through:
//!
//! ParameterSet → {CollectionResolver, OrderSpec} → FilterPipeline →
//! QueryCompiler → (ResultMaterializer | NavigationResolver)
//!
//! [`EntryQueryTag`] bundles the whole flow behind one value per tag
//! invocation.

pub mod cli;
pub mod collection;
pub mod compiler;
pub mod config;
pub mod executor;
pub mod navigation;
pub mod observability;
pub mod params;
pub mod pipeline;
pub mod planner;
pub mod tag;

pub use collection::{Collection, CollectionLookup, CollectionResolver, DateBehavior};
pub use compiler::{QueryCompiler, QueryContext};
pub use executor::{Entry, EntryCollection, MemoryRepository, ResultMaterializer, StorageError};
pub use navigation::{Direction, NavigationResolver};
pub use params::ParameterSet;
pub use pipeline::{Compiled, FilterPipeline, QueryStage, Scope, ScopeRegistry};
pub use planner::{EntryQuery, FilterOp, OrderBy, OrderSpec, Predicate, QueryError, QueryResult};
pub use tag::EntryQueryTag;
