//! Entry query model
//!
//! The compiler builds an [`EntryQuery`] out of predicates and order-bys;
//! the repository executes it.
//!
//! # Design Principles
//!
//! - Deterministic: same parameters and context produce the same query
//! - Plain data: a compiled query carries no clocks, closures, or handles
//! - Eager: every malformed parameter is rejected during compilation

mod ast;
pub mod dates;
mod errors;
mod explain;
mod order;

pub use ast::{EntryQuery, FilterOp, OrderBy, Predicate, SortDirection};
pub use errors::{QueryError, QueryResult};
pub use explain::ExplainPlan;
pub use order::OrderSpec;
