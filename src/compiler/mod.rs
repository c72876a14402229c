//! Query compilation
//!
//! Turns a [`ParameterSet`](crate::params::ParameterSet) into an
//! [`EntryQuery`](crate::planner::EntryQuery) in the fixed order:
//!
//! 1. Resolve collections (unknown handles fail here)
//! 2. Resolve ordering
//! 3. Run the filter pipeline, order-bys last
//! 4. Attach the result window when materializing

mod compiler;
mod context;

pub use compiler::{QueryCompiler, Resolved};
pub use context::QueryContext;
