//! Filter pipeline
//!
//! Independent, ordered stages that each refine an [`EntryQuery`](crate::planner::EntryQuery)
//! from the tag parameters. Any stage may conclude that nothing can match,
//! which stops the pipeline without touching storage.

mod conditions;
mod dates;
mod ordering;
mod published;
mod scopes;
mod site;
mod stage;
mod taxonomy;

pub use conditions::ConditionStage;
pub use dates::{DateWindowStage, SinceUntilStage};
pub use ordering::OrderByStage;
pub use published::PublishStateStage;
pub use scopes::{Scope, ScopeRegistry, ScopeStage};
pub use site::SiteStage;
pub use stage::{Compiled, FilterPipeline, QueryStage, StageInput};
pub use taxonomy::{TaxonomyFilter, TaxonomyModifier, TaxonomyStage};
