//! Stage capability and the ordered pipeline that runs stages
//!
//! A stage receives the in-progress query and returns it (possibly with
//! more predicates) or reports that no row can match. The order-by stage is
//! held apart and always runs last so that row-level predicates are fixed
//! before ordering is attached.

use crate::collection::Collection;
use crate::compiler::QueryContext;
use crate::observability::{log_event_with_fields, Event};
use crate::params::ParameterSet;
use crate::planner::{EntryQuery, OrderSpec, QueryResult};

use super::conditions::ConditionStage;
use super::dates::{DateWindowStage, SinceUntilStage};
use super::ordering::OrderByStage;
use super::published::PublishStateStage;
use super::scopes::{ScopeRegistry, ScopeStage};
use super::site::SiteStage;
use super::taxonomy::TaxonomyStage;

/// Outcome of compiling (part of) a query
#[derive(Debug, Clone, PartialEq)]
pub enum Compiled {
    /// The query so far
    Query(EntryQuery),
    /// The parameters are unsatisfiable; execution must be skipped
    NoResultsExpected,
}

impl Compiled {
    /// Returns the query, or `None` when no results are expected
    pub fn into_query(self) -> Option<EntryQuery> {
        match self {
            Compiled::Query(query) => Some(query),
            Compiled::NoResultsExpected => None,
        }
    }

    pub fn as_query(&self) -> Option<&EntryQuery> {
        match self {
            Compiled::Query(query) => Some(query),
            Compiled::NoResultsExpected => None,
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, Compiled::NoResultsExpected)
    }
}

/// Everything a stage may read
#[derive(Debug, Clone, Copy)]
pub struct StageInput<'a> {
    pub params: &'a ParameterSet,
    pub collections: &'a [Collection],
    pub order: &'a OrderSpec,
    pub context: &'a QueryContext,
}

impl<'a> StageInput<'a> {
    /// True if every targeted collection is dated
    pub fn all_collections_dated(&self) -> bool {
        self.collections.iter().all(Collection::is_dated)
    }
}

/// One independent step of query compilation
pub trait QueryStage {
    /// Short name used in logs and explain output
    fn name(&self) -> &'static str;

    /// Applies the stage to the in-progress query
    fn apply(&self, query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled>;
}

/// Ordered list of stages
pub struct FilterPipeline {
    stages: Vec<Box<dyn QueryStage>>,
    ordering: OrderByStage,
}

impl FilterPipeline {
    /// Pipeline running the given row-level stages, then order-bys
    pub fn new(stages: Vec<Box<dyn QueryStage>>) -> Self {
        Self {
            stages,
            ordering: OrderByStage,
        }
    }

    /// site → published → past/future → since/until → taxonomy →
    /// conditions → scopes → order-bys
    pub fn standard(scopes: ScopeRegistry) -> Self {
        Self::new(vec![
            Box::new(SiteStage),
            Box::new(PublishStateStage),
            Box::new(DateWindowStage),
            Box::new(SinceUntilStage),
            Box::new(TaxonomyStage),
            Box::new(ConditionStage),
            Box::new(ScopeStage::new(scopes)),
        ])
    }

    /// Stage names in execution order, order-bys included
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages
            .iter()
            .map(|s| s.name())
            .chain(std::iter::once(self.ordering.name()))
            .collect()
    }

    /// Runs every stage in order, stopping at the first that reports
    /// no results
    pub fn run(&self, mut query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled> {
        for stage in &self.stages {
            match stage.apply(query, input)? {
                Compiled::Query(next) => query = next,
                Compiled::NoResultsExpected => {
                    log_event_with_fields(Event::QueryShortCircuited, &[("stage", stage.name())]);
                    return Ok(Compiled::NoResultsExpected);
                }
            }
        }
        self.ordering.apply(query, input)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::standard(ScopeRegistry::new())
    }
}
