//! Query compiler
//!
//! Orchestrates collection resolution, ordering and the filter pipeline into
//! one [`EntryQuery`], then materializes it. Collections are resolved before
//! any stage runs, so an unknown handle fails without partial work.
//!
//! A [`Compiled::NoResultsExpected`] outcome never reaches storage: `get`
//! returns an empty collection and `count` returns zero.

use crate::collection::{Collection, CollectionLookup, CollectionResolver};
use crate::executor::{EntryCollection, ResultMaterializer};
use crate::observability::{log_event_with_fields, Event};
use crate::params::ParameterSet;
use crate::pipeline::{Compiled, FilterPipeline, StageInput};
use crate::planner::{EntryQuery, ExplainPlan, OrderSpec, QueryResult};

use super::context::QueryContext;

/// Collections and ordering resolved for one compilation
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub collections: Vec<Collection>,
    pub order: OrderSpec,
}

/// Compiles tag parameters into entry queries and executes them
pub struct QueryCompiler<'a, R: CollectionLookup + ResultMaterializer + ?Sized> {
    params: ParameterSet,
    repository: &'a R,
    pipeline: FilterPipeline,
    context: QueryContext,
}

impl<'a, R: CollectionLookup + ResultMaterializer + ?Sized> QueryCompiler<'a, R> {
    /// Compiler running the standard pipeline with no scopes registered
    pub fn new(params: ParameterSet, repository: &'a R, context: QueryContext) -> Self {
        Self {
            params,
            repository,
            pipeline: FilterPipeline::default(),
            context,
        }
    }

    /// Replaces the filter pipeline
    pub fn with_pipeline(mut self, pipeline: FilterPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    /// Resolves target collections and the active ordering
    pub fn resolve(&self) -> QueryResult<Resolved> {
        let collections = CollectionResolver::new(self.repository).resolve(&self.params)?;
        let order = OrderSpec::resolve(self.params.order_expression(), &collections)?;
        Ok(Resolved { collections, order })
    }

    /// Runs the pipeline over already-resolved collections
    pub fn compile(&self, resolved: &Resolved) -> QueryResult<Compiled> {
        if resolved.collections.is_empty() {
            log_event_with_fields(Event::QueryShortCircuited, &[("stage", "collections")]);
            return Ok(Compiled::NoResultsExpected);
        }

        let base = EntryQuery::for_collections(resolved.collections.iter().map(Collection::handle));
        let input = StageInput {
            params: &self.params,
            collections: &resolved.collections,
            order: &resolved.order,
            context: &self.context,
        };
        self.pipeline.run(base, &input)
    }

    /// Compiles the parameters into a query, without the result window
    pub fn query(&self) -> QueryResult<Compiled> {
        let compiled = self.resolve().and_then(|resolved| self.compile(&resolved));

        match &compiled {
            Ok(Compiled::Query(query)) => {
                let collections = query.collections.join("|");
                let predicates = query.predicates.len().to_string();
                log_event_with_fields(
                    Event::QueryCompiled,
                    &[
                        ("collections", collections.as_str()),
                        ("predicates", predicates.as_str()),
                    ],
                );
            }
            Ok(Compiled::NoResultsExpected) => {}
            Err(err) => {
                let message = err.to_string();
                log_event_with_fields(
                    Event::QueryRejected,
                    &[("code", err.code()), ("reason", message.as_str())],
                );
            }
        }
        compiled
    }

    /// Attaches limit and offset.
    ///
    /// `paginate=N` with `page=P` selects `N` rows after skipping
    /// `(P-1)*N`, plus any explicit `offset`.
    pub fn window(&self, mut query: EntryQuery) -> EntryQuery {
        let offset = self.params.offset().unwrap_or(0);
        match self.params.paginate() {
            Some(per_page) => {
                let skipped = per_page.saturating_mul(self.params.page().saturating_sub(1));
                query.limit = Some(per_page);
                query.offset = offset.saturating_add(skipped);
            }
            None => {
                query.limit = self.params.limit();
                query.offset = offset;
            }
        }
        query
    }

    /// Materializes the matching entries
    pub fn get(&self) -> QueryResult<EntryCollection> {
        match self.query()? {
            Compiled::Query(query) => self.execute(&self.window(query)),
            Compiled::NoResultsExpected => Ok(EntryCollection::empty()),
        }
    }

    /// Counts the matching entries; the result window is ignored
    pub fn count(&self) -> QueryResult<usize> {
        match self.query()? {
            Compiled::Query(query) => self.count_query(&query),
            Compiled::NoResultsExpected => Ok(0),
        }
    }

    /// Describes what `get` would execute
    pub fn explain(&self) -> ExplainPlan {
        match self.query() {
            Ok(Compiled::Query(query)) => ExplainPlan::from_query(&self.window(query)),
            Ok(Compiled::NoResultsExpected) => {
                let collections = self
                    .resolve()
                    .map(|r| r.collections.iter().map(|c| c.handle().to_string()).collect())
                    .unwrap_or_default();
                ExplainPlan::no_results(collections)
            }
            Err(err) => ExplainPlan::from_error(&err),
        }
    }

    pub(crate) fn execute(&self, query: &EntryQuery) -> QueryResult<EntryCollection> {
        let entries = self.repository.execute(query)?;
        let returned = entries.len().to_string();
        log_event_with_fields(Event::QueryExecuted, &[("returned", returned.as_str())]);
        Ok(EntryCollection::new(entries))
    }

    pub(crate) fn count_query(&self, query: &EntryQuery) -> QueryResult<usize> {
        let count = self.repository.count(query)?;
        let counted = count.to_string();
        log_event_with_fields(Event::CountExecuted, &[("count", counted.as_str())]);
        Ok(count)
    }
}
