//! Query scopes
//!
//! A scope is a named, reusable query refinement registered by the host
//! application and selected with `query_scope="featured|recent"` (alias
//! `filter`).

use std::collections::BTreeMap;

use crate::observability::{log_event_with_fields, Event};
use crate::params::value::split_list;
use crate::params::ParameterSet;
use crate::planner::{EntryQuery, QueryResult};

use super::stage::{Compiled, QueryStage, StageInput};

const SCOPE_KEYS: &[&str] = &["query_scope", "filter"];

/// A named query refinement
pub trait Scope {
    /// Refines the query using the tag parameters
    fn apply(&self, query: EntryQuery, params: &ParameterSet) -> QueryResult<EntryQuery>;
}

impl<F> Scope for F
where
    F: Fn(EntryQuery, &ParameterSet) -> QueryResult<EntryQuery>,
{
    fn apply(&self, query: EntryQuery, params: &ParameterSet) -> QueryResult<EntryQuery> {
        self(query, params)
    }
}

/// Scopes by handle
#[derive(Default)]
pub struct ScopeRegistry {
    scopes: BTreeMap<String, Box<dyn Scope>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scope, replacing any previous one with the same handle
    pub fn register(&mut self, handle: impl Into<String>, scope: impl Scope + 'static) {
        self.scopes.insert(handle.into(), Box::new(scope));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, handle: impl Into<String>, scope: impl Scope + 'static) -> Self {
        self.register(handle, scope);
        self
    }

    pub fn get(&self, handle: &str) -> Option<&dyn Scope> {
        self.scopes.get(handle).map(|s| s.as_ref())
    }

    pub fn handles(&self) -> Vec<&str> {
        self.scopes.keys().map(String::as_str).collect()
    }
}

/// Applies the selected scopes in the order listed
pub struct ScopeStage {
    registry: ScopeRegistry,
}

impl ScopeStage {
    pub fn new(registry: ScopeRegistry) -> Self {
        Self { registry }
    }
}

impl QueryStage for ScopeStage {
    fn name(&self) -> &'static str {
        "scopes"
    }

    fn apply(&self, mut query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled> {
        let Some(selected) = SCOPE_KEYS.iter().find_map(|k| input.params.get(k)) else {
            return Ok(Compiled::Query(query));
        };

        for handle in split_list(selected) {
            match self.registry.get(&handle) {
                Some(scope) => query = scope.apply(query, input.params)?,
                None => {
                    log_event_with_fields(Event::ScopeSkipped, &[("scope", handle.as_str())]);
                }
            }
        }
        Ok(Compiled::Query(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::compiler::QueryContext;
    use crate::planner::{OrderSpec, Predicate};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    fn featured(query: EntryQuery, _: &ParameterSet) -> QueryResult<EntryQuery> {
        Ok(query.with_predicate(Predicate::eq("featured", json!(true))))
    }

    fn min_rating(query: EntryQuery, params: &ParameterSet) -> QueryResult<EntryQuery> {
        let rating = params.get("min_rating").cloned().unwrap_or(json!(0));
        Ok(query.with_predicate(Predicate::field(
            "rating",
            crate::planner::FilterOp::Gte(rating),
        )))
    }

    fn run(registry: ScopeRegistry, pairs: &[(&str, Value)]) -> Vec<Predicate> {
        let params: ParameterSet = pairs.iter().map(|(k, v)| (*k, v.clone())).collect();
        let collections = [Collection::new("products")];
        let order = OrderSpec::default_for(&collections);
        let context = QueryContext::new("default", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let input = StageInput {
            params: &params,
            collections: &collections,
            order: &order,
            context: &context,
        };
        ScopeStage::new(registry)
            .apply(EntryQuery::default(), &input)
            .unwrap()
            .into_query()
            .unwrap()
            .predicates
    }

    #[test]
    fn test_scopes_applied_in_listed_order() {
        let registry = ScopeRegistry::new()
            .with("featured", featured)
            .with("min_rating", min_rating);

        let predicates = run(
            registry,
            &[("query_scope", json!("min_rating|featured")), ("min_rating", json!(4))],
        );
        assert_eq!(
            predicates,
            vec![
                Predicate::field("rating", crate::planner::FilterOp::Gte(json!(4))),
                Predicate::eq("featured", json!(true)),
            ]
        );
    }

    #[test]
    fn test_filter_alias() {
        let registry = ScopeRegistry::new().with("featured", featured);
        let predicates = run(registry, &[("filter", json!("featured"))]);
        assert_eq!(predicates, vec![Predicate::eq("featured", json!(true))]);
    }

    #[test]
    fn test_unknown_scope_skipped() {
        let registry = ScopeRegistry::new().with("featured", featured);
        let predicates = run(registry, &[("query_scope", json!("missing|featured"))]);
        assert_eq!(predicates, vec![Predicate::eq("featured", json!(true))]);
    }

    #[test]
    fn test_registry_handles_sorted() {
        let registry = ScopeRegistry::new()
            .with("recent", featured)
            .with("featured", featured);
        assert_eq!(registry.handles(), vec!["featured", "recent"]);
    }
}
