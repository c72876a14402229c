//! The entries tag
//!
//! One value per tag invocation: the parameters, the repository they run
//! against, and the compilation context. Listing, counting and navigation
//! all go through the same compiled query.

use crate::collection::CollectionLookup;
use crate::compiler::{QueryCompiler, QueryContext};
use crate::executor::{Entry, EntryCollection, ResultMaterializer};
use crate::navigation::{Direction, NavigationResolver};
use crate::params::ParameterSet;
use crate::pipeline::{Compiled, FilterPipeline, ScopeRegistry};
use crate::planner::{ExplainPlan, QueryResult};

pub struct EntryQueryTag<'a, R: CollectionLookup + ResultMaterializer + ?Sized> {
    compiler: QueryCompiler<'a, R>,
}

impl<'a, R: CollectionLookup + ResultMaterializer + ?Sized> EntryQueryTag<'a, R> {
    pub fn new(params: ParameterSet, repository: &'a R, context: QueryContext) -> Self {
        Self {
            compiler: QueryCompiler::new(params, repository, context),
        }
    }

    /// Makes the given scopes selectable through `query_scope`
    pub fn with_scopes(mut self, scopes: ScopeRegistry) -> Self {
        self.compiler = self.compiler.with_pipeline(FilterPipeline::standard(scopes));
        self
    }

    pub fn compiler(&self) -> &QueryCompiler<'a, R> {
        &self.compiler
    }

    pub fn query(&self) -> QueryResult<Compiled> {
        self.compiler.query()
    }

    pub fn get(&self) -> QueryResult<EntryCollection> {
        self.compiler.get()
    }

    pub fn count(&self) -> QueryResult<usize> {
        self.compiler.count()
    }

    pub fn explain(&self) -> ExplainPlan {
        self.compiler.explain()
    }

    pub fn next(&self, anchor: &Entry) -> QueryResult<EntryCollection> {
        self.navigate(Direction::Next, anchor)
    }

    pub fn previous(&self, anchor: &Entry) -> QueryResult<EntryCollection> {
        self.navigate(Direction::Previous, anchor)
    }

    pub fn older(&self, anchor: &Entry) -> QueryResult<EntryCollection> {
        self.navigate(Direction::Older, anchor)
    }

    pub fn newer(&self, anchor: &Entry) -> QueryResult<EntryCollection> {
        self.navigate(Direction::Newer, anchor)
    }

    pub fn navigate(&self, direction: Direction, anchor: &Entry) -> QueryResult<EntryCollection> {
        NavigationResolver::new(&self.compiler).navigate(direction, anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::executor::MemoryRepository;
    use crate::planner::{EntryQuery, Predicate};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn repository() -> MemoryRepository {
        MemoryRepository::new()
            .with_collection(Collection::new("pages").orderable())
            .with_entry(Entry::new("a", "pages").with_order(1).with_field("featured", json!(true)))
            .with_entry(Entry::new("b", "pages").with_order(2))
            .with_entry(Entry::new("c", "pages").with_order(3).with_field("featured", json!(true)))
    }

    fn tag<'a>(
        repo: &'a MemoryRepository,
        pairs: &[(&str, serde_json::Value)],
    ) -> EntryQueryTag<'a, MemoryRepository> {
        let params: ParameterSet = pairs.iter().map(|(k, v)| (*k, v.clone())).collect();
        let context = QueryContext::new("default", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        EntryQueryTag::new(params, repo, context)
    }

    #[test]
    fn test_get_count_and_navigation_share_parameters() {
        let repo = repository();
        let tag = tag(&repo, &[("from", json!("pages"))]);

        assert_eq!(tag.get().unwrap().ids(), vec!["a", "b", "c"]);
        assert_eq!(tag.count().unwrap(), 3);

        let anchor = repo.find("b").cloned().unwrap();
        assert_eq!(tag.next(&anchor).unwrap().ids(), vec!["c"]);
        assert_eq!(tag.previous(&anchor).unwrap().ids(), vec!["a"]);
    }

    #[test]
    fn test_scopes_apply_to_navigation() {
        let repo = repository();
        let scopes = ScopeRegistry::new().with(
            "featured",
            |q: EntryQuery, _: &ParameterSet| -> QueryResult<EntryQuery> {
                Ok(q.with_predicate(Predicate::eq("featured", json!(true))))
            },
        );
        let tag = tag(&repo, &[("from", json!("pages")), ("query_scope", json!("featured"))])
            .with_scopes(scopes);

        let anchor = repo.find("a").cloned().unwrap();
        assert_eq!(tag.next(&anchor).unwrap().ids(), vec!["c"]);
        assert_eq!(tag.count().unwrap(), 2);
    }

    #[test]
    fn test_explain_no_results() {
        let repo = repository();
        let tag = tag(&repo, &[("from", json!("pages")), ("show_published", json!(false))]);
        assert!(tag.query().unwrap().is_no_results());
        assert!(tag.explain().to_string().contains("NO RESULTS"));
    }
}
