//! Publish-state filtering

use serde_json::Value;

use crate::planner::{EntryQuery, Predicate, QueryResult};

use super::stage::{Compiled, QueryStage, StageInput};

/// published only → `published = true`, unpublished only →
/// `published = false`, both → nothing, neither → no results
pub struct PublishStateStage;

impl QueryStage for PublishStateStage {
    fn name(&self) -> &'static str {
        "published"
    }

    fn apply(&self, query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled> {
        let published = input.params.show_published();
        let unpublished = input.params.show_unpublished();

        let compiled = match (published, unpublished) {
            (true, true) => Compiled::Query(query),
            (true, false) => {
                Compiled::Query(query.with_predicate(Predicate::eq("published", Value::Bool(true))))
            }
            (false, true) => {
                Compiled::Query(query.with_predicate(Predicate::eq("published", Value::Bool(false))))
            }
            (false, false) => Compiled::NoResultsExpected,
        };
        Ok(compiled)
    }
}
