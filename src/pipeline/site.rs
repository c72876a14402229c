//! Site restriction

use serde_json::Value;

use crate::planner::{EntryQuery, Predicate, QueryResult};

use super::stage::{Compiled, QueryStage, StageInput};

/// Restricts to one site unless the selector is `*` or there is only one site
pub struct SiteStage;

impl QueryStage for SiteStage {
    fn name(&self) -> &'static str {
        "site"
    }

    fn apply(&self, query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled> {
        let site = input
            .params
            .site()
            .unwrap_or(input.context.current_site.as_str());

        if site == "*" || !input.context.multisite {
            return Ok(Compiled::Query(query));
        }

        Ok(Compiled::Query(query.with_predicate(Predicate::eq(
            "site",
            Value::String(site.to_string()),
        ))))
    }
}
