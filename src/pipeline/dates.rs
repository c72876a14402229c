//! Date-window and since/until stages
//!
//! Both apply only when every targeted collection is dated. Bounds are
//! strict on both sides.

use crate::planner::dates::{date_value, parse_date};
use crate::planner::{EntryQuery, Predicate, QueryResult};

use super::stage::{Compiled, QueryStage, StageInput};

/// Hides past or future entries according to collection date behavior
pub struct DateWindowStage;

impl QueryStage for DateWindowStage {
    fn name(&self) -> &'static str {
        "past_future"
    }

    fn apply(&self, query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled> {
        if !input.all_collections_dated() {
            return Ok(Compiled::Query(query));
        }
        // Behaviors come from the first collection only.
        let Some(collection) = input.collections.first() else {
            return Ok(Compiled::Query(query));
        };

        let show_future = input
            .params
            .show_future()
            .unwrap_or(collection.future_date_behavior.is_public());
        let show_past = input
            .params
            .show_past()
            .unwrap_or(collection.past_date_behavior.is_public());

        let now = date_value(input.context.now);
        let compiled = match (show_future, show_past) {
            (true, true) => Compiled::Query(query),
            (true, false) => Compiled::Query(query.with_predicate(Predicate::gt("date", now))),
            (false, true) => Compiled::Query(query.with_predicate(Predicate::lt("date", now))),
            (false, false) => Compiled::NoResultsExpected,
        };
        Ok(compiled)
    }
}

/// Applies `since` (date > since) and `until` (date < until)
pub struct SinceUntilStage;

impl QueryStage for SinceUntilStage {
    fn name(&self) -> &'static str {
        "since_until"
    }

    fn apply(&self, mut query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled> {
        if !input.all_collections_dated() {
            return Ok(Compiled::Query(query));
        }

        let now = input.context.now;
        if let Some(since) = input.params.since() {
            let since = parse_date(since, now)?;
            query = query.with_predicate(Predicate::gt("date", date_value(since)));
        }
        if let Some(until) = input.params.until() {
            let until = parse_date(until, now)?;
            query = query.with_predicate(Predicate::lt("date", date_value(until)));
        }
        Ok(Compiled::Query(query))
    }
}
