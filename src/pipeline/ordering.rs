//! Order-by stage

use crate::planner::{EntryQuery, QueryResult};

use super::stage::{Compiled, QueryStage, StageInput};

/// Appends the resolved order-bys, primary first
pub struct OrderByStage;

impl QueryStage for OrderByStage {
    fn name(&self) -> &'static str {
        "order_bys"
    }

    fn apply(&self, query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled> {
        let query = input
            .order
            .order_bys()
            .iter()
            .cloned()
            .fold(query, EntryQuery::order_by);
        Ok(Compiled::Query(query))
    }
}
