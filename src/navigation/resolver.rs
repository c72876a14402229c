//! Relative navigation from an anchor entry
//!
//! Next and previous compare the anchor's primary sort field against every
//! other entry. The comparison operator follows the primary sort direction:
//!
//! | step     | asc | desc |
//! |----------|-----|------|
//! | next     | `>` | `<`  |
//! | previous | `<` | `>`  |
//!
//! Older and newer are next or previous depending on whether dates run
//! ascending or descending.

use crate::collection::CollectionLookup;
use crate::compiler::{QueryCompiler, Resolved};
use crate::executor::{Entry, EntryCollection, ResultMaterializer};
use crate::observability::{log_event_with_fields, Event};
use crate::pipeline::Compiled;
use crate::planner::{FilterOp, QueryError, QueryResult, SortDirection};

/// Requested navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
    Older,
    Newer,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Previous => "previous",
            Direction::Older => "older",
            Direction::Newer => "newer",
        }
    }
}

/// Movement along the active ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Forward,
    Backward,
}

impl Step {
    fn operator(self, direction: SortDirection, value: serde_json::Value) -> FilterOp {
        match (self, direction) {
            (Step::Forward, SortDirection::Asc) | (Step::Backward, SortDirection::Desc) => {
                FilterOp::Gt(value)
            }
            (Step::Forward, SortDirection::Desc) | (Step::Backward, SortDirection::Asc) => {
                FilterOp::Lt(value)
            }
        }
    }
}

/// Builds and runs navigation queries through a compiler
pub struct NavigationResolver<'c, 'a, R: CollectionLookup + ResultMaterializer + ?Sized> {
    compiler: &'c QueryCompiler<'a, R>,
}

impl<'c, 'a, R: CollectionLookup + ResultMaterializer + ?Sized> NavigationResolver<'c, 'a, R> {
    pub fn new(compiler: &'c QueryCompiler<'a, R>) -> Self {
        Self { compiler }
    }

    /// Entries after the anchor in the active ordering
    pub fn next(&self, anchor: &Entry) -> QueryResult<EntryCollection> {
        self.navigate(Direction::Next, anchor)
    }

    /// Entries before the anchor in the active ordering
    pub fn previous(&self, anchor: &Entry) -> QueryResult<EntryCollection> {
        self.navigate(Direction::Previous, anchor)
    }

    /// Entries dated before the anchor
    pub fn older(&self, anchor: &Entry) -> QueryResult<EntryCollection> {
        self.navigate(Direction::Older, anchor)
    }

    /// Entries dated after the anchor
    pub fn newer(&self, anchor: &Entry) -> QueryResult<EntryCollection> {
        self.navigate(Direction::Newer, anchor)
    }

    pub fn navigate(&self, direction: Direction, anchor: &Entry) -> QueryResult<EntryCollection> {
        let resolved = self.compiler.resolve()?;

        let step = match direction {
            Direction::Next => Step::Forward,
            Direction::Previous => Step::Backward,
            Direction::Older | Direction::Newer => {
                let Some(collection) = resolved.collections.first() else {
                    return Ok(EntryCollection::empty());
                };
                if !collection.is_dated() {
                    return Err(QueryError::UnsupportedNavigation(
                        "requires a dated collection".into(),
                    ));
                }
                let ascending = resolved
                    .order
                    .primary()
                    .is_some_and(|o| o.direction == SortDirection::Asc);
                match (direction, ascending) {
                    (Direction::Older, true) | (Direction::Newer, false) => Step::Backward,
                    _ => Step::Forward,
                }
            }
        };

        self.step(step, direction, anchor, &resolved)
    }

    fn check_preconditions(&self, resolved: &Resolved) -> QueryResult<()> {
        let params = self.compiler.params();
        if params.has("paginate") {
            return Err(QueryError::IncompatibleParameter("paginate".into()));
        }
        if params.has("offset") {
            return Err(QueryError::IncompatibleParameter("offset".into()));
        }
        if resolved.collections.len() > 1 {
            return Err(QueryError::IncompatibleParameter("multiple collections".into()));
        }
        Ok(())
    }

    fn step(
        &self,
        step: Step,
        direction: Direction,
        anchor: &Entry,
        resolved: &Resolved,
    ) -> QueryResult<EntryCollection> {
        self.check_preconditions(resolved)?;

        let (Some(collection), Some(primary)) = (resolved.collections.first(), resolved.order.primary())
        else {
            return Ok(EntryCollection::empty());
        };

        let field = if collection.is_orderable() && primary.field == "order" {
            "order"
        } else if collection.is_dated() && primary.field == "date" {
            "date"
        } else {
            return Err(QueryError::UnsupportedNavigation(
                "requires ordered or dated collection".into(),
            ));
        };

        let Some(anchor_value) = anchor.get(field).filter(|v| !v.is_null()) else {
            return Ok(EntryCollection::empty());
        };

        let mut query = match self.compiler.compile(resolved)? {
            Compiled::Query(query) => query,
            Compiled::NoResultsExpected => return Ok(EntryCollection::empty()),
        };
        let op = step.operator(primary.direction, anchor_value);
        log_event_with_fields(
            Event::NavigationResolved,
            &[
                ("direction", direction.as_str()),
                ("field", field),
                ("operator", op.op_name()),
            ],
        );
        query = query.where_field(field, op);

        let limit = self.compiler.params().limit();
        query.limit = limit;
        if step == Step::Backward {
            if let Some(limit) = limit {
                let prior = self.compiler.count_query(&query)?;
                if limit < prior {
                    query.offset = prior - limit;
                }
            }
        }

        self.compiler.execute(&query)
    }
}
