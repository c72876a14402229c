//! Ordering specification
//!
//! Parses `field[:direction]|field[:direction]` or derives a default from
//! the first resolved collection.

use std::fmt;

use crate::collection::Collection;

use super::ast::{OrderBy, SortDirection};
use super::errors::{QueryError, QueryResult};

/// Ordered sequence of order-bys; the first is primary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    order_bys: Vec<OrderBy>,
}

impl OrderSpec {
    /// Parses an explicit ordering expression.
    ///
    /// Empty fragments are skipped. An expression with no fragments at all
    /// yields an empty spec; callers fall back to the default.
    pub fn parse(expression: &str) -> QueryResult<Self> {
        let mut order_bys = Vec::new();

        for part in expression.split('|') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let order_by = match part.split_once(':') {
                Some((field, direction)) => {
                    let direction = match direction.trim() {
                        "" => SortDirection::Asc,
                        direction => SortDirection::parse(direction)
                            .ok_or_else(|| QueryError::InvalidOrderBy(part.to_string()))?,
                    };
                    OrderBy {
                        field: field.trim().to_string(),
                        direction,
                    }
                }
                None => OrderBy::asc(part),
            };

            if order_by.field.is_empty() {
                return Err(QueryError::InvalidOrderBy(part.to_string()));
            }
            order_bys.push(order_by);
        }

        Ok(Self { order_bys })
    }

    /// Default ordering for a set of collections.
    ///
    /// Only the first collection is consulted, even when several are
    /// queried together.
    pub fn default_for(collections: &[Collection]) -> Self {
        let order_bys = match collections.first() {
            Some(c) if c.is_orderable() => vec![OrderBy::asc("order")],
            Some(c) if c.is_dated() => vec![OrderBy::desc("date"), OrderBy::asc("title")],
            _ => vec![OrderBy::asc("title")],
        };
        Self { order_bys }
    }

    /// Explicit expression if present and non-empty, else the default
    pub fn resolve(expression: Option<&str>, collections: &[Collection]) -> QueryResult<Self> {
        if let Some(expression) = expression {
            let spec = Self::parse(expression)?;
            if !spec.is_empty() {
                return Ok(spec);
            }
        }
        Ok(Self::default_for(collections))
    }

    /// The primary order-by
    pub fn primary(&self) -> Option<&OrderBy> {
        self.order_bys.first()
    }

    pub fn order_bys(&self) -> &[OrderBy] {
        &self.order_bys
    }

    pub fn is_empty(&self) -> bool {
        self.order_bys.is_empty()
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.order_bys.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("|"))
    }
}
