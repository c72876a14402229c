//! Explain output for compiled entry queries
//!
//! Produces deterministic, human-readable explain output.

use std::fmt;

use serde::Serialize;

use super::ast::EntryQuery;
use super::errors::QueryError;

/// Compilation outcome as reported by explain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExplainStatus {
    /// A query would be executed
    Accepted,
    /// Parameters are unsatisfiable; storage is never consulted
    NoResults,
    /// Compilation failed
    Rejected,
}

impl ExplainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplainStatus::Accepted => "ACCEPTED",
            ExplainStatus::NoResults => "NO RESULTS",
            ExplainStatus::Rejected => "REJECTED",
        }
    }
}

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainPlan {
    pub status: ExplainStatus,
    /// Target collection handles
    pub collections: Vec<String>,
    /// Predicates in application order
    pub predicates: Vec<String>,
    /// Order-bys, primary first
    pub order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a compiled query
    pub fn from_query(query: &EntryQuery) -> Self {
        Self {
            status: ExplainStatus::Accepted,
            collections: query.collections.clone(),
            predicates: query.predicates.iter().map(ToString::to_string).collect(),
            order: query.order_bys.iter().map(ToString::to_string).collect(),
            limit: query.limit,
            offset: query.offset,
            rejection_code: None,
            rejection_reason: None,
        }
    }

    /// Creates an explain plan for parameters known to match nothing
    pub fn no_results(collections: Vec<String>) -> Self {
        Self {
            status: ExplainStatus::NoResults,
            collections,
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: 0,
            rejection_code: None,
            rejection_reason: None,
        }
    }

    /// Creates an explain plan from a compilation error
    pub fn from_error(err: &QueryError) -> Self {
        Self {
            status: ExplainStatus::Rejected,
            collections: Vec::new(),
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: 0,
            rejection_code: Some(err.code().to_string()),
            rejection_reason: Some(err.to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;
        writeln!(f, "Status: {}", self.status.as_str())?;

        match self.status {
            ExplainStatus::Rejected => {
                if let Some(code) = &self.rejection_code {
                    writeln!(f, "Error Code: {}", code)?;
                }
                if let Some(reason) = &self.rejection_reason {
                    writeln!(f, "Reason: {}", reason)?;
                }
            }
            ExplainStatus::NoResults => {
                writeln!(f, "Collections: {}", self.collections.join(", "))?;
            }
            ExplainStatus::Accepted => {
                writeln!(f, "Collections: {}", self.collections.join(", "))?;
                if !self.predicates.is_empty() {
                    writeln!(f, "Predicates:")?;
                    for pred in &self.predicates {
                        writeln!(f, "  - {}", pred)?;
                    }
                }
                if !self.order.is_empty() {
                    writeln!(f, "Order: {}", self.order.join(", "))?;
                }
                if let Some(limit) = self.limit {
                    writeln!(f, "Limit: {}", limit)?;
                }
                if self.offset > 0 {
                    writeln!(f, "Offset: {}", self.offset)?;
                }
            }
        }

        Ok(())
    }
}
