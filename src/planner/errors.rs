//! Compilation error types
//!
//! Error codes:
//! - ENTRY_COLLECTION_NOT_FOUND
//! - ENTRY_INVALID_TAXONOMY_MODIFIER
//! - ENTRY_INCOMPATIBLE_PARAMETER
//! - ENTRY_UNSUPPORTED_NAVIGATION
//! - ENTRY_INVALID_ORDER_BY
//! - ENTRY_INVALID_DATE
//! - ENTRY_INVALID_CONDITION
//! - ENTRY_STORAGE_FAILED
//!
//! The "no results expected" outcome is deliberately absent here: it is a
//! value of [`Compiled`](crate::pipeline::Compiled), not a failure.

use thiserror::Error;

use crate::executor::StorageError;

/// Errors surfaced by query compilation, navigation, and materialization
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A selected collection handle is unknown to the lookup
    #[error("Collection [{0}] not found")]
    CollectionNotFound(String),

    /// Taxonomy parameter used a modifier other than `any` or `all`
    #[error("Unknown taxonomy query modifier [{0}]. Valid values are \"any\" and \"all\".")]
    InvalidTaxonomyModifier(String),

    /// Navigation was requested with an incompatible parameter combination
    #[error("Navigation is not compatible with [{0}]")]
    IncompatibleParameter(String),

    /// The targeted collection cannot support the requested navigation
    #[error("Navigation {0}")]
    UnsupportedNavigation(String),

    /// Order expression carried an unknown direction
    #[error("Invalid order expression [{0}]")]
    InvalidOrderBy(String),

    /// A date parameter could not be parsed
    #[error("Unable to parse date [{0}]")]
    InvalidDate(String),

    /// A condition parameter carried an unusable value
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// The repository failed while executing a compiled query
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QueryError {
    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::CollectionNotFound(_) => "ENTRY_COLLECTION_NOT_FOUND",
            QueryError::InvalidTaxonomyModifier(_) => "ENTRY_INVALID_TAXONOMY_MODIFIER",
            QueryError::IncompatibleParameter(_) => "ENTRY_INCOMPATIBLE_PARAMETER",
            QueryError::UnsupportedNavigation(_) => "ENTRY_UNSUPPORTED_NAVIGATION",
            QueryError::InvalidOrderBy(_) => "ENTRY_INVALID_ORDER_BY",
            QueryError::InvalidDate(_) => "ENTRY_INVALID_DATE",
            QueryError::InvalidCondition(_) => "ENTRY_INVALID_CONDITION",
            QueryError::Storage(_) => "ENTRY_STORAGE_FAILED",
        }
    }

    /// Returns true if the error was raised before storage was touched
    pub fn is_compile_time(&self) -> bool {
        !matches!(self, QueryError::Storage(_))
    }
}

/// Result type for compilation operations
pub type QueryResult<T> = Result<T, QueryError>;
