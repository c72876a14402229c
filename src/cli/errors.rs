//! CLI-specific error types
//!
//! Every CLI failure carries a stable code. Query failures keep the code of
//! the underlying [`QueryError`].

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::executor::StorageError;
use crate::planner::QueryError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout)
    IoError,
    /// Fixture could not be loaded
    FixtureError,
    /// Navigation anchor id is not in the fixture
    AnchorNotFound,
    /// Argument value could not be used
    InvalidArgument,
    /// Compilation or execution failed
    Query(&'static str),
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ENTRY_CLI_CONFIG_ERROR",
            Self::IoError => "ENTRY_CLI_IO_ERROR",
            Self::FixtureError => "ENTRY_CLI_FIXTURE_ERROR",
            Self::AnchorNotFound => "ENTRY_CLI_ANCHOR_NOT_FOUND",
            Self::InvalidArgument => "ENTRY_CLI_INVALID_ARGUMENT",
            Self::Query(code) => *code,
        }
    }
}

/// A failed command: stable code plus message
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config file unreadable or invalid
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Fixture unreadable or inconsistent
    pub fn fixture_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::FixtureError, msg)
    }

    /// Anchor entry missing
    pub fn anchor_not_found(id: &str) -> Self {
        Self::new(
            CliErrorCode::AnchorNotFound,
            format!("Anchor entry [{}] not found", id),
        )
    }

    /// Invalid argument value
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Stable code reported in the error envelope
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::fixture_error(e.message())
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::new(CliErrorCode::Query(e.code()), e.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;
