//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events during compilation and materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Engine configuration loaded
    ConfigLoaded,
    /// Repository fixture loaded
    FixtureLoaded,

    // Compilation
    /// Query compiled into predicates and order-bys
    QueryCompiled,
    /// A stage proved the parameters unsatisfiable
    QueryShortCircuited,
    /// Compilation rejected a parameter
    QueryRejected,
    /// A condition parameter was not understood and was skipped
    ConditionSkipped,
    /// A scope handle was not registered and was skipped
    ScopeSkipped,

    // Materialization
    /// Entries materialized
    QueryExecuted,
    /// Count materialized
    CountExecuted,
    /// Navigation query resolved
    NavigationResolved,
}

impl Event {
    /// Returns the event name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::FixtureLoaded => "FIXTURE_LOADED",
            Event::QueryCompiled => "QUERY_COMPILED",
            Event::QueryShortCircuited => "QUERY_SHORT_CIRCUITED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::ConditionSkipped => "CONDITION_SKIPPED",
            Event::ScopeSkipped => "SCOPE_SKIPPED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::CountExecuted => "COUNT_EXECUTED",
            Event::NavigationResolved => "NAVIGATION_RESOLVED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConditionSkipped | Event::ScopeSkipped => Severity::Warn,
            Event::QueryRejected => Severity::Error,
            Event::QueryCompiled | Event::QueryExecuted | Event::CountExecuted => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
