//! Ambient values a compilation depends on
//!
//! The current site, whether several sites exist, and the clock are passed
//! in explicitly so that compiling the same parameters twice in the same
//! context yields the same query.

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;

/// Explicit compilation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// Handle of the site the request is served from
    pub current_site: String,
    /// Whether the installation has more than one site
    pub multisite: bool,
    /// Instant against which past/future and relative dates are evaluated
    pub now: DateTime<Utc>,
}

impl QueryContext {
    /// Single-site context at the given instant
    pub fn new(current_site: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            current_site: current_site.into(),
            multisite: false,
            now,
        }
    }

    /// Single-site context at the current wall-clock time
    pub fn now(current_site: impl Into<String>) -> Self {
        Self::new(current_site, Utc::now())
    }

    /// Context derived from engine configuration
    pub fn from_config(config: &EngineConfig, now: DateTime<Utc>) -> Self {
        Self {
            current_site: config.current_site.clone(),
            multisite: config.is_multisite(),
            now,
        }
    }

    /// Enables or disables multi-site filtering
    pub fn with_multisite(mut self, multisite: bool) -> Self {
        self.multisite = multisite;
        self
    }
}
