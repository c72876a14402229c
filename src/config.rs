//! Engine configuration
//!
//! Loaded from a JSON file. Every field is optional:
//!
//! ```json
//! {
//!   "current_site": "en",
//!   "sites": ["en", "fr"],
//!   "ignored_params": ["as"],
//!   "log_level": "warn"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event, Severity};
use crate::params::DEFAULT_IGNORED_PARAMS;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Site used when no `site`/`locale` parameter is given
    #[serde(default = "default_current_site")]
    pub current_site: String,

    /// Configured sites; multi-site filtering is on when there are several
    #[serde(default)]
    pub sites: Vec<String>,

    /// Parameter keys stripped before compilation
    #[serde(default = "default_ignored_params")]
    pub ignored_params: Vec<String>,

    /// Lowest log severity written to stderr
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_current_site() -> String {
    "default".to_string()
}

fn default_ignored_params() -> Vec<String> {
    DEFAULT_IGNORED_PARAMS.iter().map(|s| s.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            current_site: default_current_site(),
            sites: Vec::new(),
            ignored_params: default_ignored_params(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;

        let path_str = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("current_site", config.current_site.as_str()),
                ("path", path_str.as_str()),
            ],
        );
        Ok(config)
    }

    /// Validate field combinations
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.current_site.trim().is_empty() {
            return Err(ConfigError::Invalid("current_site must not be empty".into()));
        }

        if !self.sites.is_empty() && !self.sites.contains(&self.current_site) {
            return Err(ConfigError::Invalid(format!(
                "current_site '{}' is not one of the configured sites",
                self.current_site
            )));
        }

        if self.severity().is_none() {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_level: '{}'",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Multi-site filtering applies only with more than one site
    pub fn is_multisite(&self) -> bool {
        self.sites.len() > 1
    }

    /// Parsed log level
    pub fn severity(&self) -> Option<Severity> {
        Severity::parse(&self.log_level)
    }
}
