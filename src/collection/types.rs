//! Collection descriptors
//!
//! Collections are owned by the content repository; the compiler only reads
//! their ordering and dating capabilities.

use serde::{Deserialize, Serialize};

/// How entries on one side of "now" are exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBehavior {
    /// Listed and visible
    Public,
    /// Hidden
    Private,
    /// Reachable directly, but not listed
    Unlisted,
}

impl DateBehavior {
    pub fn is_public(&self) -> bool {
        matches!(self, DateBehavior::Public)
    }
}

fn default_past_behavior() -> DateBehavior {
    DateBehavior::Public
}

fn default_future_behavior() -> DateBehavior {
    DateBehavior::Private
}

/// A named grouping of entries sharing ordering and dating configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique handle
    pub handle: String,
    /// Entries carry a manual `order` field
    #[serde(default)]
    pub orderable: bool,
    /// Entries carry a `date` field
    #[serde(default)]
    pub dated: bool,
    /// Visibility of entries dated before now
    #[serde(default = "default_past_behavior")]
    pub past_date_behavior: DateBehavior,
    /// Visibility of entries dated after now
    #[serde(default = "default_future_behavior")]
    pub future_date_behavior: DateBehavior,
}

impl Collection {
    /// A collection that is neither orderable nor dated
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            orderable: false,
            dated: false,
            past_date_behavior: default_past_behavior(),
            future_date_behavior: default_future_behavior(),
        }
    }

    /// Marks the collection as manually orderable
    pub fn orderable(mut self) -> Self {
        self.orderable = true;
        self
    }

    /// Marks the collection as dated
    pub fn dated(mut self) -> Self {
        self.dated = true;
        self
    }

    /// Sets both date behaviors
    pub fn with_date_behavior(mut self, past: DateBehavior, future: DateBehavior) -> Self {
        self.past_date_behavior = past;
        self.future_date_behavior = future;
        self
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn is_orderable(&self) -> bool {
        self.orderable
    }

    pub fn is_dated(&self) -> bool {
        self.dated
    }
}
