//! Observability for query compilation
//!
//! Typed events rendered as one-line JSON records on stderr. Logging only
//! observes; nothing here influences which entries a query returns.
//!
//! ```ignore
//! use entryquery::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::QueryShortCircuited, &[("stage", "published")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
