//! Collections and collection selector resolution

mod resolver;
mod types;

pub use resolver::{CollectionLookup, CollectionResolver};
pub use types::{Collection, DateBehavior};
