//! Tag parameter normalization
//!
//! Turns the raw, already-parsed key/value bag into a [`ParameterSet`] with
//! typed accessors for the keys the compiler understands.

mod parameter_set;
pub mod value;

pub use parameter_set::{ParameterSet, Selector, DEFAULT_IGNORED_PARAMS};
