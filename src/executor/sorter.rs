//! Result sorting for in-memory execution
//!
//! Sorts by every order-by in sequence, deterministically.

use std::cmp::Ordering;

use serde_json::Value;

use crate::planner::{OrderBy, SortDirection};

use super::entry::Entry;
use super::filters::compare_scalars;

/// Sorts entries
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts entries by the order-bys, primary first.
    ///
    /// Sort is stable: entries equal on every key keep their input order.
    pub fn sort(entries: &mut [Entry], order_bys: &[OrderBy]) {
        entries.sort_by(|a, b| {
            order_bys
                .iter()
                .map(|order| {
                    let ordering =
                        Self::compare_values(a.get(&order.field).as_ref(), b.get(&order.field).as_ref());
                    match order.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Compares two field values for sorting.
    ///
    /// Ordering rules:
    /// - missing < null < bool < number < string
    /// - For same types, natural ordering; date strings chronologically
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let a_type = type_order(a_val);
                let b_type = type_order(b_val);
                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                // Arrays and objects are not compared
                compare_scalars(a_val, b_val).unwrap_or(Ordering::Equal)
            }
        }
    }
}
