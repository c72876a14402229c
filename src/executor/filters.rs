//! Predicate filtering for in-memory execution
//!
//! Evaluates predicates against entries with AND semantics. Comparisons
//! between two date-valued strings are chronological; numbers compare
//! numerically regardless of integer/float representation.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use crate::planner::dates::value_as_date;
use crate::planner::{FilterOp, Predicate};

use super::entry::Entry;

/// Evaluates predicates against entries
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if an entry matches all predicates
    pub fn matches(entry: &Entry, predicates: &[Predicate]) -> bool {
        predicates
            .iter()
            .all(|pred| Self::matches_predicate(entry, pred))
    }

    /// Checks if an entry matches a single predicate
    fn matches_predicate(entry: &Entry, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Taxonomy(term) => entry.has_term(term),
            Predicate::TaxonomyIn(terms) => terms.iter().any(|t| entry.has_term(t)),
            Predicate::Field { field, op } => {
                let actual = entry.get(field).filter(|v| !v.is_null());
                Self::matches_op(actual.as_ref(), op)
            }
        }
    }

    /// Missing and null field values only satisfy negative operators
    fn matches_op(actual: Option<&Value>, op: &FilterOp) -> bool {
        match op {
            FilterOp::Null => actual.is_none(),
            FilterOp::NotNull => actual.is_some(),
            FilterOp::Ne(expected) => !actual.is_some_and(|a| values_equal(a, expected)),
            FilterOp::NotIn(values) => {
                !actual.is_some_and(|a| values.iter().any(|v| values_equal(a, v)))
            }
            FilterOp::NotLike(pattern) => !actual.is_some_and(|a| like_match(a, pattern)),
            FilterOp::NotRegex(pattern) => !actual.is_some_and(|a| regex_match(a, pattern)),
            _ => match actual {
                Some(actual) => Self::matches_present(actual, op),
                None => false,
            },
        }
    }

    fn matches_present(actual: &Value, op: &FilterOp) -> bool {
        match op {
            FilterOp::Eq(expected) => values_equal(actual, expected),
            FilterOp::Gt(bound) => compare_scalars(actual, bound) == Some(Ordering::Greater),
            FilterOp::Gte(bound) => matches!(
                compare_scalars(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lt(bound) => compare_scalars(actual, bound) == Some(Ordering::Less),
            FilterOp::Lte(bound) => matches!(
                compare_scalars(actual, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOp::Like(pattern) => like_match(actual, pattern),
            FilterOp::Regex(pattern) => regex_match(actual, pattern),
            FilterOp::In(values) => values.iter().any(|v| values_equal(actual, v)),
            _ => false,
        }
    }
}

/// Orders two scalars of compatible type; `None` when incomparable
pub(crate) fn compare_scalars(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a_s), Value::String(b_s)) => match (value_as_date(a), value_as_date(b)) {
            (Some(a_d), Some(b_d)) => Some(a_d.cmp(&b_d)),
            _ => Some(a_s.cmp(b_s)),
        },
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Number(n), Value::String(text)) => compare_loose(n, text),
        (Value::String(text), Value::Number(n)) => compare_loose(n, text).map(Ordering::reverse),
        _ => None,
    }
}

/// Number against string: numerically when the string is numeric
/// (`"02134"` equals `2134`), else by text.
fn compare_loose(number: &serde_json::Number, text: &str) -> Option<Ordering> {
    match text.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => number.as_f64()?.partial_cmp(&parsed),
        _ => Some(number.to_string().as_str().cmp(text)),
    }
}

/// Equality with numeric and date normalization. An array field equals a
/// scalar when any element does.
fn values_equal(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) if !expected.is_array() => {
            items.iter().any(|item| values_equal(item, expected))
        }
        _ => actual == expected || compare_scalars(actual, expected) == Some(Ordering::Equal),
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `%` matches any run, `_` one character, a backslash escapes the next one.
/// Case-insensitive, whole value.
fn like_match(actual: &Value, pattern: &str) -> bool {
    let mut source = String::from("(?is)^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    source.push_str(&regex::escape(next.encode_utf8(&mut [0u8; 4])));
                }
            }
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
        }
    }
    source.push('$');
    regex_match(actual, &source)
}

fn regex_match(actual: &Value, pattern: &str) -> bool {
    let (Some(text), Ok(re)) = (text_of(actual), Regex::new(pattern)) else {
        return false;
    };
    re.is_match(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn entry() -> Entry {
        Entry::new("a", "blog")
            .with_title("Learning Rust")
            .with_date(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
            .with_term("tags::rust")
            .with_field("rating", json!(4))
            .with_field("price", json!(9.5))
            .with_field("colors", json!(["red", "blue"]))
            .with_field("subtitle", Value::Null)
    }

    fn field(name: &str, op: FilterOp) -> Vec<Predicate> {
        vec![Predicate::field(name, op)]
    }

    #[test]
    fn test_equality_normalizes_numbers() {
        assert!(PredicateFilter::matches(&entry(), &field("rating", FilterOp::Eq(json!(4.0)))));
        assert!(PredicateFilter::matches(&entry(), &field("rating", FilterOp::Eq(json!("4")))));
        assert!(!PredicateFilter::matches(&entry(), &field("rating", FilterOp::Eq(json!("four")))));
    }

    #[test]
    fn test_numeric_strings_compare_loosely() {
        let e = Entry::new("p", "products")
            .with_field("sku", json!("12345"))
            .with_field("zip", json!("02134"));

        assert!(PredicateFilter::matches(&e, &field("sku", FilterOp::Eq(json!(12345)))));
        assert!(PredicateFilter::matches(&e, &field("zip", FilterOp::Eq(json!(2134)))));
        assert!(!PredicateFilter::matches(&e, &field("sku", FilterOp::Ne(json!(12345)))));
        assert!(PredicateFilter::matches(
            &e,
            &field("sku", FilterOp::In(vec![json!(1), json!(12345)]))
        ));
        assert!(PredicateFilter::matches(&e, &field("sku", FilterOp::Gt(json!(9999)))));
    }

    #[test]
    fn test_like_escaped_wildcards_are_literal() {
        let e = Entry::new("a", "blog").with_field("slug", json!("myXpost"));
        assert!(PredicateFilter::matches(&e, &field("slug", FilterOp::Like("my_post".into()))));
        assert!(!PredicateFilter::matches(&e, &field("slug", FilterOp::Like("my\\_post".into()))));

        let e = Entry::new("b", "blog").with_field("slug", json!("my_post"));
        assert!(PredicateFilter::matches(&e, &field("slug", FilterOp::Like("my\\_post".into()))));
    }

    #[test]
    fn test_array_field_equality() {
        assert!(PredicateFilter::matches(&entry(), &field("colors", FilterOp::Eq(json!("red")))));
        assert!(!PredicateFilter::matches(&entry(), &field("colors", FilterOp::Eq(json!("green")))));
    }

    #[test]
    fn test_range_predicates() {
        let e = entry();
        assert!(PredicateFilter::matches(&e, &field("rating", FilterOp::Gte(json!(4)))));
        assert!(!PredicateFilter::matches(&e, &field("rating", FilterOp::Gt(json!(4)))));
        assert!(PredicateFilter::matches(&e, &field("price", FilterOp::Lt(json!(10)))));
        assert!(PredicateFilter::matches(&e, &field("price", FilterOp::Lte(json!(9.5)))));
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let e = entry();
        assert!(PredicateFilter::matches(&e, &[Predicate::gt("date", json!("2024-02-29T23:00:00-05:00"))]));
        assert!(!PredicateFilter::matches(&e, &[Predicate::gt("date", json!("2024-03-01T10:00:00+00:00"))]));
        assert!(PredicateFilter::matches(&e, &[Predicate::lt("date", json!("2024-03-02"))]));
    }

    #[test]
    fn test_like_patterns() {
        let e = entry();
        assert!(PredicateFilter::matches(&e, &field("title", FilterOp::Like("%rust".into()))));
        assert!(PredicateFilter::matches(&e, &field("title", FilterOp::Like("learning%".into()))));
        assert!(!PredicateFilter::matches(&e, &field("title", FilterOp::Like("rust%".into()))));
        assert!(PredicateFilter::matches(&e, &field("title", FilterOp::Like("Learn_ng%".into()))));
        assert!(PredicateFilter::matches(&e, &field("title", FilterOp::NotLike("%python%".into()))));
    }

    #[test]
    fn test_like_escapes_regex_characters() {
        let e = entry().with_field("slug", json!("a.b"));
        assert!(PredicateFilter::matches(&e, &field("slug", FilterOp::Like("a.b".into()))));
        assert!(!PredicateFilter::matches(&e, &field("slug", FilterOp::Like("a.c".into()))));
        let e = entry().with_field("slug", json!("axb"));
        assert!(!PredicateFilter::matches(&e, &field("slug", FilterOp::Like("a.b".into()))));
    }

    #[test]
    fn test_regex() {
        let e = entry();
        assert!(PredicateFilter::matches(&e, &field("title", FilterOp::Regex("^Learn".into()))));
        assert!(PredicateFilter::matches(&e, &field("title", FilterOp::NotRegex("^Rust".into()))));
    }

    #[test]
    fn test_membership() {
        let e = entry();
        assert!(PredicateFilter::matches(&e, &field("rating", FilterOp::In(vec![json!(3), json!(4)]))));
        assert!(!PredicateFilter::matches(&e, &field("rating", FilterOp::NotIn(vec![json!(4)]))));
        assert!(PredicateFilter::matches(&e, &field("missing", FilterOp::NotIn(vec![json!(4)]))));
    }

    #[test]
    fn test_null_and_missing() {
        let e = entry();
        assert!(PredicateFilter::matches(&e, &field("subtitle", FilterOp::Null)));
        assert!(PredicateFilter::matches(&e, &field("missing", FilterOp::Null)));
        assert!(PredicateFilter::matches(&e, &field("rating", FilterOp::NotNull)));
        assert!(!PredicateFilter::matches(&e, &field("missing", FilterOp::Eq(json!(1)))));
        assert!(PredicateFilter::matches(&e, &field("missing", FilterOp::Ne(json!(1)))));
        assert!(!PredicateFilter::matches(&e, &field("missing", FilterOp::Gt(json!(1)))));
    }

    #[test]
    fn test_taxonomy_predicates() {
        let e = entry();
        assert!(PredicateFilter::matches(&e, &[Predicate::Taxonomy("tags::rust".into())]));
        assert!(!PredicateFilter::matches(&e, &[Predicate::Taxonomy("tags::go".into())]));
        assert!(PredicateFilter::matches(
            &e,
            &[Predicate::TaxonomyIn(vec!["tags::go".into(), "tags::rust".into()])]
        ));
    }

    #[test]
    fn test_multiple_predicates_and() {
        let e = entry();
        let preds = vec![
            Predicate::eq("published", json!(true)),
            Predicate::Taxonomy("tags::rust".into()),
        ];
        assert!(PredicateFilter::matches(&e, &preds));

        let preds = vec![
            Predicate::eq("published", json!(false)),
            Predicate::Taxonomy("tags::rust".into()),
        ];
        assert!(!PredicateFilter::matches(&e, &preds));
    }
}
