//! Coercions for raw parameter values
//!
//! Tag parameters arrive as loosely-typed JSON. These helpers read them
//! the way a template author writes them: `"true"` is a boolean, `"10"` is a
//! number, `"a|b"` is a list.

use serde_json::Value;

/// Reads a boolean flag.
///
/// Accepts JSON booleans, numbers (non-zero is true), and the strings
/// `true/false/yes/no/on/off/1/0`. Anything else yields `None`.
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Reads a non-negative integer from a number or numeric string
pub fn as_usize(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a scalar as text. Null, arrays and objects yield `None`.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Splits a `|`-delimited string (or a JSON array) into trimmed, non-empty
/// fragments, preserving order.
pub fn split_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(as_text)
            .flat_map(|s| split_piped(&s))
            .collect(),
        other => as_text(other).map(|s| split_piped(&s)).unwrap_or_default(),
    }
}

fn split_piped(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Interprets a textual scalar as the most specific JSON type
pub fn typed_scalar(raw: &str) -> Value {
    if raw == "null" {
        return Value::Null;
    }
    if raw == "true" {
        return Value::Bool(true);
    }
    if raw == "false" {
        return Value::Bool(false);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = raw.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(n) {
            return Value::Number(num);
        }
    }
    Value::String(raw.to_string())
}

/// Types a raw parameter value: strings are interpreted, other JSON is kept
pub fn typed(value: &Value) -> Value {
    match value {
        Value::String(s) => typed_scalar(s),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_bool() {
        assert_eq!(as_bool(&json!(true)), Some(true));
        assert_eq!(as_bool(&json!("false")), Some(false));
        assert_eq!(as_bool(&json!("Yes")), Some(true));
        assert_eq!(as_bool(&json!(0)), Some(false));
        assert_eq!(as_bool(&json!("maybe")), None);
        assert_eq!(as_bool(&json!(null)), None);
    }

    #[test]
    fn test_as_usize() {
        assert_eq!(as_usize(&json!(10)), Some(10));
        assert_eq!(as_usize(&json!(" 7 ")), Some(7));
        assert_eq!(as_usize(&json!(-1)), None);
        assert_eq!(as_usize(&json!("ten")), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(&json!("a|b| c ||")), vec!["a", "b", "c"]);
        assert_eq!(split_list(&json!(["a", "b|c"])), vec!["a", "b", "c"]);
        assert!(split_list(&json!(null)).is_empty());
    }

    #[test]
    fn test_typed_scalar() {
        assert_eq!(typed_scalar("42"), json!(42));
        assert_eq!(typed_scalar("4.5"), json!(4.5));
        assert_eq!(typed_scalar("true"), json!(true));
        assert_eq!(typed_scalar("null"), json!(null));
        assert_eq!(typed_scalar("hello"), json!("hello"));
    }
}
