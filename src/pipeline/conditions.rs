//! Generic field conditions
//!
//! Every `field:condition` parameter that is not a taxonomy parameter
//! becomes one field predicate. Unknown conditions are skipped with a
//! warning.

use regex::Regex;
use serde_json::Value;

use crate::observability::{log_event_with_fields, Event};
use crate::params::value::{as_bool, as_text, split_list, typed, typed_scalar};
use crate::planner::dates::{date_value, parse_date};
use crate::planner::{EntryQuery, FilterOp, QueryError, QueryResult};

use super::stage::{Compiled, QueryStage, StageInput};

/// Builds field predicates from `field:condition` parameters
pub struct ConditionStage;

impl QueryStage for ConditionStage {
    fn name(&self) -> &'static str {
        "conditions"
    }

    fn apply(&self, mut query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled> {
        for (key, value) in input.params.iter() {
            let Some((field, condition)) = key.split_once(':') else {
                continue;
            };
            if field.is_empty() || field == "taxonomy" {
                continue;
            }

            match condition_op(condition, value, input)? {
                Some(FilterOp::In(values)) => query = query.where_in(field, values),
                Some(op) => query = query.where_field(field, op),
                None => {
                    log_event_with_fields(
                        Event::ConditionSkipped,
                        &[("condition", condition), ("field", field)],
                    );
                }
            }
        }
        Ok(Compiled::Query(query))
    }
}

/// Maps a condition name and value to a filter operation.
///
/// Returns `Ok(None)` for condition names that are not recognized.
fn condition_op(condition: &str, value: &Value, input: &StageInput<'_>) -> QueryResult<Option<FilterOp>> {
    let op = match condition {
        "is" | "equals" => FilterOp::Eq(typed(value)),
        "not" | "isnt" | "aint" => FilterOp::Ne(typed(value)),

        "exists" | "isset" => presence(value, true),
        "doesnt_exist" | "not_set" | "isnt_set" | "null" => presence(value, false),

        "contains" => FilterOp::Like(format!("%{}%", literal(condition, value)?)),
        "doesnt_contain" => FilterOp::NotLike(format!("%{}%", literal(condition, value)?)),
        "starts_with" | "begins_with" => FilterOp::Like(format!("{}%", literal(condition, value)?)),
        "doesnt_start_with" | "doesnt_begin_with" => {
            FilterOp::NotLike(format!("{}%", literal(condition, value)?))
        }
        "ends_with" => FilterOp::Like(format!("%{}", literal(condition, value)?)),
        "doesnt_end_with" => FilterOp::NotLike(format!("%{}", literal(condition, value)?)),

        "gt" | "greater_than" => FilterOp::Gt(typed(value)),
        "gte" | "greater_than_or_equal_to" => FilterOp::Gte(typed(value)),
        "lt" | "less_than" => FilterOp::Lt(typed(value)),
        "lte" | "less_than_or_equal_to" => FilterOp::Lte(typed(value)),

        "in" => FilterOp::In(list(value)),
        "not_in" => FilterOp::NotIn(list(value)),

        "matches" | "match" | "regex" => FilterOp::Regex(pattern(condition, value)?),
        "doesnt_match" => FilterOp::NotRegex(pattern(condition, value)?),

        "is_after" | "is_future" => temporal(condition, value, input, true)?,
        "is_before" | "is_past" => temporal(condition, value, input, false)?,

        _ => return Ok(None),
    };
    Ok(Some(op))
}

fn presence(value: &Value, exists: bool) -> FilterOp {
    if as_bool(value).unwrap_or(true) == exists {
        FilterOp::NotNull
    } else {
        FilterOp::Null
    }
}

fn text(condition: &str, value: &Value) -> QueryResult<String> {
    as_text(value).ok_or_else(|| {
        QueryError::InvalidCondition(format!("[{}] requires a scalar value", condition))
    })
}

/// Condition text as a LIKE fragment matching itself only
fn literal(condition: &str, value: &Value) -> QueryResult<String> {
    let raw = text(condition, value)?;
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Ok(escaped)
}

fn list(value: &Value) -> Vec<Value> {
    split_list(value).iter().map(|s| typed_scalar(s)).collect()
}

fn pattern(condition: &str, value: &Value) -> QueryResult<String> {
    let raw = text(condition, value)?;
    Regex::new(&raw)
        .map_err(|e| QueryError::InvalidCondition(format!("[{}] bad pattern: {}", condition, e)))?;
    Ok(raw)
}

/// `true`/`false` compare with now; anything else is parsed as a date
fn temporal(condition: &str, value: &Value, input: &StageInput<'_>, after: bool) -> QueryResult<FilterOp> {
    let now = input.context.now;
    let (bound, after) = match as_bool(value) {
        Some(flag) => (now, after == flag),
        None => (parse_date(&text(condition, value)?, now)?, after),
    };

    let bound = date_value(bound);
    Ok(if after {
        FilterOp::Gt(bound)
    } else {
        FilterOp::Lt(bound)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::compiler::QueryContext;
    use crate::params::ParameterSet;
    use crate::planner::{OrderSpec, Predicate};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn run(pairs: &[(&str, Value)]) -> QueryResult<Vec<Predicate>> {
        let params: ParameterSet = pairs.iter().map(|(k, v)| (*k, v.clone())).collect();
        let collections = [Collection::new("products")];
        let order = OrderSpec::default_for(&collections);
        let context = QueryContext::new("default", Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let input = StageInput {
            params: &params,
            collections: &collections,
            order: &order,
            context: &context,
        };
        ConditionStage
            .apply(EntryQuery::default(), &input)
            .map(|c| c.into_query().unwrap().predicates)
    }

    #[test]
    fn test_equality_types_values() {
        let predicates = run(&[("price:is", json!("10")), ("title:not", json!("Draft"))]).unwrap();
        assert_eq!(
            predicates,
            vec![
                Predicate::field("price", FilterOp::Eq(json!(10))),
                Predicate::field("title", FilterOp::Ne(json!("Draft"))),
            ]
        );
    }

    #[test]
    fn test_string_conditions() {
        let predicates = run(&[("title:contains", json!("rust"))]).unwrap();
        assert_eq!(predicates, vec![Predicate::field("title", FilterOp::Like("%rust%".into()))]);

        let predicates = run(&[("slug:starts_with", json!("intro"))]).unwrap();
        assert_eq!(predicates, vec![Predicate::field("slug", FilterOp::Like("intro%".into()))]);

        let predicates = run(&[("slug:doesnt_end_with", json!("-old"))]).unwrap();
        assert_eq!(predicates, vec![Predicate::field("slug", FilterOp::NotLike("%-old".into()))]);
    }

    #[test]
    fn test_string_conditions_escape_wildcards() {
        let predicates = run(&[("slug:starts_with", json!("my_post"))]).unwrap();
        assert_eq!(
            predicates,
            vec![Predicate::field("slug", FilterOp::Like("my\\_post%".into()))]
        );

        let predicates = run(&[("title:contains", json!("50%"))]).unwrap();
        assert_eq!(
            predicates,
            vec![Predicate::field("title", FilterOp::Like("%50\\%%".into()))]
        );
    }

    #[test]
    fn test_presence() {
        let predicates = run(&[("subtitle:exists", json!(true))]).unwrap();
        assert_eq!(predicates, vec![Predicate::field("subtitle", FilterOp::NotNull)]);

        let predicates = run(&[("subtitle:exists", json!("false"))]).unwrap();
        assert_eq!(predicates, vec![Predicate::field("subtitle", FilterOp::Null)]);

        let predicates = run(&[("subtitle:doesnt_exist", json!(true))]).unwrap();
        assert_eq!(predicates, vec![Predicate::field("subtitle", FilterOp::Null)]);
    }

    #[test]
    fn test_membership() {
        let predicates = run(&[("rating:in", json!("3|4|5"))]).unwrap();
        assert_eq!(
            predicates,
            vec![Predicate::field("rating", FilterOp::In(vec![json!(3), json!(4), json!(5)]))]
        );
    }

    #[test]
    fn test_temporal_conditions() {
        let predicates = run(&[("expires:is_future", json!(true))]).unwrap();
        assert_eq!(
            predicates,
            vec![Predicate::gt("expires", json!("2024-03-01T00:00:00Z"))]
        );

        let predicates = run(&[("expires:is_past", json!("false"))]).unwrap();
        assert_eq!(
            predicates,
            vec![Predicate::gt("expires", json!("2024-03-01T00:00:00Z"))]
        );

        let predicates = run(&[("starts:is_before", json!("2024-01-01"))]).unwrap();
        assert_eq!(
            predicates,
            vec![Predicate::lt("starts", json!("2024-01-01T00:00:00Z"))]
        );
    }

    #[test]
    fn test_bad_regex_rejected() {
        let err = run(&[("title:matches", json!("(unclosed"))]).unwrap_err();
        assert!(matches!(err, QueryError::InvalidCondition(_)));
    }

    #[test]
    fn test_unknown_condition_skipped() {
        assert!(run(&[("title:sounds_like", json!("x"))]).unwrap().is_empty());
    }

    #[test]
    fn test_taxonomy_and_plain_keys_ignored() {
        let predicates = run(&[
            ("taxonomy:tags", json!("rust")),
            ("limit", json!(5)),
            ("from", json!("products")),
        ])
        .unwrap();
        assert!(predicates.is_empty());
    }
}
