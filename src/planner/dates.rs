//! Date parsing for `since`/`until` and date-valued predicates
//!
//! Dates travel through predicates as RFC 3339 strings in UTC so that a
//! compiled query stays plain data. Relative expressions are evaluated
//! against the compilation context's clock, never the wall clock.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;

use super::errors::{QueryError, QueryResult};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn relative_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^([+-]?)\s*(\d+)\s*(second|minute|hour|day|week)s?(\s+ago)?$").ok()
        })
        .as_ref()
}

/// Parses an absolute or relative date expression.
pub fn parse_date(raw: &str, now: DateTime<Utc>) -> QueryResult<DateTime<Utc>> {
    let trimmed = raw.trim();
    let lowered = trimmed.to_ascii_lowercase();

    let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN).and_utc();

    match lowered.as_str() {
        "now" => return Ok(now),
        "today" => return Ok(midnight(now.date_naive())),
        "yesterday" => return Ok(midnight(now.date_naive()) - Duration::days(1)),
        "tomorrow" => return Ok(midnight(now.date_naive()) + Duration::days(1)),
        _ => {}
    }

    if let Some(parsed) = parse_absolute(trimmed) {
        return Ok(parsed);
    }

    if let Some(caps) = relative_pattern().and_then(|p| p.captures(&lowered)) {
        let amount: i64 = caps[2]
            .parse()
            .map_err(|_| QueryError::InvalidDate(raw.to_string()))?;
        let unit = match &caps[3] {
            "second" => Duration::try_seconds(amount),
            "minute" => Duration::try_minutes(amount),
            "hour" => Duration::try_hours(amount),
            "day" => Duration::try_days(amount),
            _ => Duration::try_weeks(amount),
        };
        let backwards = &caps[1] == "-" || caps.get(4).is_some();
        let shifted = unit.and_then(|unit| {
            if backwards {
                now.checked_sub_signed(unit)
            } else {
                now.checked_add_signed(unit)
            }
        });
        return shifted.ok_or_else(|| QueryError::InvalidDate(raw.to_string()));
    }

    Err(QueryError::InvalidDate(raw.to_string()))
}

/// Parses RFC 3339, naive date-times (taken as UTC) and plain dates
pub fn parse_absolute(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Encodes a date as a predicate value
pub fn date_value(date: DateTime<Utc>) -> Value {
    Value::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Decodes a date-valued JSON string
pub fn value_as_date(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_absolute_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-01-02", now()).unwrap(), expected);
        assert_eq!(parse_date("2024-01-02T00:00:00Z", now()).unwrap(), expected);
        assert_eq!(parse_date("2024-01-02 00:00", now()).unwrap(), expected);
        assert_eq!(
            parse_date("2024-01-02T02:00:00+02:00", now()).unwrap(),
            expected
        );
    }

    #[test]
    fn test_keywords() {
        let today = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_date("now", now()).unwrap(), now());
        assert_eq!(parse_date("Today", now()).unwrap(), today);
        assert_eq!(parse_date("yesterday", now()).unwrap(), today - Duration::days(1));
        assert_eq!(parse_date("tomorrow", now()).unwrap(), today + Duration::days(1));
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(
            parse_date("-1 week", now()).unwrap(),
            now() - Duration::weeks(1)
        );
        assert_eq!(
            parse_date("+3 days", now()).unwrap(),
            now() + Duration::days(3)
        );
        assert_eq!(
            parse_date("2 hours ago", now()).unwrap(),
            now() - Duration::hours(2)
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(
            parse_date("next full moon", now()).unwrap_err(),
            QueryError::InvalidDate("next full moon".into())
        );
    }

    #[test]
    fn test_value_encoding() {
        let value = date_value(now());
        assert_eq!(value, Value::String("2024-06-15T12:30:00Z".into()));
        assert_eq!(value_as_date(&value), Some(now()));
        assert_eq!(value_as_date(&Value::Bool(true)), None);
    }

    #[test]
    fn test_value_encoding_keeps_fraction() {
        let instant = now() + Duration::milliseconds(250);
        let value = date_value(instant);
        assert_eq!(value, Value::String("2024-06-15T12:30:00.250Z".into()));
        assert_eq!(value_as_date(&value), Some(instant));
    }
}
