//! Navigation Tests
//!
//! Tests for relative navigation from an anchor entry:
//! - Comparison operator follows the primary sort direction
//! - Older and newer follow the date direction
//! - Windowing parameters and multi-collection queries are rejected
//! - Previous with a limit lands on the entries nearest the anchor

use chrono::{DateTime, Duration, TimeZone, Utc};
use entryquery::collection::Collection;
use entryquery::executor::{Entry, MemoryRepository};
use entryquery::{
    Direction, NavigationResolver, ParameterSet, QueryCompiler, QueryContext, QueryError,
    QueryResult,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn at(month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap()
}

fn repository() -> MemoryRepository {
    let mut repo = MemoryRepository::new()
        .with_collection(Collection::new("pages").orderable())
        .with_collection(Collection::new("blog").dated());

    for i in 1..=20 {
        repo = repo.with_entry(
            Entry::new(format!("p{:02}", i), "pages")
                .with_order(i)
                .with_title(format!("Page {}", i)),
        );
    }

    for (id, month) in [("jan", 1), ("feb", 2), ("mar", 3), ("apr", 4)] {
        repo = repo.with_entry(Entry::new(id, "blog").with_title(id).with_date(at(month)));
    }
    repo
}

fn navigate(pairs: &[(&str, Value)], anchor: &str, direction: Direction) -> QueryResult<Vec<String>> {
    let repo = repository();
    let params: ParameterSet = pairs.iter().map(|(k, v)| (*k, v.clone())).collect();
    let compiler = QueryCompiler::new(params, &repo, QueryContext::new("default", at(6)));
    let anchor = repo.find(anchor).cloned().expect("anchor exists");

    NavigationResolver::new(&compiler)
        .navigate(direction, &anchor)
        .map(|entries| entries.ids().into_iter().map(String::from).collect())
}

fn pages(range: std::ops::RangeInclusive<i64>) -> Vec<String> {
    range.map(|i| format!("p{:02}", i)).collect()
}

// =============================================================================
// Next / Previous Tests
// =============================================================================

/// Next on an ascending order returns later entries.
#[test]
fn test_next_ascending() {
    let ids = navigate(&[("from", json!("pages")), ("limit", json!(3))], "p05", Direction::Next).unwrap();
    assert_eq!(ids, pages(6..=8));
}

/// Next on a descending order returns earlier entries, nearest first.
#[test]
fn test_next_descending() {
    let ids = navigate(
        &[("from", json!("pages")), ("sort", json!("order:desc")), ("limit", json!(2))],
        "p05",
        Direction::Next,
    )
    .unwrap();
    assert_eq!(ids, vec!["p04", "p03"]);
}

/// Previous on a descending order returns later entries.
#[test]
fn test_previous_descending() {
    let ids = navigate(
        &[("from", json!("pages")), ("sort", json!("order:desc"))],
        "p18",
        Direction::Previous,
    )
    .unwrap();
    assert_eq!(ids, vec!["p20", "p19"]);
}

/// Previous with limit 10 and 15 prior entries skips the 5 furthest.
#[test]
fn test_previous_limit_offsets_to_nearest() {
    let ids = navigate(&[("from", json!("pages")), ("limit", json!(10))], "p16", Direction::Previous)
        .unwrap();
    assert_eq!(ids, pages(6..=15));
}

/// Previous with a limit larger than the prior entries returns all of them.
#[test]
fn test_previous_limit_exceeds_prior() {
    let ids = navigate(&[("from", json!("pages")), ("limit", json!(10))], "p04", Direction::Previous)
        .unwrap();
    assert_eq!(ids, pages(1..=3));
}

/// The first entry has no previous entries.
#[test]
fn test_previous_from_first_is_empty() {
    let ids = navigate(&[("from", json!("pages"))], "p01", Direction::Previous).unwrap();
    assert!(ids.is_empty());
}

// =============================================================================
// Older / Newer Tests
// =============================================================================

/// Older on the default date-descending order walks back in time.
#[test]
fn test_older_descending() {
    let ids = navigate(&[("from", json!("blog"))], "mar", Direction::Older).unwrap();
    assert_eq!(ids, vec!["feb", "jan"]);
}

/// Newer on the default date-descending order walks forward in time.
#[test]
fn test_newer_descending() {
    let ids = navigate(&[("from", json!("blog"))], "mar", Direction::Newer).unwrap();
    assert_eq!(ids, vec!["apr"]);
}

/// Older on a date-ascending order still returns earlier entries.
#[test]
fn test_older_ascending() {
    let ids = navigate(
        &[("from", json!("blog")), ("sort", json!("date:asc"))],
        "mar",
        Direction::Older,
    )
    .unwrap();
    assert_eq!(ids, vec!["jan", "feb"]);
}

/// Newer on a date-ascending order returns later entries.
#[test]
fn test_newer_ascending() {
    let ids = navigate(
        &[("from", json!("blog")), ("sort", json!("date:asc"))],
        "feb",
        Direction::Newer,
    )
    .unwrap();
    assert_eq!(ids, vec!["mar", "apr"]);
}

/// Older on an undated collection is unsupported.
#[test]
fn test_older_undated_unsupported() {
    let err = navigate(&[("from", json!("pages"))], "p02", Direction::Older).unwrap_err();
    assert_eq!(err.code(), "ENTRY_UNSUPPORTED_NAVIGATION");
}

/// Sorting by an unrelated field disables navigation.
#[test]
fn test_unrelated_sort_unsupported() {
    let err = navigate(
        &[("from", json!("pages")), ("sort", json!("title"))],
        "p02",
        Direction::Next,
    )
    .unwrap_err();
    assert_eq!(
        err,
        QueryError::UnsupportedNavigation("requires ordered or dated collection".into())
    );
}

/// Entries dated within the same second are still ordered apart.
#[test]
fn test_sub_second_dates_are_distinct() {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let repo = MemoryRepository::new()
        .with_collection(Collection::new("blog").dated())
        .with_entry(Entry::new("a", "blog").with_date(base + Duration::milliseconds(200)))
        .with_entry(Entry::new("b", "blog").with_date(base + Duration::milliseconds(800)));

    let params: ParameterSet = vec![("from", json!("blog"))].into_iter().collect();
    let compiler = QueryCompiler::new(params, &repo, QueryContext::new("default", at(6)));
    let resolver = NavigationResolver::new(&compiler);

    let a = repo.find("a").cloned().unwrap();
    let b = repo.find("b").cloned().unwrap();
    assert_eq!(resolver.newer(&a).unwrap().ids(), vec!["b"]);
    assert_eq!(resolver.older(&b).unwrap().ids(), vec!["a"]);
    assert!(resolver.older(&a).unwrap().is_empty());
}

// =============================================================================
// Incompatible Parameter Tests
// =============================================================================

/// Pagination cannot be combined with navigation.
#[test]
fn test_paginate_rejected() {
    let err = navigate(&[("from", json!("pages")), ("paginate", json!(5))], "p02", Direction::Next)
        .unwrap_err();
    assert_eq!(err, QueryError::IncompatibleParameter("paginate".into()));
}

/// Offset cannot be combined with navigation, even when zero.
#[test]
fn test_offset_rejected() {
    let err = navigate(&[("from", json!("pages")), ("offset", json!(0))], "p02", Direction::Previous)
        .unwrap_err();
    assert_eq!(err, QueryError::IncompatibleParameter("offset".into()));
}

/// Navigation spans exactly one collection.
#[test]
fn test_multiple_collections_rejected() {
    let err = navigate(&[("from", json!("pages|blog"))], "p02", Direction::Next).unwrap_err();
    assert_eq!(err, QueryError::IncompatibleParameter("multiple collections".into()));
    assert_eq!(err.to_string(), "Navigation is not compatible with [multiple collections]");
}
