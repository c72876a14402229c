//! Normalized tag parameters
//!
//! The raw parameter bag is parsed exactly once. Well-known keys are read
//! into typed fields here; everything else stays available through
//! [`ParameterSet::get`] for the generic condition and scope stages.

use std::collections::BTreeMap;

use serde_json::Value;

use super::value::{as_bool, as_text, as_usize, split_list};

/// Keys stripped before any querying happens
pub const DEFAULT_IGNORED_PARAMS: &[&str] = &["as"];

const SITE_KEYS: &[&str] = &["site", "locale"];
const INCLUDE_KEYS: &[&str] = &["from", "in", "folder", "use", "collection"];
const EXCLUDE_KEYS: &[&str] = &["not_from", "not_in", "not_folder", "dont_use", "not_collection"];
const ORDER_KEYS: &[&str] = &["order_by", "sort"];

/// A collection handle selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `*`: every known handle
    Wildcard,
    /// Explicit handles, in the order given
    Handles(Vec<String>),
}

impl Selector {
    fn from_value(value: &Value) -> Self {
        if matches!(value, Value::String(s) if s.trim() == "*") {
            return Selector::Wildcard;
        }
        Selector::Handles(split_list(value))
    }
}

/// Parsed, immutable tag parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    params: BTreeMap<String, Value>,
    site: Option<String>,
    show_published: bool,
    show_unpublished: bool,
    show_future: Option<bool>,
    show_past: Option<bool>,
    since: Option<String>,
    until: Option<String>,
    include: Option<Selector>,
    exclude: Option<Selector>,
    order_expression: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
    paginate: Option<usize>,
    page: usize,
}

impl ParameterSet {
    /// Parses raw parameters, stripping the default ignore-list
    pub fn parse(raw: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self::parse_with_ignored(raw, DEFAULT_IGNORED_PARAMS)
    }

    /// Parses raw parameters, stripping the given keys
    pub fn parse_with_ignored<S: AsRef<str>>(
        raw: impl IntoIterator<Item = (String, Value)>,
        ignored: &[S],
    ) -> Self {
        let params: BTreeMap<String, Value> = raw
            .into_iter()
            .filter(|(key, _)| !ignored.iter().any(|i| i.as_ref() == key.as_str()))
            .collect();

        let flag = |key: &str| params.get(key).and_then(as_bool);
        let text = |key: &str| params.get(key).and_then(as_text).filter(|s| !s.is_empty());

        let site = first_present(&params, SITE_KEYS).and_then(as_text);
        let show_published = flag("show_published").unwrap_or(true);
        let show_unpublished = flag("show_unpublished").unwrap_or(false);
        let show_future = flag("show_future");
        let show_past = flag("show_past");
        let since = text("since");
        let until = text("until");
        let include = first_present(&params, INCLUDE_KEYS).map(Selector::from_value);
        let exclude = first_present(&params, EXCLUDE_KEYS).map(Selector::from_value);
        let order_expression = first_present(&params, ORDER_KEYS).and_then(as_text);
        let limit = params.get("limit").and_then(as_usize).filter(|l| *l > 0);
        let offset = params.get("offset").and_then(as_usize);
        let paginate = params.get("paginate").and_then(as_usize).filter(|p| *p > 0);
        let page = params
            .get("page")
            .and_then(as_usize)
            .filter(|p| *p > 0)
            .unwrap_or(1);

        Self {
            params,
            site,
            show_published,
            show_unpublished,
            show_future,
            show_past,
            since,
            until,
            include,
            exclude,
            order_expression,
            limit,
            offset,
            paginate,
            page,
        }
    }

    /// Returns a raw parameter value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Returns true if the key was supplied at all, whatever its value
    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterates all retained parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Explicit site selector (`site`, then `locale`)
    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    pub fn show_published(&self) -> bool {
        self.show_published
    }

    pub fn show_unpublished(&self) -> bool {
        self.show_unpublished
    }

    /// Explicit `show_future` override
    pub fn show_future(&self) -> Option<bool> {
        self.show_future
    }

    /// Explicit `show_past` override
    pub fn show_past(&self) -> Option<bool> {
        self.show_past
    }

    pub fn since(&self) -> Option<&str> {
        self.since.as_deref()
    }

    pub fn until(&self) -> Option<&str> {
        self.until.as_deref()
    }

    /// Collections to query
    pub fn include(&self) -> Option<&Selector> {
        self.include.as_ref()
    }

    /// Collections to leave out
    pub fn exclude(&self) -> Option<&Selector> {
        self.exclude.as_ref()
    }

    /// Raw ordering expression (`order_by`, then `sort`)
    pub fn order_expression(&self) -> Option<&str> {
        self.order_expression.as_deref()
    }

    /// Positive `limit`, if any
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Positive `paginate` page size, if any
    pub fn paginate(&self) -> Option<usize> {
        self.paginate
    }

    /// One-based page number, defaults to 1
    pub fn page(&self) -> usize {
        self.page
    }
}

/// First key that is present with a non-null, non-empty value
fn first_present<'a>(params: &'a BTreeMap<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| params.get(*k)).find(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

impl<K: Into<String>> FromIterator<(K, Value)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::parse(iter.into_iter().map(|(k, v)| (k.into(), v)))
    }
}
