//! Content entries

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::planner::dates::date_value;

fn default_site() -> String {
    "default".to_string()
}

fn default_published() -> bool {
    true
}

/// A single content entry.
///
/// Built-in fields (`id`, `collection`, `site`, `published`, `date`,
/// `order`, `title`) shadow data fields of the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub collection: String,
    #[serde(default = "default_site")]
    pub site: String,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub title: String,
    /// Qualified terms, `taxonomy::term`
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub taxonomies: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl Entry {
    pub fn new(id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collection: collection.into(),
            site: default_site(),
            published: true,
            date: None,
            order: None,
            title: String::new(),
            taxonomies: BTreeSet::new(),
            data: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Attaches a qualified taxonomy term
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.taxonomies.insert(term.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.data.insert(field.into(), value);
        self
    }

    /// Looks up a field by name. Dates come back as RFC 3339 strings.
    pub fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::String(self.id.clone())),
            "collection" => Some(Value::String(self.collection.clone())),
            "site" => Some(Value::String(self.site.clone())),
            "published" => Some(Value::Bool(self.published)),
            "date" => self.date.map(date_value),
            "order" => self.order.map(Value::from),
            "title" => Some(Value::String(self.title.clone())),
            _ => self.data.get(field).cloned(),
        }
    }

    pub fn has_term(&self, term: &str) -> bool {
        self.taxonomies.contains(term)
    }
}
