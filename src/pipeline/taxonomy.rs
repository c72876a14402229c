//! Taxonomy filtering
//!
//! Parameters look like `taxonomy:tags="rust|wasm"` or
//! `taxonomy:tags:all="rust|wasm"`. Bare terms are qualified with the
//! taxonomy handle (`tags::rust`); already-qualified terms are kept as is.

use crate::params::value::split_list;
use crate::planner::{EntryQuery, QueryError, QueryResult};

use super::stage::{Compiled, QueryStage, StageInput};

const PREFIX: &str = "taxonomy";

/// How a term list combines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyModifier {
    /// At least one term attached
    Any,
    /// Every term attached
    All,
}

impl TaxonomyModifier {
    fn parse(raw: &str) -> QueryResult<Self> {
        match raw {
            "any" => Ok(TaxonomyModifier::Any),
            "all" => Ok(TaxonomyModifier::All),
            other => Err(QueryError::InvalidTaxonomyModifier(other.to_string())),
        }
    }
}

/// One parsed taxonomy parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyFilter {
    pub taxonomy: String,
    pub terms: Vec<String>,
    pub modifier: TaxonomyModifier,
}

impl TaxonomyFilter {
    /// Parses a `taxonomy[:handle[:modifier]]` key and its value.
    ///
    /// Returns `None` for keys that are not taxonomy parameters.
    pub fn parse(key: &str, value: &serde_json::Value) -> Option<QueryResult<Self>> {
        let rest = key.strip_prefix(PREFIX)?;
        let rest = match rest {
            "" => "",
            _ => rest.strip_prefix(':')?,
        };

        let mut parts = rest.split(':');
        let taxonomy = parts.next().unwrap_or_default().to_string();
        let modifier = match TaxonomyModifier::parse(parts.next().unwrap_or("any")) {
            Ok(modifier) => modifier,
            Err(err) => return Some(Err(err)),
        };

        let terms = split_list(value)
            .into_iter()
            .map(|term| qualify(&taxonomy, term))
            .collect();

        Some(Ok(Self {
            taxonomy,
            terms,
            modifier,
        }))
    }

    fn apply(self, query: EntryQuery) -> EntryQuery {
        if self.terms.is_empty() {
            return query;
        }
        match self.modifier {
            TaxonomyModifier::All => self
                .terms
                .into_iter()
                .fold(query, |query, term| query.where_taxonomy(term)),
            TaxonomyModifier::Any => query.where_taxonomy_in(self.terms),
        }
    }
}

fn qualify(taxonomy: &str, term: String) -> String {
    if term.contains("::") || taxonomy.is_empty() {
        term
    } else {
        format!("{}::{}", taxonomy, term)
    }
}

/// Adds taxonomy predicates for every `taxonomy` / `taxonomy:*` parameter
pub struct TaxonomyStage;

impl QueryStage for TaxonomyStage {
    fn name(&self) -> &'static str {
        "taxonomy"
    }

    fn apply(&self, mut query: EntryQuery, input: &StageInput<'_>) -> QueryResult<Compiled> {
        for (key, value) in input.params.iter() {
            if let Some(filter) = TaxonomyFilter::parse(key, value) {
                query = filter?.apply(query);
            }
        }
        Ok(Compiled::Query(query))
    }
}
