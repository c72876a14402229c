//! Entry query structures
//!
//! Defines the composed, not-yet-executed query the compiler produces and
//! the repository consumes.

use std::fmt;

use serde_json::Value;

/// Filter operation types
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Equality: field = value
    Eq(Value),
    /// Inequality: field != value
    Ne(Value),
    /// Greater than: field > value
    Gt(Value),
    /// Greater than or equal: field >= value
    Gte(Value),
    /// Less than: field < value
    Lt(Value),
    /// Less than or equal: field <= value
    Lte(Value),
    /// SQL-style pattern with `%` and `_` wildcards, case-insensitive
    Like(String),
    /// Negated `Like`
    NotLike(String),
    /// Regular expression match
    Regex(String),
    /// Negated `Regex`
    NotRegex(String),
    /// Membership: field in values
    In(Vec<Value>),
    /// Non-membership: field not in values
    NotIn(Vec<Value>),
    /// Field is missing or null
    Null,
    /// Field is present and not null
    NotNull,
}

impl FilterOp {
    /// Returns the operator symbol for explain output
    pub fn op_name(&self) -> &'static str {
        match self {
            FilterOp::Eq(_) => "=",
            FilterOp::Ne(_) => "!=",
            FilterOp::Gt(_) => ">",
            FilterOp::Gte(_) => ">=",
            FilterOp::Lt(_) => "<",
            FilterOp::Lte(_) => "<=",
            FilterOp::Like(_) => "like",
            FilterOp::NotLike(_) => "not like",
            FilterOp::Regex(_) => "regexp",
            FilterOp::NotRegex(_) => "not regexp",
            FilterOp::In(_) => "in",
            FilterOp::NotIn(_) => "not in",
            FilterOp::Null => "is null",
            FilterOp::NotNull => "is not null",
        }
    }
}

/// A single row-level predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Comparison on a named field
    Field { field: String, op: FilterOp },
    /// Entry carries the qualified taxonomy term (`taxonomy::term`)
    Taxonomy(String),
    /// Entry carries at least one of the qualified taxonomy terms
    TaxonomyIn(Vec<String>),
}

impl Predicate {
    /// Create a field predicate
    pub fn field(field: impl Into<String>, op: FilterOp) -> Self {
        Predicate::Field {
            field: field.into(),
            op,
        }
    }

    /// Create an equality predicate
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::field(field, FilterOp::Eq(value))
    }

    /// Create a strict greater-than predicate
    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self::field(field, FilterOp::Gt(value))
    }

    /// Create a strict less-than predicate
    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self::field(field, FilterOp::Lt(value))
    }

    /// Create a membership predicate
    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::field(field, FilterOp::In(values))
    }

    /// Returns the field name for field predicates
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Predicate::Field { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Field { field, op } => match op {
                FilterOp::Eq(v)
                | FilterOp::Ne(v)
                | FilterOp::Gt(v)
                | FilterOp::Gte(v)
                | FilterOp::Lt(v)
                | FilterOp::Lte(v) => write!(f, "{} {} {}", field, op.op_name(), v),
                FilterOp::Like(p)
                | FilterOp::NotLike(p)
                | FilterOp::Regex(p)
                | FilterOp::NotRegex(p) => write!(f, "{} {} {:?}", field, op.op_name(), p),
                FilterOp::In(vs) | FilterOp::NotIn(vs) => {
                    write!(f, "{} {} {}", field, op.op_name(), Value::Array(vs.clone()))
                }
                FilterOp::Null | FilterOp::NotNull => write!(f, "{} {}", field, op.op_name()),
            },
            Predicate::Taxonomy(term) => write!(f, "taxonomy has {}", term),
            Predicate::TaxonomyIn(terms) => write!(f, "taxonomy has any of [{}]", terms.join(", ")),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Parses `asc`/`desc`, case-insensitive
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// A (field, direction) ordering pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

/// Composed entry query.
///
/// Predicates are combined with AND, in the order they were added. Order-bys
/// are applied in sequence, the first being primary. Limit and offset are
/// only attached when results are materialized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryQuery {
    /// Collections the query is restricted to
    pub collections: Vec<String>,
    /// Row-level predicates (AND)
    pub predicates: Vec<Predicate>,
    /// Ordering, primary first
    pub order_bys: Vec<OrderBy>,
    /// Maximum rows to return
    pub limit: Option<usize>,
    /// Rows to skip before the limit applies
    pub offset: usize,
}

impl EntryQuery {
    /// Creates a query restricted to `collection ∈ handles`
    pub fn for_collections(handles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            collections: handles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Adds a predicate
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Adds a field comparison
    pub fn where_field(self, field: impl Into<String>, op: FilterOp) -> Self {
        self.with_predicate(Predicate::field(field, op))
    }

    /// Adds a membership predicate
    pub fn where_in(self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.with_predicate(Predicate::is_in(field, values))
    }

    /// Requires a single qualified taxonomy term
    pub fn where_taxonomy(self, term: impl Into<String>) -> Self {
        self.with_predicate(Predicate::Taxonomy(term.into()))
    }

    /// Requires any of the qualified taxonomy terms
    pub fn where_taxonomy_in(self, terms: Vec<String>) -> Self {
        self.with_predicate(Predicate::TaxonomyIn(terms))
    }

    /// Appends an ordering
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_bys.push(order);
        self
    }

    /// Sets the limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the predicates on a given field
    pub fn predicates_on<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Predicate> {
        self.predicates
            .iter()
            .filter(move |p| p.field_name() == Some(field))
    }
}
