//! Document-store value types: stored documents and equality/order queries.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::result::AppResult;
use crate::types::sorting::{SortDirection, SortField};

/// A schemaless document body.
pub type Document = Map<String, Value>;

/// A document together with the key it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Opaque document key, unique within its collection.
    pub key: String,
    /// Document body.
    pub data: Document,
}

impl StoredDocument {
    /// Create a stored document.
    pub fn new(key: impl Into<String>, data: Document) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }

    /// Look up a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Deserialize the body into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }
}

/// Equality predicate on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Field name.
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

/// A collection query: equality filters, optional ordering, optional limit.
///
/// Documents lacking the `order_by` field are excluded from ordered results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    /// Collection to query.
    pub collection: String,
    /// All filters must hold.
    pub filters: Vec<Filter>,
    /// Result ordering.
    pub order_by: Option<SortField>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl Query {
    /// Start a query over a collection.
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            ..Self::default()
        }
    }

    /// Add an equality filter.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Order results.
    pub fn order_by(mut self, sort: SortField) -> Self {
        self.order_by = Some(sort);
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a document satisfies the filters (and has the order field).
    pub fn matches(&self, data: &Document) -> bool {
        if let Some(sort) = &self.order_by {
            if !data.contains_key(&sort.field) {
                return false;
            }
        }
        self.filters
            .iter()
            .all(|f| data.get(&f.field) == Some(&f.value))
    }

    /// Filter, order, and limit a set of documents.
    pub fn apply(&self, docs: impl IntoIterator<Item = StoredDocument>) -> Vec<StoredDocument> {
        let mut out: Vec<StoredDocument> = docs.into_iter().filter(|d| self.matches(&d.data)).collect();

        if let Some(sort) = &self.order_by {
            out.sort_by(|a, b| {
                let ord = compare_values(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

/// Total order over the JSON values used as sort keys.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
