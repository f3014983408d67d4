mod compile;
pub(crate) mod matcher;

pub use compile::{compile, Bound, BoolQuery, MatchClause, RangeClause};

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field/value pair used by equality and greater-than clauses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    pub field: String,
    pub value: Value,
}

/// Inclusive numeric range on one field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRange {
    pub field: String,
    pub from: i64,
    pub to: i64,
}

/// Declarative search filter supplied by callers.
///
/// All clauses combine conjunctively; there is no OR and no nesting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterSpec {
    pub equals: Vec<FieldValue>,
    #[serde(rename = "gt")]
    pub greater_than: Vec<FieldValue>,
    pub range: Vec<FieldRange>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON body of a search request
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| CatalogError::validation(format!("invalid filter: {}", e)))
    }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.push(FieldValue {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn greater_than(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.greater_than.push(FieldValue {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn range(mut self, field: impl Into<String>, from: i64, to: i64) -> Self {
        self.range.push(FieldRange {
            field: field.into(),
            from,
            to,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty() && self.greater_than.is_empty() && self.range.is_empty()
    }
}
