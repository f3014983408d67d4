//! Evaluation of compiled queries against JSON documents, for backends that
//! search in-process.

use super::compile::{Bound, BoolQuery, MatchClause, RangeClause};
use serde_json::Value;
use std::cmp::Ordering;

impl BoolQuery {
    /// True when the document satisfies every clause.
    pub fn matches(&self, doc: &Value) -> bool {
        self.must.iter().all(|clause| clause.matches(doc))
            && self.filter.iter().all(|clause| clause.matches(doc))
    }
}

impl MatchClause {
    fn matches(&self, doc: &Value) -> bool {
        lookup(doc, &self.field).is_some_and(|found| values_match(found, &self.value))
    }
}

impl RangeClause {
    fn matches(&self, doc: &Value) -> bool {
        let Some(actual) = lookup(doc, &self.field).and_then(as_number) else {
            return false;
        };
        match &self.bound {
            Bound::GreaterThan(threshold) => {
                as_number(threshold).is_some_and(|threshold| actual > threshold)
            }
            Bound::Between { from, to } => actual >= *from as f64 && actual <= *to as f64,
        }
    }
}

/// Resolve a dotted field path such as `gps.lat`
pub(crate) fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, key| current.get(key))
}

fn values_match(found: &Value, wanted: &Value) -> bool {
    match (found, wanted) {
        (Value::Array(items), _) => items.iter().any(|item| values_match(item, wanted)),
        (Value::String(a), Value::String(b)) => a.to_lowercase() == b.to_lowercase(),
        (Value::Number(_), _) | (_, Value::Number(_)) => {
            matches!((as_number(found), as_number(wanted)), (Some(a), Some(b)) if a == b)
        }
        _ => found == wanted,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Ordering used for sorted in-process searches. Missing values sort last.
pub(crate) fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => value_text(a).cmp(&value_text(b)),
        },
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string(),
    }
}
