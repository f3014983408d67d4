use super::FilterSpec;
use serde_json::{json, Map, Value};

/// Equality clause; every one of them must match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchClause {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// Strictly greater than the threshold
    GreaterThan(Value),
    /// Inclusive on both ends
    Between { from: i64, to: i64 },
}

/// Non-scoring filter on a numeric field
#[derive(Debug, Clone, PartialEq)]
pub struct RangeClause {
    pub field: String,
    pub bound: Bound,
}

/// Conjunctive boolean query: `must` holds match clauses, `filter` holds
/// range clauses.
///
/// A query with both lists empty matches every document. Backends must honor
/// that explicitly rather than rely on their own empty-bool semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<MatchClause>,
    pub filter: Vec<RangeClause>,
}

/// Compile a filter specification into a query tree.
///
/// Field names are forwarded untouched; an unknown field only fails when the
/// backend executes the query.
pub fn compile(spec: &FilterSpec) -> BoolQuery {
    let must = spec
        .equals
        .iter()
        .map(|eq| MatchClause {
            field: eq.field.clone(),
            value: eq.value.clone(),
        })
        .collect();

    let greater_than = spec.greater_than.iter().map(|gt| RangeClause {
        field: gt.field.clone(),
        bound: Bound::GreaterThan(gt.value.clone()),
    });
    let ranges = spec.range.iter().map(|range| RangeClause {
        field: range.field.clone(),
        bound: Bound::Between {
            from: range.from,
            to: range.to,
        },
    });

    BoolQuery {
        must,
        filter: greater_than.chain(ranges).collect(),
    }
}

impl BoolQuery {
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Single equality query, used for status and translation lookups
    pub fn matching(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::match_all().and_match(field, value)
    }

    pub fn and_match(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.must.push(MatchClause {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn is_match_all(&self) -> bool {
        self.must.is_empty() && self.filter.is_empty()
    }

    /// Render as search-backend query DSL
    pub fn to_dsl(&self) -> Value {
        if self.is_match_all() {
            return json!({ "match_all": {} });
        }

        let must: Vec<Value> = self
            .must
            .iter()
            .map(|clause| json!({ "match": { clause.field.clone(): { "query": clause.value } } }))
            .collect();

        let filter: Vec<Value> = self
            .filter
            .iter()
            .map(|clause| {
                let bounds = match &clause.bound {
                    Bound::GreaterThan(threshold) => json!({ "gt": threshold }),
                    Bound::Between { from, to } => json!({ "gte": from, "lte": to }),
                };
                json!({ "range": { clause.field.clone(): bounds } })
            })
            .collect();

        let mut bool_query = Map::new();
        if !must.is_empty() {
            bool_query.insert("must".to_string(), Value::Array(must));
        }
        if !filter.is_empty() {
            bool_query.insert("filter".to_string(), Value::Array(filter));
        }
        json!({ "bool": bool_query })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equals_become_must_and_bounds_become_filters() {
        let spec = FilterSpec::new()
            .equals("city", "Erbil")
            .equals("category", "house")
            .greater_than("price", 100_000)
            .range("rooms", 2, 4);

        let query = compile(&spec);

        assert_eq!(query.must.len(), 2);
        assert_eq!(query.must[1].field, "category");
        assert_eq!(
            query.filter,
            vec![
                RangeClause {
                    field: "price".to_string(),
                    bound: Bound::GreaterThan(json!(100_000)),
                },
                RangeClause {
                    field: "rooms".to_string(),
                    bound: Bound::Between { from: 2, to: 4 },
                },
            ]
        );
    }

    #[test]
    fn empty_spec_compiles_to_explicit_match_all() {
        let query = compile(&FilterSpec::new());
        assert!(query.must.is_empty());
        assert!(query.filter.is_empty());
        assert!(query.is_match_all());
        assert_eq!(query.to_dsl(), json!({ "match_all": {} }));
    }

    #[test]
    fn dsl_uses_strict_gt_and_inclusive_range() {
        let dsl = compile(
            &FilterSpec::new()
                .equals("status", "active")
                .greater_than("price", 10)
                .range("area", 10, 20),
        )
        .to_dsl();

        assert_eq!(
            dsl,
            json!({
                "bool": {
                    "must": [{ "match": { "status": { "query": "active" } } }],
                    "filter": [
                        { "range": { "price": { "gt": 10 } } },
                        { "range": { "area": { "gte": 10, "lte": 20 } } }
                    ]
                }
            })
        );
    }

    #[test]
    fn unknown_fields_pass_through() {
        let query = compile(&FilterSpec::new().equals("no.such.field", 1));
        assert_eq!(query.must[0].field, "no.such.field");
    }
}
