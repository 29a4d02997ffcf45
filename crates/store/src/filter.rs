//! A tiny query filter so `Store` implementations stay storage-agnostic.
//!
//! Grounded on the `match`/`group` shape the original `evaluate_velocity_rule`
//! builds for its MongoDB aggregation pipeline: equality on `user_id`, a
//! `>=` bound on `timestamp`, nothing fancier.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gte,
    Lte,
    Gt,
    Lt,
}

#[derive(Debug, Clone)]
pub struct FilterClause {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

/// A conjunction of field clauses, evaluated against a document's top-level
/// keys. Documents are whatever `serde_json::to_value` produced for the
/// domain type, so field names match the Rust struct's serde names.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub clauses: Vec<FilterClause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        self.clauses.push(FilterClause { field: field.into(), op, value: value.into() });
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Eq, value)
    }

    pub fn ne(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Ne, value)
    }

    pub fn gte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Gte, value)
    }

    pub fn lte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Lte, value)
    }

    pub fn gt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Gt, value)
    }

    pub fn lt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Lt, value)
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses.iter().all(|clause| {
            let Some(field_value) = doc.get(&clause.field) else { return false };
            compare(field_value, clause.op, &clause.value)
        })
    }
}

fn compare(lhs: &Value, op: FilterOp, rhs: &Value) -> bool {
    match op {
        FilterOp::Eq => lhs == rhs,
        FilterOp::Ne => lhs != rhs,
        _ => match (as_f64(lhs), as_f64(rhs)) {
            (Some(a), Some(b)) => match op {
                FilterOp::Gte => a >= b,
                FilterOp::Lte => a <= b,
                FilterOp::Gt => a > b,
                FilterOp::Lt => a < b,
                FilterOp::Eq | FilterOp::Ne => unreachable!(),
            },
            _ => match (lhs.as_str(), rhs.as_str()) {
                (Some(a), Some(b)) => match op {
                    FilterOp::Gte => a >= b,
                    FilterOp::Lte => a <= b,
                    FilterOp::Gt => a > b,
                    FilterOp::Lt => a < b,
                    FilterOp::Eq | FilterOp::Ne => unreachable!(),
                },
                _ => false,
            },
        },
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    value_as_f64(value)
}

/// Coerces a JSON value to `f64`, accepting both a bare number and a
/// numeric string (e.g. a decimal amount serialized as a string). Shared by
/// `Filter::matches` and every `Store::aggregate` implementation.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    value.as_f64().or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// Aggregation kind for `Store::aggregate`, mirroring the original
/// `evaluate_velocity_rule`'s `count`/`sum`/`average` group operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Count,
    Sum,
    Average,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_and_gte() {
        let doc = json!({"user_id": "U-1", "timestamp": "2026-07-28T10:00:00Z", "amount": 500});
        let filter = Filter::new().eq("user_id", "U-1").gte("amount", 100);
        assert!(filter.matches(&doc));

        let filter = Filter::new().eq("user_id", "U-2");
        assert!(!filter.matches(&doc));
    }

    #[test]
    fn test_string_ordering_for_rfc3339_timestamps() {
        let doc = json!({"timestamp": "2026-07-28T10:00:00Z"});
        let filter = Filter::new().gte("timestamp", "2026-07-01T00:00:00Z");
        assert!(filter.matches(&doc));
        let filter = Filter::new().gte("timestamp", "2026-08-01T00:00:00Z");
        assert!(!filter.matches(&doc));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let doc = json!({"user_id": "U-1"});
        let filter = Filter::new().eq("missing", "x");
        assert!(!filter.matches(&doc));
    }
}
