//! Rule and policy types (§4.1), grounded on `bibank_dsl::types`'s tagged
//! enum shape but carrying the original `rules_policy_engine` field set
//! (`field`/`operator`/`value` for standard rules, `time_range`/
//! `aggregation_function`/`threshold` for velocity rules) rather than the
//! bank-specific `Condition` variants.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator for a standard rule, ported from
/// `evaluate_standard_rule`'s operator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equal,
    GreaterThan,
    GreaterThanEqual,
    LowerThan,
    LowerThanEqual,
    NotEqual,
    In,
    NotIn,
    /// Supplemented beyond `evaluate_standard_rule`: `value` is a
    /// case-sensitive substring of `str(field)`.
    Contains,
}

/// Aggregation used by a velocity rule, ported from the aggregation
/// functions `evaluate_velocity_rule` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Count,
    Sum,
    Average,
}

/// A single-field comparison against a transaction (§4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardRule {
    pub id: String,
    pub description: String,
    pub risk_point: i64,
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

/// A windowed aggregation rule over a user's transaction history (§4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityRule {
    pub id: String,
    pub description: String,
    pub risk_point: i64,
    pub field: String,
    /// e.g. "1 month", "2 week", "3 day", "12 hour"
    pub time_range: String,
    pub aggregation_function: Aggregation,
    pub threshold: f64,
}

/// Either rule kind, tagged the way `bibank_dsl::types::RuleAction` tags
/// on `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum Rule {
    Standard(StandardRule),
    Velocity(VelocityRule),
}

impl Rule {
    pub fn id(&self) -> &str {
        match self {
            Rule::Standard(r) => &r.id,
            Rule::Velocity(r) => &r.id,
        }
    }

    pub fn risk_point(&self) -> i64 {
        match self {
            Rule::Standard(r) => r.risk_point,
            Rule::Velocity(r) => r.risk_point,
        }
    }
}

/// A named collection of rules evaluated together against a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rules: Vec<Rule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_tag_roundtrip() {
        let rule = Rule::Standard(StandardRule {
            id: "R1".into(),
            description: "large amount".into(),
            risk_point: 30,
            field: "amount".into(),
            operator: Operator::GreaterThan,
            value: Value::from(1_000_000),
        });
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"rule_type\":\"standard\""));
        let parsed: Rule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id(), "R1");
        assert_eq!(parsed.risk_point(), 30);
    }
}
