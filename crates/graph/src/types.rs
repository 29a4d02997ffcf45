//! Graph domain types (§3, §4.2): `GraphRule`, `Link`, `Cluster`, and the
//! `analyze` response. Grounded on `graph_service`'s `models.py` field set.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphOperator {
    Equal,
    GreaterThan,
    LowerThan,
    Contains,
}

/// `(field1, operator, field2 | value)`, compared either pairwise between
/// two users (`field2` present) or against a single document (`value`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphRule {
    pub graph_rule_id: String,
    pub name: String,
    pub description: String,
    pub field1: String,
    pub operator: GraphOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl GraphRule {
    /// Pairwise application (`apply_graph_rule`): `field1` on `left`
    /// against `field2` on `right` if configured, else the literal `value`.
    pub fn matches_pair(&self, left: Option<&Value>, right: Option<&Value>) -> bool {
        let Some(left) = left else { return false };
        let rhs = if self.field2.is_some() { right } else { self.value.as_ref() };
        let Some(rhs) = rhs else { return false };
        apply_operator(self.operator, left, rhs)
    }

    /// Single-document application (`apply_graph_rule_single`): `field1`
    /// on `doc` against the literal `value`.
    pub fn matches_single(&self, field1_value: Option<&Value>) -> bool {
        let (Some(field1_value), Some(value)) = (field1_value, self.value.as_ref()) else {
            return false;
        };
        apply_operator(self.operator, field1_value, value)
    }
}

fn apply_operator(operator: GraphOperator, a: &Value, b: &Value) -> bool {
    match operator {
        GraphOperator::Equal => stringify(a) == stringify(b),
        GraphOperator::GreaterThan => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        },
        GraphOperator::LowerThan => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        },
        GraphOperator::Contains => stringify(a).contains(&stringify(b)),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub weight: f64,
    #[serde(rename = "type")]
    pub link_type: String,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub rule_ids: Vec<String>,
}

impl Link {
    /// Canonical (source, target) ordering so `(a,b)` and `(b,a)` key the
    /// same unordered pair, matching the §3 "no parallel edges" invariant.
    pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
        if a <= b { (a.to_string(), b.to_string()) } else { (b.to_string(), a.to_string()) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: String,
    pub members: Vec<String>,
}

/// Output of `analyze(user_id)` (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub user_id: String,
    pub proximity_score: f64,
    /// `None` stands in for the original's `"No path"` sentinel.
    pub shortest_path_length_to_fraudster: Option<u32>,
    pub closest_fraudster: Option<String>,
    pub linked_fraud_count: u32,
    pub total_linked_nodes: u32,
    pub triggered_rules: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(field2: Option<&str>, value: Option<Value>, op: GraphOperator) -> GraphRule {
        GraphRule {
            graph_rule_id: "GR1".into(),
            name: "test".into(),
            description: "".into(),
            field1: "address_zip".into(),
            operator: op,
            field2: field2.map(String::from),
            value,
        }
    }

    #[test]
    fn test_matches_pair_equal() {
        let r = rule(Some("address_zip"), None, GraphOperator::Equal);
        assert!(r.matches_pair(Some(&json!("40123")), Some(&json!("40123"))));
        assert!(!r.matches_pair(Some(&json!("40123")), Some(&json!("40124"))));
    }

    #[test]
    fn test_matches_single_contains() {
        let r = rule(None, Some(json!("gmail")), GraphOperator::Contains);
        assert!(r.matches_single(Some(&json!("user@gmail.com"))));
        assert!(!r.matches_single(Some(&json!("user@yahoo.com"))));
    }

    #[test]
    fn test_matches_pair_missing_value_false() {
        let r = rule(None, None, GraphOperator::Equal);
        assert!(!r.matches_pair(Some(&json!("x")), None));
    }
}
