//! Aggregated result of a `fraud_check` call (§4.3).

use std::collections::HashMap;

use riskguard_core::RiskBand;
use riskguard_graph::AnalyzeResult;
use serde::{Deserialize, Serialize};

/// The policy engine's contribution, summed across every stored policy
/// (mirrors `process_transaction`'s `total_risk_points` loop).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySubResult {
    pub risk_points: i64,
    pub triggered_rules: Vec<String>,
}

/// The neural-net / text-analyzer contribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreSubResult {
    pub fraud_score: f64,
}

fn empty_graph_result(user_id: &str) -> AnalyzeResult {
    AnalyzeResult {
        user_id: user_id.to_string(),
        proximity_score: 0.0,
        shortest_path_length_to_fraudster: None,
        closest_fraudster: None,
        linked_fraud_count: 0,
        total_linked_nodes: 0,
        triggered_rules: Vec::new(),
    }
}

/// Result of `Orchestrator::fraud_check` (§4.3). A failed component never
/// fails the call: its sub-result is zeroed and its name appears in
/// `errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudCheckResult {
    pub transaction_id: String,
    pub risk_points: i64,
    pub risk_band: RiskBand,
    pub policy: PolicySubResult,
    pub graph: AnalyzeResult,
    pub nn: ScoreSubResult,
    pub text: ScoreSubResult,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub errors: HashMap<String, String>,
}

impl FraudCheckResult {
    pub(crate) fn scaffold(transaction_id: &str, user_id: &str) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            risk_points: 0,
            risk_band: RiskBand::Normal,
            policy: PolicySubResult::default(),
            graph: empty_graph_result(user_id),
            nn: ScoreSubResult::default(),
            text: ScoreSubResult::default(),
            errors: HashMap::new(),
        }
    }
}
