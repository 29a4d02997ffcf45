//! Wire shapes for the two remote analyzers (§2, §4.3). Both the neural-net
//! scorer and the text analyzer are posted the transaction and return a
//! `fraud_score`; a missing/invalid score is treated as absent by the
//! orchestrator, never as a crash.

use riskguard_core::Transaction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRequest<'a> {
    #[serde(flatten)]
    pub transaction: &'a Transaction,
}

impl<'a> ScoreRequest<'a> {
    pub fn new(transaction: &'a Transaction) -> Self {
        Self { transaction }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResponse {
    pub fraud_score: f64,
}

impl Default for ScoreResponse {
    /// The zero sub-score an orchestrator falls back to when a remote
    /// analyzer is unavailable (§4.3, §7).
    fn default() -> Self {
        Self { fraud_score: 0.0 }
    }
}
