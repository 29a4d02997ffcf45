//! `Orchestrator` - the §4.3 fan-out coordinator. Retrieves a transaction,
//! then runs the policy engine, graph engine, neural-net client and text
//! analyzer client concurrently, each bound to an independent deadline.
//! A failed or timed-out component never fails the overall call: it
//! contributes a zero sub-score and an `errors` entry (§4.3, §7).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use riskguard_core::Transaction;
use riskguard_graph::GraphEngine;
use riskguard_remote::RemoteAnalyzerClient;
use riskguard_rules::{Policy, PolicyEngine};
use riskguard_store::{collections, Filter, Store};

use crate::error::OrchestratorError;
use crate::types::{FraudCheckResult, PolicySubResult, ScoreSubResult};

/// Proportion applied to `graph.proximity_score` before folding it into the
/// integer composite (§4.3: "SCALE is implementation-chosen but fixed per
/// release").
pub const SCALE: f64 = 100.0;

/// Independent per-component deadline (§4.3, §5).
pub const COMPONENT_TIMEOUT: Duration = Duration::from_secs(2);

pub struct Orchestrator {
    store: Arc<dyn Store>,
    graph: Arc<GraphEngine>,
    nn_client: RemoteAnalyzerClient,
    text_client: RemoteAnalyzerClient,
    component_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn Store>,
        graph: Arc<GraphEngine>,
        nn_client: RemoteAnalyzerClient,
        text_client: RemoteAnalyzerClient,
    ) -> Self {
        Self { store, graph, nn_client, text_client, component_timeout: COMPONENT_TIMEOUT }
    }

    pub fn with_component_timeout(mut self, timeout: Duration) -> Self {
        self.component_timeout = timeout;
        self
    }

    /// Evaluates `transaction` against every stored policy and sums the
    /// triggered risk points, mirroring `process_transaction`'s loop over
    /// `db.policies.find()`.
    pub async fn score_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<PolicySubResult, OrchestratorError> {
        let docs = self.store.find(collections::POLICIES, &Filter::new()).await?;
        let engine = PolicyEngine::new(self.store.as_ref());

        let mut total = PolicySubResult::default();
        for doc in docs {
            let policy: Policy = match serde_json::from_value(doc) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed policy document");
                    continue;
                }
            };
            match engine.evaluate(transaction, &policy).await {
                Ok(result) => {
                    total.risk_points += result.risk_points;
                    total.triggered_rules.extend(result.triggered_rules);
                }
                Err(e) => {
                    tracing::warn!(policy_id = %policy.id, error = %e, "policy evaluation failed, skipping");
                }
            }
        }
        Ok(total)
    }

    /// Retrieves `transaction_id` from the store and runs the full §4.3
    /// fan-out, returning a result that is always `Ok` once the transaction
    /// itself is found - component failures are captured in `errors`.
    pub async fn fraud_check(&self, transaction_id: &str) -> Result<FraudCheckResult, OrchestratorError> {
        let doc = self
            .store
            .find_one(collections::TRANSACTIONS, transaction_id)
            .await?
            .ok_or_else(|| OrchestratorError::TransactionNotFound(transaction_id.to_string()))?;
        let transaction: Transaction = serde_json::from_value(doc)?;

        let mut result = FraudCheckResult::scaffold(transaction_id, &transaction.user_id);
        let mut errors: HashMap<String, String> = HashMap::new();

        let (policy_res, graph_res, nn_res, text_res) = tokio::join!(
            self.timed("policy", self.score_transaction(&transaction)),
            self.timed("graph", self.graph.analyze(&transaction.user_id, Some(&transaction))),
            self.timed("nn", self.nn_client.score(&transaction)),
            self.timed("text", self.text_client.score(&transaction)),
        );

        match policy_res {
            Ok(p) => result.policy = p,
            Err(e) => {
                errors.insert("policy".to_string(), e);
            }
        }
        match graph_res {
            Ok(g) => result.graph = g,
            Err(e) => {
                errors.insert("graph".to_string(), e);
            }
        }
        match nn_res {
            Ok(s) => result.nn = ScoreSubResult { fraud_score: s.fraud_score },
            Err(e) => {
                errors.insert("nn".to_string(), e);
            }
        }
        match text_res {
            Ok(s) => result.text = ScoreSubResult { fraud_score: s.fraud_score },
            Err(e) => {
                errors.insert("text".to_string(), e);
            }
        }

        result.risk_points = result.policy.risk_points
            + (result.graph.proximity_score * SCALE).floor() as i64
            + result.nn.fraud_score.round() as i64
            + result.text.fraud_score.round() as i64;
        result.risk_band = riskguard_core::RiskBand::from_points(result.risk_points);
        result.errors = errors;

        Ok(result)
    }

    /// Wraps a sub-call with this orchestrator's component deadline,
    /// stringifying any error/timeout so the caller can fold it into the
    /// `errors` map without a shared error type across every component.
    async fn timed<F, T, E>(&self, component: &'static str, fut: F) -> Result<T, String>
    where
        F: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match tokio::time::timeout(self.component_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(component, error = %e, "component failed, demoting to zero");
                Err(e.to_string())
            }
            Err(_) => {
                tracing::warn!(component, timeout_ms = self.component_timeout.as_millis(), "component timed out");
                Err(format!("{component} timed out after {}ms", self.component_timeout.as_millis()))
            }
        }
    }
}
