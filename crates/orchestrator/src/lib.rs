//! RiskGuard Orchestrator - the §4.3 fan-out coordinator: policy engine,
//! graph engine, neural-net client and text-analyzer client run
//! concurrently, each under its own deadline, and are combined into a
//! single risk verdict that never fails on a degraded dependency.

pub mod engine;
pub mod error;
pub mod types;

pub use engine::{Orchestrator, COMPONENT_TIMEOUT, SCALE};
pub use error::OrchestratorError;
pub use types::{FraudCheckResult, PolicySubResult, ScoreSubResult};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riskguard_core::{Amount, Transaction, TransactionType, User};
    use riskguard_graph::GraphEngine;
    use riskguard_remote::{AnalyzerKind, RemoteAnalyzerClient};
    use riskguard_rules::{Aggregation, Operator, Policy, Rule, StandardRule, VelocityRule};
    use riskguard_store::{collections, InMemoryStore, Store};
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn tx(id: &str, user_id: &str, amount: i64) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            user_id: user_id.to_string(),
            amount: Amount::new(Decimal::new(amount, 0)).unwrap(),
            transaction_type: TransactionType::Withdrawal,
            timestamp: Utc::now(),
            list_of_items: Value::Null,
            payment: None,
        }
    }

    async fn setup() -> (Arc<dyn Store>, Arc<GraphEngine>) {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let graph = Arc::new(GraphEngine::new(store.clone()));
        graph.initialize().await.unwrap();
        graph
            .create_user(User {
                user_id: "U-1".into(),
                full_name: "Alice".into(),
                email: "alice@example.com".into(),
                email_domain: String::new(),
                phone: "0812".into(),
                address_zip: "40123".into(),
                address_city: "Bandung".into(),
                address_province: "Jawa Barat".into(),
                address_kecamatan: "Coblong".into(),
                is_fraud: false,
            })
            .await
            .unwrap();
        (store, graph)
    }

    #[tokio::test]
    async fn test_fraud_check_missing_transaction_errors() {
        let (store, graph) = setup().await;
        let orchestrator = Orchestrator::new(
            store,
            graph,
            RemoteAnalyzerClient::new(AnalyzerKind::NeuralNet, "http://127.0.0.1:1"),
            RemoteAnalyzerClient::new(AnalyzerKind::TextAnalyzer, "http://127.0.0.1:1"),
        );
        let err = orchestrator.fraud_check("TX-missing").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::TransactionNotFound(_)));
    }

    #[tokio::test]
    async fn test_fraud_check_degrades_on_remote_failure() {
        let (store, graph) = setup().await;
        let transaction = tx("TX-1", "U-1", 100);
        store
            .insert_one(
                collections::TRANSACTIONS,
                "TX-1",
                serde_json::to_value(&transaction).unwrap(),
            )
            .await
            .unwrap();

        let orchestrator = Orchestrator::new(
            store,
            graph,
            RemoteAnalyzerClient::with_timeout(
                AnalyzerKind::NeuralNet,
                "http://127.0.0.1:1",
                Duration::from_millis(100),
            ),
            RemoteAnalyzerClient::with_timeout(
                AnalyzerKind::TextAnalyzer,
                "http://127.0.0.1:1",
                Duration::from_millis(100),
            ),
        )
        .with_component_timeout(Duration::from_millis(200));

        let result = orchestrator.fraud_check("TX-1").await.unwrap();
        assert!(result.errors.contains_key("nn"));
        assert!(result.errors.contains_key("text"));
        assert_eq!(result.nn.fraud_score, 0.0);
        assert_eq!(result.text.fraud_score, 0.0);
        assert_eq!(result.risk_band, riskguard_core::RiskBand::Normal);
    }

    #[tokio::test]
    async fn test_score_transaction_sums_all_policies() {
        let (store, graph) = setup().await;
        let policies = vec![
            Policy {
                id: "P1".into(),
                name: "amount".into(),
                description: "".into(),
                rules: vec![Rule::Standard(StandardRule {
                    id: "R1".into(),
                    description: "large amount".into(),
                    risk_point: 30,
                    field: "amount".into(),
                    operator: Operator::GreaterThan,
                    value: json!(50),
                })],
            },
            Policy {
                id: "P2".into(),
                name: "velocity".into(),
                description: "".into(),
                rules: vec![Rule::Velocity(VelocityRule {
                    id: "V1".into(),
                    description: "never triggers".into(),
                    risk_point: 1000,
                    field: "*".into(),
                    time_range: "1 day".into(),
                    aggregation_function: Aggregation::Count,
                    threshold: 10_000.0,
                })],
            },
        ];
        for policy in &policies {
            store
                .insert_one(collections::POLICIES, &policy.id, serde_json::to_value(policy).unwrap())
                .await
                .unwrap();
        }

        let orchestrator = Orchestrator::new(
            store,
            graph,
            RemoteAnalyzerClient::new(AnalyzerKind::NeuralNet, "http://127.0.0.1:1"),
            RemoteAnalyzerClient::new(AnalyzerKind::TextAnalyzer, "http://127.0.0.1:1"),
        );
        let result = orchestrator.score_transaction(&tx("TX-2", "U-1", 100)).await.unwrap();
        assert_eq!(result.risk_points, 30);
        assert_eq!(result.triggered_rules, vec!["R1".to_string()]);
    }
}
