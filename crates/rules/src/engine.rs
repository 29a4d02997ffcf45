//! `PolicyEngine` - ports `evaluate_policy`/`determine_risk_level` (§4.1).

use riskguard_core::{RiskBand, Transaction};
use riskguard_store::Store;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::evaluator::RuleEvaluator;
use crate::types::{Policy, Rule};

/// Outcome of evaluating one policy against one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResult {
    pub policy_id: String,
    pub risk_points: i64,
    pub triggered_rules: Vec<String>,
    pub risk_band: RiskBand,
}

pub struct PolicyEngine<'a> {
    store: &'a dyn Store,
}

impl<'a> PolicyEngine<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Evaluate every rule in `policy` against `transaction`, summing risk
    /// points for triggered rules (standard rules evaluate synchronously,
    /// velocity rules query `store`), then band the total.
    pub async fn evaluate(
        &self,
        transaction: &Transaction,
        policy: &Policy,
    ) -> Result<PolicyResult, RuleError> {
        let mut risk_points = 0i64;
        let mut triggered_rules = Vec::new();

        for rule in &policy.rules {
            let triggered = match rule {
                Rule::Standard(standard) => RuleEvaluator::eval_standard_rule(transaction, standard),
                Rule::Velocity(velocity) => {
                    match RuleEvaluator::eval_velocity_rule(transaction, velocity, self.store).await {
                        Ok(triggered) => triggered,
                        Err(e) => {
                            tracing::warn!(rule_id = %velocity.id, error = %e, "velocity rule evaluation failed, treating as not triggered");
                            false
                        }
                    }
                }
            };
            if triggered {
                risk_points += rule.risk_point();
                triggered_rules.push(rule.id().to_string());
            }
        }

        Ok(PolicyResult {
            policy_id: policy.id.clone(),
            risk_points,
            triggered_rules,
            risk_band: RiskBand::from_points(risk_points),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riskguard_core::{Amount, TransactionType};
    use riskguard_store::InMemoryStore;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};

    use crate::types::{Aggregation, Operator, StandardRule, VelocityRule};

    fn tx() -> Transaction {
        Transaction {
            transaction_id: "TX-1".into(),
            user_id: "U-1".into(),
            amount: Amount::new(Decimal::new(15_000_000, 0)).unwrap(),
            transaction_type: TransactionType::Withdrawal,
            timestamp: Utc::now(),
            list_of_items: Value::Null,
            payment: None,
        }
    }

    #[tokio::test]
    async fn test_evaluate_policy_sums_triggered_risk_points() {
        let store = InMemoryStore::new();
        let policy = Policy {
            id: "P1".into(),
            name: "basic".into(),
            description: "".into(),
            rules: vec![
                Rule::Standard(StandardRule {
                    id: "R1".into(),
                    description: "large withdrawal".into(),
                    risk_point: 60,
                    field: "amount".into(),
                    operator: Operator::GreaterThan,
                    value: json!(10_000_000),
                }),
                Rule::Standard(StandardRule {
                    id: "R2".into(),
                    description: "never triggers".into(),
                    risk_point: 1000,
                    field: "amount".into(),
                    operator: Operator::LowerThan,
                    value: json!(1),
                }),
            ],
        };

        let engine = PolicyEngine::new(&store);
        let result = engine.evaluate(&tx(), &policy).await.unwrap();
        assert_eq!(result.risk_points, 60);
        assert_eq!(result.triggered_rules, vec!["R1".to_string()]);
        assert_eq!(result.risk_band, RiskBand::Suspect);
    }

    #[tokio::test]
    async fn test_evaluate_policy_with_velocity_rule() {
        let store = InMemoryStore::new();
        for i in 0..4 {
            store
                .insert_one(
                    riskguard_store::collections::TRANSACTIONS,
                    &format!("TX-H{i}"),
                    json!({"user_id": "U-1", "timestamp": Utc::now().to_rfc3339(), "amount": 100.0}),
                )
                .await
                .unwrap();
        }

        let policy = Policy {
            id: "P2".into(),
            name: "velocity".into(),
            description: "".into(),
            rules: vec![Rule::Velocity(VelocityRule {
                id: "V1".into(),
                description: "too many tx per day".into(),
                risk_point: 50,
                field: "*".into(),
                time_range: "1 day".into(),
                aggregation_function: Aggregation::Count,
                threshold: 3.0,
            })],
        };

        let engine = PolicyEngine::new(&store);
        let result = engine.evaluate(&tx(), &policy).await.unwrap();
        assert_eq!(result.risk_points, 50);
    }

    #[tokio::test]
    async fn test_malformed_velocity_rule_does_not_abort_the_policy() {
        let store = InMemoryStore::new();
        let policy = Policy {
            id: "P3".into(),
            name: "mixed".into(),
            description: "".into(),
            rules: vec![
                Rule::Standard(StandardRule {
                    id: "R1".into(),
                    description: "large withdrawal".into(),
                    risk_point: 60,
                    field: "amount".into(),
                    operator: Operator::GreaterThan,
                    value: json!(10_000_000),
                }),
                Rule::Velocity(VelocityRule {
                    id: "V1".into(),
                    description: "bad time range".into(),
                    risk_point: 20,
                    field: "*".into(),
                    time_range: "bad".into(),
                    aggregation_function: Aggregation::Count,
                    threshold: 1.0,
                }),
            ],
        };

        let engine = PolicyEngine::new(&store);
        let result = engine.evaluate(&tx(), &policy).await.unwrap();
        assert_eq!(result.risk_points, 60);
        assert_eq!(result.triggered_rules, vec!["R1".to_string()]);
    }
}
