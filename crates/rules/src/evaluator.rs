//! `RuleEvaluator` - ports `evaluate_standard_rule`/`evaluate_velocity_rule`
//! from the original `rules_policy_engine`, including its
//! warn-and-treat-as-not-triggered behavior on incomplete data or
//! incomparable types (§4.1, §9).

use chrono::Utc;
use riskguard_core::Transaction;
use riskguard_store::{AggregateOp, Filter, Store};
use serde_json::Value;

use crate::error::RuleError;
use crate::time_range::parse_time_range;
use crate::types::{Aggregation, Operator, StandardRule, VelocityRule};

pub struct RuleEvaluator;

impl RuleEvaluator {
    /// Evaluate a [`StandardRule`] against a transaction. Mirrors
    /// `evaluate_standard_rule`: a missing field, or an operator applied to
    /// incomparable types, logs a warning and is treated as not triggered
    /// rather than an error.
    pub fn eval_standard_rule(transaction: &Transaction, rule: &StandardRule) -> bool {
        let Some(field_value) = transaction.field(&rule.field) else {
            tracing::debug!(field = %rule.field, rule_id = %rule.id, "field not found on transaction");
            return false;
        };

        match rule.operator {
            Operator::Equal => field_value == rule.value,
            Operator::NotEqual => field_value != rule.value,
            Operator::GreaterThan => compare_ordered(&field_value, &rule.value, rule, |a, b| a > b),
            Operator::GreaterThanEqual => compare_ordered(&field_value, &rule.value, rule, |a, b| a >= b),
            Operator::LowerThan => compare_ordered(&field_value, &rule.value, rule, |a, b| a < b),
            Operator::LowerThanEqual => compare_ordered(&field_value, &rule.value, rule, |a, b| a <= b),
            Operator::In => membership(&field_value, &rule.value, rule, true),
            Operator::NotIn => membership(&field_value, &rule.value, rule, false),
            Operator::Contains => contains(&field_value, &rule.value),
        }
    }

    /// Evaluate a [`VelocityRule`] against a transaction by aggregating the
    /// user's transaction history in `store` over the rule's time window.
    /// Mirrors `evaluate_velocity_rule`'s strict `>` comparison against the
    /// threshold. The window is anchored at evaluation time (`Utc::now()`),
    /// not `transaction.timestamp`, matching the original's `datetime.utcnow()`
    /// reference point - a transaction scored well after it was stored still
    /// counts against the *current* window, not the window as of its own time.
    pub async fn eval_velocity_rule(
        transaction: &Transaction,
        rule: &VelocityRule,
        store: &dyn Store,
    ) -> Result<bool, RuleError> {
        let window = parse_time_range(&rule.time_range)?;
        let cutoff = Utc::now() - window;

        let filter = Filter::new()
            .eq("user_id", transaction.user_id.clone())
            .gte("timestamp", cutoff.to_rfc3339());

        let (op, field) = match rule.aggregation_function {
            Aggregation::Count => (AggregateOp::Count, None),
            Aggregation::Sum => (AggregateOp::Sum, Some(rule.field.as_str())),
            Aggregation::Average => (AggregateOp::Average, Some(rule.field.as_str())),
        };

        let aggregated_value =
            store.aggregate(riskguard_store::collections::TRANSACTIONS, &filter, field, op).await?;

        Ok(aggregated_value > rule.threshold)
    }
}

fn compare_ordered(
    field_value: &Value,
    rule_value: &Value,
    rule: &StandardRule,
    cmp: impl Fn(f64, f64) -> bool,
) -> bool {
    match (field_value.as_f64(), rule_value.as_f64()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => match (field_value.as_str(), rule_value.as_str()) {
            (Some(a), Some(b)) => cmp_str(a, b, rule, cmp),
            _ => {
                tracing::warn!(rule_id = %rule.id, "type mismatch comparing rule value to transaction field");
                false
            }
        },
    }
}

fn cmp_str(a: &str, b: &str, _rule: &StandardRule, cmp: impl Fn(f64, f64) -> bool) -> bool {
    // Strings only support equality-shaped comparisons in the original;
    // ordering a string pair falls back to lexicographic comparison so the
    // operator still means something for e.g. "2026-01-01" timestamps.
    match a.cmp(b) {
        std::cmp::Ordering::Less => cmp(0.0, 1.0),
        std::cmp::Ordering::Equal => cmp(0.0, 0.0),
        std::cmp::Ordering::Greater => cmp(1.0, 0.0),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `value` is a case-sensitive substring of `str(field)`.
fn contains(field_value: &Value, rule_value: &Value) -> bool {
    stringify(field_value).contains(&stringify(rule_value))
}

fn membership(field_value: &Value, rule_value: &Value, rule: &StandardRule, want_present: bool) -> bool {
    let Some(items) = rule_value.as_array() else {
        tracing::warn!(rule_id = %rule.id, operator = ?rule.operator, "'in'/'not_in' operator requires an array value");
        return false;
    };
    let present = items.iter().any(|item| item == field_value);
    present == want_present
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riskguard_core::{Amount, TransactionType};
    use riskguard_store::InMemoryStore;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn tx(amount: i64) -> Transaction {
        Transaction {
            transaction_id: "TX-1".into(),
            user_id: "U-1".into(),
            amount: Amount::new(Decimal::new(amount, 0)).unwrap(),
            transaction_type: TransactionType::Withdrawal,
            timestamp: Utc::now(),
            list_of_items: Value::Null,
            payment: None,
        }
    }

    fn standard(operator: Operator, value: Value) -> StandardRule {
        StandardRule {
            id: "R1".into(),
            description: "test".into(),
            risk_point: 10,
            field: "amount".into(),
            operator,
            value,
        }
    }

    #[test]
    fn test_greater_than() {
        let rule = standard(Operator::GreaterThan, json!(1000));
        assert!(RuleEvaluator::eval_standard_rule(&tx(5000), &rule));
        assert!(!RuleEvaluator::eval_standard_rule(&tx(100), &rule));
    }

    #[test]
    fn test_in_operator() {
        let mut rule = standard(Operator::In, json!(["withdrawal"]));
        rule.field = "type".into();
        assert!(RuleEvaluator::eval_standard_rule(&tx(1), &rule));
    }

    #[test]
    fn test_missing_field_not_triggered() {
        let mut rule = standard(Operator::Equal, json!(1));
        rule.field = "nonexistent".into();
        assert!(!RuleEvaluator::eval_standard_rule(&tx(1), &rule));
    }

    #[test]
    fn test_contains_operator() {
        let mut rule = standard(Operator::Contains, json!("with"));
        rule.field = "type".into();
        assert!(RuleEvaluator::eval_standard_rule(&tx(1), &rule));
        rule.value = json!("deposit");
        assert!(!RuleEvaluator::eval_standard_rule(&tx(1), &rule));
    }

    #[test]
    fn test_type_mismatch_not_triggered() {
        let rule = standard(Operator::GreaterThan, json!("not-a-number"));
        assert!(!RuleEvaluator::eval_standard_rule(&tx(100), &rule));
    }

    #[tokio::test]
    async fn test_velocity_rule_count() {
        let store = InMemoryStore::new();
        for i in 0..3 {
            store
                .insert_one(
                    riskguard_store::collections::TRANSACTIONS,
                    &format!("TX-{i}"),
                    json!({"user_id": "U-1", "timestamp": Utc::now().to_rfc3339(), "amount": 100.0}),
                )
                .await
                .unwrap();
        }

        let rule = VelocityRule {
            id: "V1".into(),
            description: "too many tx".into(),
            risk_point: 20,
            field: "*".into(),
            time_range: "1 day".into(),
            aggregation_function: Aggregation::Count,
            threshold: 2.0,
        };

        let triggered = RuleEvaluator::eval_velocity_rule(&tx(1), &rule, &store).await.unwrap();
        assert!(triggered);
    }

    #[tokio::test]
    async fn test_velocity_window_anchors_on_now_not_transaction_timestamp() {
        let store = InMemoryStore::new();
        for i in 0..3 {
            store
                .insert_one(
                    riskguard_store::collections::TRANSACTIONS,
                    &format!("TX-{i}"),
                    json!({"user_id": "U-1", "timestamp": Utc::now().to_rfc3339(), "amount": 100.0}),
                )
                .await
                .unwrap();
        }

        let rule = VelocityRule {
            id: "V1".into(),
            description: "too many tx".into(),
            risk_point: 20,
            field: "*".into(),
            time_range: "1 day".into(),
            aggregation_function: Aggregation::Count,
            threshold: 2.0,
        };

        // an old transaction, scored long after it happened (e.g. via
        // /fraud_check/{id} on a stored transaction) - if the window were
        // anchored at `transaction.timestamp` the recent history above
        // would fall outside it and this would not trigger.
        let mut old_tx = tx(1);
        old_tx.timestamp = Utc::now() - chrono::Duration::days(30);

        let triggered = RuleEvaluator::eval_velocity_rule(&old_tx, &rule, &store).await.unwrap();
        assert!(triggered);
    }
}
