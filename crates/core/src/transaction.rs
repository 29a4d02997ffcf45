//! Transaction - the unit the whole pipeline scores
//!
//! Owned read-only by the core (§3): transactions are written by an
//! external submission path and only ever read here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// Transaction category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scored transaction.
///
/// `list_of_items` and `payment` are carried through as opaque JSON: the
/// original source never has the scoring logic inspect them (§9 open
/// questions), so they are pass-through fields here too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub user_id: String,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub list_of_items: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<serde_json::Value>,
}

impl Transaction {
    /// Look up a field on the transaction document by name, the way the
    /// rule evaluator needs to (§4.1 standard rules key on an arbitrary
    /// `field`). Only the fields a rule can plausibly reference are
    /// exposed; `list_of_items`/`payment` are intentionally not addressable
    /// field-by-field here since they are opaque pass-through.
    pub fn field(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "transaction_id" => Some(serde_json::Value::String(self.transaction_id.clone())),
            "user_id" => Some(serde_json::Value::String(self.user_id.clone())),
            // `Decimal`'s own `Serialize` impl renders as a JSON string (the
            // wire format `Amount` uses); rule comparisons need a JSON
            // number instead, so convert explicitly rather than reuse it.
            "amount" => self
                .amount
                .value()
                .to_string()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(serde_json::Value::Number),
            "type" => Some(serde_json::Value::String(self.transaction_type.as_str().to_string())),
            "timestamp" => Some(serde_json::Value::String(self.timestamp.to_rfc3339())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample() -> Transaction {
        Transaction {
            transaction_id: "TX-1".into(),
            user_id: "U-1".into(),
            amount: Amount::new(Decimal::new(600, 0)).unwrap(),
            transaction_type: TransactionType::Deposit,
            timestamp: Utc::now(),
            list_of_items: serde_json::Value::Null,
            payment: None,
        }
    }

    #[test]
    fn test_field_lookup() {
        let tx = sample();
        assert_eq!(tx.field("user_id"), Some(serde_json::Value::String("U-1".into())));
        assert_eq!(tx.field("type"), Some(serde_json::Value::String("deposit".into())));
        assert!(tx.field("nonexistent").is_none());
    }

    #[test]
    fn test_transaction_type_display() {
        assert_eq!(TransactionType::Transfer.to_string(), "transfer");
    }

    #[test]
    fn test_serde_roundtrip() {
        let tx = sample();
        let json = serde_json::to_string(&tx).unwrap();
        let parsed: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.transaction_id, tx.transaction_id);
    }
}
