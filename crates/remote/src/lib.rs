//! RiskGuard Remote - typed HTTP clients for the neural-net scorer and text
//! analyzer (§2, §4.3), each bound to a per-call timeout and never retried
//! beyond the idempotent-GET health probe (§5).

pub mod client;
pub mod error;
pub mod types;

pub use client::{AnalyzerKind, RemoteAnalyzerClient, DEFAULT_TIMEOUT};
pub use error::RemoteError;
pub use types::{ScoreRequest, ScoreResponse};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riskguard_core::{Amount, Transaction, TransactionType};
    use rust_decimal::Decimal;
    use serde_json::Value;

    fn tx() -> Transaction {
        Transaction {
            transaction_id: "TX-1".into(),
            user_id: "U-1".into(),
            amount: Amount::new(Decimal::new(100, 0)).unwrap(),
            transaction_type: TransactionType::Withdrawal,
            timestamp: Utc::now(),
            list_of_items: Value::Null,
            payment: None,
        }
    }

    #[test]
    fn test_default_score_is_zero() {
        assert_eq!(ScoreResponse::default().fraud_score, 0.0);
    }

    #[tokio::test]
    async fn test_unreachable_service_errors() {
        let client = RemoteAnalyzerClient::with_timeout(
            AnalyzerKind::NeuralNet,
            "http://127.0.0.1:1",
            std::time::Duration::from_millis(200),
        );
        let err = client.score(&tx()).await.unwrap_err();
        assert!(matches!(err, RemoteError::Request { .. } | RemoteError::Timeout { .. }));
    }
}
