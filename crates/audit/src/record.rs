//! One append-only audit entry: a `fraud_check` verdict plus when it ran.

use chrono::{DateTime, Utc};
use riskguard_orchestrator::FraudCheckResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub recorded_at: DateTime<Utc>,
    pub result: FraudCheckResult,
}

impl AuditRecord {
    pub fn new(recorded_at: DateTime<Utc>, result: FraudCheckResult) -> Self {
        Self { recorded_at, result }
    }
}
