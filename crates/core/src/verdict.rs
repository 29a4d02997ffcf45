//! Verdict banding (§4.1/§4.3)
//!
//! `determine_risk_level` in the original `rules_policy_engine/services.py`
//! applies two fixed thresholds; ported verbatim as `RiskBand::from_points`.

use serde::{Deserialize, Serialize};

const RISK_SUSPECT_THRESHOLD: i64 = 70;
const RISK_FRAUD_THRESHOLD: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Normal,
    Suspect,
    FraudConfirm,
}

impl RiskBand {
    pub fn from_points(points: i64) -> Self {
        if points >= RISK_FRAUD_THRESHOLD {
            RiskBand::FraudConfirm
        } else if points >= RISK_SUSPECT_THRESHOLD {
            RiskBand::Suspect
        } else {
            RiskBand::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Normal => "normal",
            RiskBand::Suspect => "suspect",
            RiskBand::FraudConfirm => "fraud_confirm",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banding_thresholds() {
        assert_eq!(RiskBand::from_points(0), RiskBand::Normal);
        assert_eq!(RiskBand::from_points(69), RiskBand::Normal);
        assert_eq!(RiskBand::from_points(70), RiskBand::Suspect);
        assert_eq!(RiskBand::from_points(99), RiskBand::Suspect);
        assert_eq!(RiskBand::from_points(100), RiskBand::FraudConfirm);
        assert_eq!(RiskBand::from_points(500), RiskBand::FraudConfirm);
    }

    #[test]
    fn test_ordering() {
        assert!(RiskBand::Normal < RiskBand::Suspect);
        assert!(RiskBand::Suspect < RiskBand::FraudConfirm);
    }
}
