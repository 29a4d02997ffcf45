//! `RiskGuardConfig` - the §6 environment variables, loaded with serde
//! defaults the way `bibank_compliance::config::ComplianceConfig` loads its
//! thresholds: every field has a conservative default so the server starts
//! without a fully populated environment.

use serde::{Deserialize, Serialize};

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_store_db() -> String {
    "riskguard".to_string()
}

fn default_audit_dir() -> String {
    "./data/audit".to_string()
}

fn default_analyzer_url(service: &str) -> String {
    format!("http://{service}:8000")
}

/// Server configuration, assembled from environment variables (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskGuardConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// `sqlite://path/to/db.sqlite` style connection string; ignored when
    /// `testing` selects the in-memory store.
    #[serde(default)]
    pub store_uri: Option<String>,

    #[serde(default = "default_store_db")]
    pub store_db: String,

    #[serde(default = "default_text_analyzer_url")]
    pub text_analyzer_url: String,

    #[serde(default = "default_nn_service_url")]
    pub nn_service_url: String,

    #[serde(default = "default_graph_service_url")]
    pub graph_service_url: String,

    #[serde(default = "default_rules_url")]
    pub rules_url: String,

    #[serde(default = "default_audit_dir")]
    pub audit_dir: String,

    /// `TESTING=true` swaps `SqliteStore` for `InMemoryStore` (§6).
    #[serde(default)]
    pub testing: bool,
}

fn default_text_analyzer_url() -> String {
    default_analyzer_url("text_analyzer")
}

fn default_nn_service_url() -> String {
    default_analyzer_url("neural_net_service")
}

fn default_graph_service_url() -> String {
    default_analyzer_url("graph_service")
}

fn default_rules_url() -> String {
    default_analyzer_url("rules_policy_engine")
}

impl Default for RiskGuardConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            store_uri: None,
            store_db: default_store_db(),
            text_analyzer_url: default_text_analyzer_url(),
            nn_service_url: default_nn_service_url(),
            graph_service_url: default_graph_service_url(),
            rules_url: default_rules_url(),
            audit_dir: default_audit_dir(),
            testing: false,
        }
    }
}

impl RiskGuardConfig {
    /// Reads the §6 environment variables, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Ok(v) = std::env::var("STORE_URI") {
            config.store_uri = Some(v);
        }
        if let Ok(v) = std::env::var("STORE_DB") {
            config.store_db = v;
        }
        if let Ok(v) = std::env::var("TEXT_ANALYZER_URL") {
            config.text_analyzer_url = v;
        }
        if let Ok(v) = std::env::var("NN_SERVICE_URL") {
            config.nn_service_url = v;
        }
        if let Ok(v) = std::env::var("GRAPH_SERVICE_URL") {
            config.graph_service_url = v;
        }
        if let Ok(v) = std::env::var("RULES_URL") {
            config.rules_url = v;
        }
        if let Ok(v) = std::env::var("AUDIT_DIR") {
            config.audit_dir = v;
        }
        config.testing = std::env::var("TESTING").map(|v| v == "true").unwrap_or(false);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_conservative_defaults() {
        let config = RiskGuardConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert!(!config.testing);
        assert!(config.store_uri.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "testing": true }"#;
        let config: RiskGuardConfig = serde_json::from_str(json).unwrap();
        assert!(config.testing);
        assert_eq!(config.store_db, "riskguard");
    }
}
