//! Wires the store, graph engine, orchestrator and audit log together,
//! the way `bibank_rpc::context::AppContext::new` assembles the ledger,
//! event store and risk engine from a single data path.

use std::sync::Arc;

use riskguard_audit::AuditLog;
use riskguard_graph::GraphEngine;
use riskguard_orchestrator::Orchestrator;
use riskguard_remote::{AnalyzerKind, RemoteAnalyzerClient};
use riskguard_store::{InMemoryStore, SqliteStore, Store};
use tokio::sync::Mutex;

use crate::config::RiskGuardConfig;

const DEFAULT_SQLITE_PATH: &str = "./data/riskguard.sqlite";

/// Builds the application's `AppState`, initializing the graph engine's
/// bulk load (§5) before the HTTP listener ever accepts a request.
pub async fn build_app_state(config: &RiskGuardConfig) -> anyhow::Result<riskguard_api::AppState> {
    let store: Arc<dyn Store> = if config.testing {
        tracing::info!("TESTING=true: using in-memory store");
        Arc::new(InMemoryStore::new())
    } else {
        let path = config.store_uri.clone().unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());
        tracing::info!(path, "connecting to sqlite store");
        Arc::new(SqliteStore::connect(&path).await?)
    };

    let graph = Arc::new(GraphEngine::new(store.clone()));
    graph.initialize().await?;

    let nn_client = RemoteAnalyzerClient::new(AnalyzerKind::NeuralNet, config.nn_service_url.clone());
    let text_client = RemoteAnalyzerClient::new(AnalyzerKind::TextAnalyzer, config.text_analyzer_url.clone());
    let orchestrator = Arc::new(Orchestrator::new(store.clone(), graph.clone(), nn_client, text_client));

    let audit = AuditLog::new(&config.audit_dir)
        .map(|log| Arc::new(Mutex::new(log)))
        .map_err(|e| {
            tracing::warn!(error = %e, "failed to open audit log, continuing without it");
            e
        })
        .ok();

    Ok(riskguard_api::AppState::new(store, graph, orchestrator, audit))
}
