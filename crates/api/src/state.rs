//! Shared application state handed to every axum handler, grounded on
//! `bibank_rpc::context::AppContext`'s "one Arc bundle per dependency"
//! shape.

use std::sync::Arc;

use riskguard_audit::AuditLog;
use riskguard_graph::GraphEngine;
use riskguard_orchestrator::Orchestrator;
use riskguard_store::Store;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub graph: Arc<GraphEngine>,
    pub orchestrator: Arc<Orchestrator>,
    /// `None` disables audit logging (e.g. in tests); `AuditLog::append`
    /// needs `&mut self` so it is serialized behind a mutex.
    pub audit: Option<Arc<Mutex<AuditLog>>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        graph: Arc<GraphEngine>,
        orchestrator: Arc<Orchestrator>,
        audit: Option<Arc<Mutex<AuditLog>>>,
    ) -> Self {
        Self { store, graph, orchestrator, audit }
    }
}
