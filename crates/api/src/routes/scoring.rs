//! `/transactions`, `/fraud_check/{id}`, `/analyze` (§6, §4.3).

use axum::extract::State;
use axum::extract::Path;
use axum::Json;
use chrono::Utc;
use riskguard_audit::AuditRecord;
use riskguard_core::{RiskBand, Transaction};
use riskguard_graph::AnalyzeResult;
use riskguard_orchestrator::FraudCheckResult;
use riskguard_store::collections;
use serde::{Deserialize, Serialize};

use crate::error::{graph_error, orchestrator_error, store_error, ApiErrorResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ScoreTransactionResponse {
    pub transaction_id: String,
    pub risk_points: i64,
    pub risk_band: RiskBand,
}

/// `POST /transactions`: stores the transaction, then scores it against
/// every policy (§4.1, `process_transaction`'s `db.policies.find()` loop).
/// Persisting it here (the original's `get_transaction_data` was a fixed
/// placeholder that never actually read a store) is what makes the
/// transaction subsequently addressable by `/fraud_check/{id}`.
pub async fn score_transaction(
    State(state): State<AppState>,
    Json(transaction): Json<Transaction>,
) -> Result<Json<ScoreTransactionResponse>, ApiErrorResponse> {
    let doc = serde_json::to_value(&transaction).map_err(|e| ApiErrorResponse(store_error(e.into())))?;
    state.store.insert_one(collections::TRANSACTIONS, &transaction.transaction_id, doc).await.map_err(store_error)?;

    let result = state.orchestrator.score_transaction(&transaction).await.map_err(orchestrator_error)?;
    Ok(Json(ScoreTransactionResponse {
        transaction_id: transaction.transaction_id,
        risk_points: result.risk_points,
        risk_band: RiskBand::from_points(result.risk_points),
    }))
}

/// `GET /fraud_check/{transaction_id}`: the full §4.3 fan-out. Always a
/// `200` once the transaction itself is found, even if a component
/// degraded (§6: "remote analyzer failure is never a 5xx").
pub async fn fraud_check(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<FraudCheckResult>, ApiErrorResponse> {
    let result = state.orchestrator.fraud_check(&transaction_id).await.map_err(orchestrator_error)?;

    if let Some(audit) = &state.audit {
        let record = AuditRecord::new(Utc::now(), result.clone());
        if let Err(e) = audit.lock().await.append(&record) {
            tracing::warn!(error = %e, "failed to append fraud_check result to audit log");
        }
    }

    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub user_id: String,
}

/// `GET /analyze`: graph analysis only, bypassing the orchestrator.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResult>, ApiErrorResponse> {
    let result = state.graph.analyze(&request.user_id, None).await.map_err(graph_error)?;
    Ok(Json(result))
}
