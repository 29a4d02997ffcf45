//! HTTP error response wrapper around `riskguard_core::ApiError`, plus free
//! functions mapping each lower crate's error type into it. `ApiError` and
//! every source error type are both foreign to this crate, so a blanket
//! `impl From` would violate the orphan rule - these are plain functions
//! called explicitly at each handler's error site instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use riskguard_core::ApiError;
use riskguard_graph::GraphError;
use riskguard_orchestrator::OrchestratorError;
use riskguard_rules::RuleError;
use riskguard_store::StoreError;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

pub struct ApiErrorResponse(pub ApiError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody { error: self.0.code(), message: self.0.to_string() };
        (status, Json(body)).into_response()
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(e: ApiError) -> Self {
        ApiErrorResponse(e)
    }
}

pub fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::NotFound { collection, id } => ApiError::not_found(collection, id),
        StoreError::AlreadyExists { collection, id } => ApiError::already_exists(collection, id),
        StoreError::NotInitialized => ApiError::unavailable("store", "not initialized"),
        StoreError::Database(e) => ApiError::Internal(e.to_string()),
        StoreError::Serialization(e) => ApiError::BadRequest(e.to_string()),
    }
}

pub fn graph_error(e: GraphError) -> ApiError {
    match e {
        GraphError::NotReady => ApiError::unavailable("graph_engine", "not initialized"),
        GraphError::UserNotFound(id) => ApiError::not_found("user", id),
        GraphError::UserAlreadyExists(id) => ApiError::already_exists("user", id),
        GraphError::LinkNotFound(a, b) => ApiError::not_found("link", format!("{a}/{b}")),
        GraphError::LinkAlreadyExists(a, b) => ApiError::already_exists("link", format!("{a}/{b}")),
        GraphError::GraphRuleNotFound(id) => ApiError::not_found("graph_rule", id),
        GraphError::ClusterNotFound(id) => ApiError::not_found("cluster", id),
        GraphError::Store(e) => store_error(e),
    }
}

pub fn rule_error(e: RuleError) -> ApiError {
    match e {
        RuleError::InvalidTimeRange(range, reason) => {
            ApiError::ValidationError(format!("invalid time range {range:?}: {reason}"))
        }
        RuleError::Store(e) => store_error(e),
    }
}

pub fn orchestrator_error(e: OrchestratorError) -> ApiError {
    match e {
        OrchestratorError::TransactionNotFound(id) => ApiError::not_found("transaction", id),
        OrchestratorError::Store(e) => store_error(e),
        OrchestratorError::MalformedTransaction(e) => ApiError::Internal(e.to_string()),
    }
}
