//! `/graph_rules/` CRUD (§6).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use riskguard_graph::GraphRule;

use crate::error::{graph_error, ApiErrorResponse};
use crate::state::AppState;

pub async fn create_graph_rule(
    State(state): State<AppState>,
    Json(rule): Json<GraphRule>,
) -> Result<(StatusCode, Json<GraphRule>), ApiErrorResponse> {
    let rule = state.graph.create_graph_rule(rule).await.map_err(graph_error)?;
    Ok((StatusCode::OK, Json(rule)))
}

pub async fn list_graph_rules(
    State(state): State<AppState>,
) -> Result<Json<Vec<GraphRule>>, ApiErrorResponse> {
    let rules = state.graph.get_all_graph_rules().await.map_err(graph_error)?;
    Ok(Json(rules))
}

pub async fn read_graph_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<String>,
) -> Result<Json<GraphRule>, ApiErrorResponse> {
    let rule = state.graph.get_graph_rule(&rule_id).await.map_err(graph_error)?;
    Ok(Json(rule))
}

pub async fn update_graph_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<String>,
    Json(rule): Json<GraphRule>,
) -> Result<Json<GraphRule>, ApiErrorResponse> {
    let rule = state.graph.update_graph_rule(&rule_id, rule).await.map_err(graph_error)?;
    Ok(Json(rule))
}

pub async fn delete_graph_rule(
    State(state): State<AppState>,
    Path(rule_id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    state.graph.delete_graph_rule(&rule_id).await.map_err(graph_error)?;
    Ok(StatusCode::NO_CONTENT)
}
