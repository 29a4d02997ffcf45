//! `/users/` (§6): thin pass-through to `GraphEngine`'s writer/reader
//! methods, which already hold the readers-writer lock across the store
//! mutation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use riskguard_core::User;

use crate::error::{graph_error, ApiErrorResponse};
use crate::state::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<(StatusCode, Json<User>), ApiErrorResponse> {
    let user = state.graph.create_user(user).await.map_err(graph_error)?;
    Ok((StatusCode::OK, Json(user)))
}

pub async fn read_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiErrorResponse> {
    let user = state.graph.read_user(&user_id).await.map_err(graph_error)?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(user): Json<User>,
) -> Result<Json<User>, ApiErrorResponse> {
    let user = state.graph.update_user(&user_id, user).await.map_err(graph_error)?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    state.graph.delete_user(&user_id).await.map_err(graph_error)?;
    Ok(StatusCode::NO_CONTENT)
}
