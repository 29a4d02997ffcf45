//! `/links/`, `/generate_links/`, `/cluster_nodes/`, `/clusters/` (§6).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use riskguard_graph::{Cluster, Link};
use serde::Deserialize;

use crate::error::{graph_error, ApiErrorResponse};
use crate::state::AppState;

pub async fn create_link(
    State(state): State<AppState>,
    Json(link): Json<Link>,
) -> Result<(StatusCode, Json<Link>), ApiErrorResponse> {
    let link = state.graph.create_link(link).await.map_err(graph_error)?;
    Ok((StatusCode::OK, Json(link)))
}

pub async fn read_link(
    State(state): State<AppState>,
    Path((source_id, target_id)): Path<(String, String)>,
) -> Result<Json<Link>, ApiErrorResponse> {
    let link = state.graph.read_link(&source_id, &target_id).await.map_err(graph_error)?;
    Ok(Json(link))
}

pub async fn delete_link(
    State(state): State<AppState>,
    Path((source_id, target_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiErrorResponse> {
    state.graph.delete_link(&source_id, &target_id).await.map_err(graph_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ClusterQuery {
    pub cluster_id: Option<String>,
}

/// `GET /links/?cluster_id=` - links within one cluster, or every link
/// when `cluster_id` is absent.
pub async fn list_links(
    State(state): State<AppState>,
    Query(query): Query<ClusterQuery>,
) -> Result<Json<Vec<Link>>, ApiErrorResponse> {
    let links = match query.cluster_id {
        Some(cluster_id) => state.graph.get_links_by_cluster(&cluster_id).await.map_err(graph_error)?,
        None => state.graph.get_all_links().await.map_err(graph_error)?,
    };
    Ok(Json(links))
}

pub async fn generate_links(
    State(state): State<AppState>,
) -> Result<Json<Vec<Link>>, ApiErrorResponse> {
    let links = state.graph.generate_links().await.map_err(graph_error)?;
    Ok(Json(links))
}

pub async fn cluster_nodes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Cluster>>, ApiErrorResponse> {
    let clusters = state.graph.cluster_nodes().await.map_err(graph_error)?;
    Ok(Json(clusters))
}

pub async fn list_clusters(
    State(state): State<AppState>,
) -> Result<Json<Vec<Cluster>>, ApiErrorResponse> {
    let clusters = state.graph.get_all_clusters().await.map_err(graph_error)?;
    Ok(Json(clusters))
}

pub async fn read_cluster(
    State(state): State<AppState>,
    Path(cluster_id): Path<String>,
) -> Result<Json<Cluster>, ApiErrorResponse> {
    let cluster = state.graph.get_cluster_by_id(&cluster_id).await.map_err(graph_error)?;
    Ok(Json(cluster))
}
