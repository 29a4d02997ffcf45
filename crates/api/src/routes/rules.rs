//! `/policies/`, `/standard_rules/`, `/velocity_rules/` CRUD (§6).
//!
//! Unlike the graph engine, rule/policy documents have no in-memory
//! mirror to keep consistent - they are read fresh out of the store on
//! every orchestrator pass - so these handlers talk to `Store` directly
//! rather than through an engine.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use riskguard_rules::{Policy, StandardRule, VelocityRule};
use riskguard_store::collections;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{store_error, ApiErrorResponse};
use crate::state::AppState;

async fn create<T: Serialize>(
    state: &AppState,
    collection: &str,
    id: &str,
    doc: &T,
) -> Result<(), ApiErrorResponse> {
    let value = serde_json::to_value(doc).map_err(|e| ApiErrorResponse(store_error(e.into())))?;
    state.store.insert_one(collection, id, value).await.map_err(store_error)?;
    Ok(())
}

async fn read<T: DeserializeOwned>(
    state: &AppState,
    collection: &str,
    id: &str,
) -> Result<T, ApiErrorResponse> {
    let doc = state
        .store
        .find_one(collection, id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| riskguard_core::ApiError::not_found(collection, id))?;
    serde_json::from_value(doc).map_err(|e| ApiErrorResponse(store_error(e.into())))
}

async fn list<T: DeserializeOwned>(state: &AppState, collection: &str) -> Result<Vec<T>, ApiErrorResponse> {
    let docs = state.store.find(collection, &riskguard_store::Filter::new()).await.map_err(store_error)?;
    docs.into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(|e| ApiErrorResponse(store_error(e.into()))))
        .collect()
}

async fn update<T: Serialize>(
    state: &AppState,
    collection: &str,
    id: &str,
    doc: &T,
) -> Result<(), ApiErrorResponse> {
    let value = serde_json::to_value(doc).map_err(|e| ApiErrorResponse(store_error(e.into())))?;
    state.store.update_one(collection, id, value).await.map_err(store_error)?;
    Ok(())
}

async fn delete(state: &AppState, collection: &str, id: &str) -> Result<bool, ApiErrorResponse> {
    state.store.delete_one(collection, id).await.map_err(store_error)
}

macro_rules! crud_routes {
    ($module:ident, $ty:ty, $collection:expr) => {
        pub mod $module {
            use super::*;

            pub async fn create(
                State(state): State<AppState>,
                Json(doc): Json<$ty>,
            ) -> Result<(StatusCode, Json<$ty>), ApiErrorResponse> {
                super::create(&state, $collection, &doc.id, &doc).await?;
                Ok((StatusCode::OK, Json(doc)))
            }

            pub async fn list(
                State(state): State<AppState>,
            ) -> Result<Json<Vec<$ty>>, ApiErrorResponse> {
                Ok(Json(super::list(&state, $collection).await?))
            }

            pub async fn read(
                State(state): State<AppState>,
                Path(id): Path<String>,
            ) -> Result<Json<$ty>, ApiErrorResponse> {
                Ok(Json(super::read(&state, $collection, &id).await?))
            }

            pub async fn update(
                State(state): State<AppState>,
                Path(id): Path<String>,
                Json(doc): Json<$ty>,
            ) -> Result<Json<$ty>, ApiErrorResponse> {
                super::update(&state, $collection, &id, &doc).await?;
                Ok(Json(doc))
            }

            pub async fn delete(
                State(state): State<AppState>,
                Path(id): Path<String>,
            ) -> Result<StatusCode, ApiErrorResponse> {
                if super::delete(&state, $collection, &id).await? {
                    Ok(StatusCode::NO_CONTENT)
                } else {
                    Err(riskguard_core::ApiError::not_found($collection, id).into())
                }
            }
        }
    };
}

crud_routes!(policies, Policy, collections::POLICIES);
crud_routes!(standard_rules, StandardRule, collections::STANDARD_RULES);
crud_routes!(velocity_rules, VelocityRule, collections::VELOCITY_RULES);
