//! Route table (§6), grounded on `edge_receiver.rs`'s
//! `Router::new().route(...)` / `axum::serve` shape plus `tower-http`'s
//! CORS/trace layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{graph_rules, health, links, rules, scoring, users};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/users/", post(users::create_user))
        .route("/users/:id", get(users::read_user).put(users::update_user).delete(users::delete_user))
        .route("/links/", post(links::create_link).get(links::list_links))
        .route("/links/:source_id/:target_id", get(links::read_link).delete(links::delete_link))
        .route("/generate_links/", post(links::generate_links))
        .route("/cluster_nodes/", post(links::cluster_nodes))
        .route("/clusters/", get(links::list_clusters))
        .route("/clusters/:id", get(links::read_cluster))
        .route(
            "/graph_rules/",
            post(graph_rules::create_graph_rule).get(graph_rules::list_graph_rules),
        )
        .route(
            "/graph_rules/:id",
            get(graph_rules::read_graph_rule)
                .put(graph_rules::update_graph_rule)
                .delete(graph_rules::delete_graph_rule),
        )
        .route("/policies/", post(rules::policies::create).get(rules::policies::list))
        .route(
            "/policies/:id",
            get(rules::policies::read).put(rules::policies::update).delete(rules::policies::delete),
        )
        .route(
            "/standard_rules/",
            post(rules::standard_rules::create).get(rules::standard_rules::list),
        )
        .route(
            "/standard_rules/:id",
            get(rules::standard_rules::read)
                .put(rules::standard_rules::update)
                .delete(rules::standard_rules::delete),
        )
        .route(
            "/velocity_rules/",
            post(rules::velocity_rules::create).get(rules::velocity_rules::list),
        )
        .route(
            "/velocity_rules/:id",
            get(rules::velocity_rules::read)
                .put(rules::velocity_rules::update)
                .delete(rules::velocity_rules::delete),
        )
        .route("/transactions", post(scoring::score_transaction))
        .route("/fraud_check/:transaction_id", get(scoring::fraud_check))
        .route("/analyze", get(scoring::analyze))
        .route("/health", get(health::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use riskguard_graph::GraphEngine;
    use riskguard_orchestrator::Orchestrator;
    use riskguard_remote::{AnalyzerKind, RemoteAnalyzerClient};
    use riskguard_store::{InMemoryStore, Store};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::state::AppState;

    async fn test_state() -> AppState {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let graph = Arc::new(GraphEngine::new(store.clone()));
        graph.initialize().await.unwrap();
        let orchestrator = Arc::new(Orchestrator::new(
            store.clone(),
            graph.clone(),
            RemoteAnalyzerClient::new(AnalyzerKind::NeuralNet, "http://127.0.0.1:1"),
            RemoteAnalyzerClient::new(AnalyzerKind::TextAnalyzer, "http://127.0.0.1:1"),
        ));
        AppState::new(store, graph, orchestrator, None)
    }

    #[tokio::test]
    async fn test_health_ready_after_initialize() {
        let app = build_router(test_state().await);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_and_read_user() {
        let app = build_router(test_state().await);
        let body = json!({
            "user_id": "U-1",
            "full_name": "Alice",
            "email": "alice@example.com",
            "email_domain": "",
            "phone": "0812",
            "address_zip": "40123",
            "address_city": "Bandung",
            "address_province": "Jawa Barat",
            "address_kecamatan": "Coblong",
            "is_fraud": false
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/users/U-1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_read_missing_user_is_404() {
        let app = build_router(test_state().await);
        let response = app
            .oneshot(Request::builder().uri("/users/ghost").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fraud_check_missing_transaction_is_404() {
        let app = build_router(test_state().await);
        let response = app
            .oneshot(Request::builder().uri("/fraud_check/TX-ghost").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
