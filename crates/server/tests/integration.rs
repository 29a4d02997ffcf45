//! End-to-end smoke test: boots the real router against an in-memory
//! store and drives the §6 surface through a full user -> link -> policy
//! -> transaction -> fraud_check flow, the way
//! `bibank_rpc/tests/integration.rs` drives a full ledger workflow through
//! `AppContext`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

#[path = "../src/bootstrap.rs"]
mod bootstrap;
#[path = "../src/config.rs"]
mod config;

async fn request(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    builder = builder.header("content-type", "application/json");
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

#[tokio::test]
async fn test_full_scoring_flow() {
    let audit_dir = tempfile::tempdir().unwrap();
    let mut config = config::RiskGuardConfig::default();
    config.testing = true;
    config.audit_dir = audit_dir.path().to_string_lossy().to_string();

    let state = bootstrap::build_app_state(&config).await.unwrap();
    let app = riskguard_api::build_router(state);

    let (status, _) = request(
        app.clone(),
        "POST",
        "/users/",
        Some(json!({
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
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        app.clone(),
        "POST",
        "/policies/",
        Some(json!({
            "id": "P1",
            "name": "large amount",
            "description": "",
            "rules": [{
                "rule_type": "standard",
                "id": "R1",
                "description": "large amount",
                "risk_point": 80,
                "field": "amount",
                "operator": "greater_than",
                "value": 500
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(
        app.clone(),
        "POST",
        "/transactions",
        Some(json!({
            "transaction_id": "TX-1",
            "user_id": "U-1",
            "amount": "600",
            "type": "deposit",
            "timestamp": "2026-01-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_points"], 80);
    assert_eq!(body["risk_band"], "suspect");

    let (status, body) = request(app.clone(), "GET", "/fraud_check/TX-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"]["risk_points"], 80);
    assert!(body["errors"]["nn"].is_string());
    assert!(body["errors"]["text"].is_string());

    let (status, _) = request(app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
