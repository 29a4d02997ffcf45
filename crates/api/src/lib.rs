//! RiskGuard API - the §6 HTTP surface over the graph engine, rule/policy
//! store and orchestrator, wired together as one `axum::Router<AppState>`.

pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use router::build_router;
pub use state::AppState;
