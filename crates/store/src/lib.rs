//! RiskGuard Store - the document-store abstraction behind every collection
//! (users, links, rules, policies, clusters, transactions).
//!
//! The `Store` trait is backend-agnostic; `InMemoryStore` backs
//! `TESTING=true` runs and `SqliteStore` backs real deployments, one JSON
//! document per row, the way `bibank_projection::ProjectionEngine` drives
//! its `sqlx::SqlitePool`.

pub mod error;
pub mod filter;
pub mod memory;
pub mod sqlite;

pub use error::StoreError;
pub use filter::{AggregateOp, Filter, FilterOp};
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::Value;

/// Collection names used across RiskGuard, kept here so every crate spells
/// them the same way.
pub mod collections {
    pub const USERS: &str = "users";
    pub const LINKS: &str = "links";
    pub const GRAPH_RULES: &str = "graph_rules";
    pub const CLUSTERS: &str = "clusters";
    pub const STANDARD_RULES: &str = "standard_rules";
    pub const VELOCITY_RULES: &str = "velocity_rules";
    pub const POLICIES: &str = "policies";
    pub const TRANSACTIONS: &str = "transactions";
    pub const VERDICTS: &str = "verdicts";
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_one(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError>;

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    async fn update_one(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError>;

    async fn delete_one(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Aggregate a numeric field over documents matching `filter`. `field`
    /// is ignored for `AggregateOp::Count`.
    async fn aggregate(
        &self,
        collection: &str,
        filter: &Filter,
        field: Option<&str>,
        op: AggregateOp,
    ) -> Result<f64, StoreError>;
}
