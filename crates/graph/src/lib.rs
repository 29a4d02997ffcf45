//! RiskGuard Graph - the in-memory graph engine (§4.2): user/link CRUD,
//! rule-driven link generation, union-find clustering, BFS fraud
//! proximity, and store synchronization under a readers-writer lock (§5).

pub mod engine;
pub mod error;
pub mod types;
pub mod union_find;

pub use engine::GraphEngine;
pub use error::GraphError;
pub use types::{AnalyzeResult, Cluster, GraphOperator, GraphRule, Link};
