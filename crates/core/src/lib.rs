//! RiskGuard Core - domain types
//!
//! This crate contains the fundamental types shared across RiskGuard:
//! - `Amount`: strictly positive decimal wrapper for transaction amounts
//! - `Transaction`, `TransactionType`: the unit the pipeline scores
//! - `User`: the node type of the graph engine
//! - `RiskBand`: the §4.1 banding of a composite risk score
//! - `ApiError`: the §7 error taxonomy shared by every crate above the store

pub mod amount;
pub mod error;
pub mod transaction;
pub mod user;
pub mod verdict;

pub use amount::{Amount, AmountError};
pub use error::{ApiError, ApiResult};
pub use transaction::{Transaction, TransactionType};
pub use user::User;
pub use verdict::RiskBand;
