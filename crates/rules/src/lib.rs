//! RiskGuard Rules - standard/velocity rule evaluation and policy scoring
//! (§4.1), grounded on `bibank_dsl::evaluator::RuleEvaluator`'s shape but
//! carrying the original `rules_policy_engine` field set and
//! warn-and-continue failure semantics instead of the legacy `eval()`
//! prototype (explicitly out of scope, §9).

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod time_range;
pub mod types;

pub use engine::{PolicyEngine, PolicyResult};
pub use error::RuleError;
pub use evaluator::RuleEvaluator;
pub use time_range::parse_time_range;
pub use types::{Aggregation, Operator, Policy, Rule, StandardRule, VelocityRule};
