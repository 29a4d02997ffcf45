use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid time range {0:?}: {1}")]
    InvalidTimeRange(String, &'static str),

    #[error(transparent)]
    Store(#[from] riskguard_store::StoreError),
}
