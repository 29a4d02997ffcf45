use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    #[error(transparent)]
    Store(#[from] riskguard_store::StoreError),

    #[error("transaction document is malformed: {0}")]
    MalformedTransaction(#[from] serde_json::Error),
}
