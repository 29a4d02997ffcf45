use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("graph engine not initialized")]
    NotReady,

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    #[error("link not found between {0} and {1}")]
    LinkNotFound(String, String),

    #[error("link already exists between {0} and {1}")]
    LinkAlreadyExists(String, String),

    #[error("graph rule not found: {0}")]
    GraphRuleNotFound(String),

    #[error("cluster not found: {0}")]
    ClusterNotFound(String),

    #[error(transparent)]
    Store(#[from] riskguard_store::StoreError),
}
