use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request to {service} timed out after {timeout_ms}ms")]
    Timeout { service: &'static str, timeout_ms: u64 },

    #[error("request to {service} failed: {source}")]
    Request { service: &'static str, #[source] source: reqwest::Error },

    #[error("{service} returned an unparseable response: {reason}")]
    InvalidResponse { service: &'static str, reason: String },
}
