//! API error taxonomy (§7)
//!
//! One enum shared by every crate above the store layer so `riskguard-api`
//! has a single place to map errors to HTTP status codes.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("{resource} already exists: {id}")]
    AlreadyExists { resource: String, id: String },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{service} unavailable: {reason}")]
    Unavailable { service: String, reason: String },

    #[error("internal error: {0}")]
    Internal(String),

    /// One or more orchestrator sub-calls failed but the overall analysis
    /// still produced a verdict (§4.3, §7) — not a failure of the request.
    #[error("partial result: {0}")]
    Partial(String),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::NotFound { resource: resource.into(), id: id.into() }
    }

    pub fn already_exists(resource: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::AlreadyExists { resource: resource.into(), id: id.into() }
    }

    pub fn unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::Unavailable { service: service.into(), reason: reason.into() }
    }

    /// HTTP status code per §7's table. Kept here (rather than in
    /// `riskguard-api`) so any crate can reason about severity without
    /// depending on axum.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound { .. } => 404,
            ApiError::AlreadyExists { .. } => 409,
            ApiError::ValidationError(_) => 422,
            ApiError::BadRequest(_) => 400,
            ApiError::Unavailable { .. } => 503,
            ApiError::Internal(_) => 500,
            ApiError::Partial(_) => 200,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::AlreadyExists { .. } => "already_exists",
            ApiError::ValidationError(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unavailable { .. } => "unavailable",
            ApiError::Internal(_) => "internal",
            ApiError::Partial(_) => "partial",
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("user", "U-1").status_code(), 404);
        assert_eq!(ApiError::already_exists("link", "L-1").status_code(), 409);
        assert_eq!(ApiError::ValidationError("bad".into()).status_code(), 422);
        assert_eq!(ApiError::BadRequest("bad".into()).status_code(), 400);
        assert_eq!(ApiError::unavailable("nn_service", "timeout").status_code(), 503);
        assert_eq!(ApiError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::not_found("user", "U-1").code(), "not_found");
        assert_eq!(ApiError::Partial("graph down".into()).code(), "partial");
    }
}
