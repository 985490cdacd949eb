//! Unified error handling for the backend API.
//!
//! Collaborators (identity provider, user store, token issuer) return their
//! own error enums. The `From` impls below are the single place where those
//! are sorted into HTTP outcomes, so handlers can use `?` throughout.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::google::SsoError;
use crate::auth::jwt::TokenError;
use crate::repository::UserStoreError;

/// Prefix of every 500 response body.
pub const UNEXPECTED_ERROR_PREFIX: &str =
    "An unexpected error occurred. Report this message to support:";

/// API error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// The provider response could not be verified
    #[error("{0}")]
    BadRequest(String),

    /// Authentication required but not provided or invalid
    #[error("{0}")]
    Unauthorized(String),

    /// Identity conflicts with an existing user record
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Anything else: store outage, upstream failure, signing failure
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `detail` field of the response body.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Internal(e) => format!("{} {:#}", UNEXPECTED_ERROR_PREFIX, e),
            other => other.to_string(),
        }
    }
}

impl From<SsoError> for ApiError {
    fn from(err: SsoError) -> Self {
        match err {
            SsoError::Verification(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<UserStoreError> for ApiError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::Duplicate(msg) => ApiError::Forbidden(msg),
            UserStoreError::Backend(e) => ApiError::Internal(e),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(e) => tracing::error!("Internal error: {:?}", e),
            ApiError::Forbidden(msg) => tracing::warn!("Forbidden: {}", msg),
            ApiError::BadRequest(msg) => tracing::warn!("Bad request: {}", msg),
            ApiError::Unauthorized(_) | ApiError::NotFound(_) => {}
        }

        let body = Json(ErrorResponse {
            detail: self.detail(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_user_maps_to_forbidden() {
        let err: ApiError =
            UserStoreError::Duplicate("User with email a@example.com already exists".into())
                .into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.detail(), "User with email a@example.com already exists");
    }

    #[test]
    fn test_verification_failure_maps_to_bad_request() {
        let err: ApiError = SsoError::Verification("state mismatch".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail(), "state mismatch");
    }

    #[test]
    fn test_backend_failure_maps_to_internal_with_support_prefix() {
        let err: ApiError =
            UserStoreError::Backend(anyhow::anyhow!("connection refused")).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.detail(),
            "An unexpected error occurred. Report this message to support: connection refused"
        );
    }

    #[test]
    fn test_upstream_failure_is_unexpected() {
        let err: ApiError = SsoError::Upstream {
            endpoint: "token",
            status: 503,
        }
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail().starts_with(UNEXPECTED_ERROR_PREFIX));
        assert!(err.detail().contains("503"));
    }
}
