//! HTTP error types for `B2Peak` server.
//!
//! Maps domain errors from `b2peak-core` into appropriate HTTP responses.
//! Every error variant produces a JSON body with a machine-readable `error`
//! field and a human-readable `message`. HTML pages do not use this type;
//! they render their own not-found and denial views.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use b2peak_core::error::{AuthError, FetchError, ParseError};

/// Application-level error returned from JSON handlers.
#[derive(Debug)]
pub enum AppError {
    /// No authenticated identity on the session.
    Unauthorized(String),
    /// Requested resource not found.
    NotFound(String),
    /// Client sent invalid input.
    BadRequest(String),
    /// A collaborator (identity provider, NFT source) is unreachable.
    Unavailable(String),
    /// Internal server error.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound { .. } => Self::NotFound(err.to_string()),
            FetchError::Network { .. } => Self::Unavailable(err.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredential { .. } => Self::Unauthorized(err.to_string()),
            AuthError::ProviderUnavailable { .. } => Self::Unavailable(err.to_string()),
            AuthError::Cancelled => Self::Internal(err.to_string()),
        }
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
