//! Custom error types for the API service

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// A setting the operation depends on is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request body or query failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// No bearer token on an admin request
    #[error("Missing token")]
    MissingToken,

    /// Bearer token is malformed, forged, expired or lacks the admin role
    #[error("Invalid token")]
    InvalidToken,

    /// Login attempt did not match the configured admin
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Document store error
    #[error("Store error: {0}")]
    Store(#[from] common::error::StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Configuration(_) | ApiError::Store(_)) {
            error!("{}", self);
        }

        let (status, error_message) = match self {
            ApiError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server not configured".to_string(),
            ),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing token".to_string()),
            ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// JSON body extractor whose rejections are reported as [`ApiError::Validation`]
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
