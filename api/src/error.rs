//! Unified error types for the Yanote API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic and persistence errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Used for both "does not exist" and "exists but belongs to someone else".
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("{0} - such a slug already exists, choose a unique value!")]
    DuplicateSlug(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::InvalidField {
            field,
            message: message.into(),
        }
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Anonymous access to a protected page; answered with a redirect.
    #[error("Authentication required")]
    Unauthenticated { login_url: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthenticated { login_url } => {
                return (StatusCode::FOUND, [(header::LOCATION, login_url.clone())])
                    .into_response();
            }
            // Missing and foreign notes get the same body
            AppError::Domain(DomainError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found", None)
            }
            AppError::Domain(DomainError::DuplicateSlug(_)) => (
                StatusCode::CONFLICT,
                "Duplicate slug",
                Some(self.to_string()),
            ),
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                (StatusCode::CONFLICT, "Already exists", Some(msg.clone()))
            }
            AppError::Domain(e @ DomainError::InvalidField { .. }) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(e.to_string()),
            ),
            AppError::Domain(DomainError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized", None)
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
