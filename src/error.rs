//! Domain error types for the dashboard API.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Message returned for every failed API key check.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Invalid or missing API key";

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input (400)
    #[error("{0}")]
    Validation(String),

    /// Missing or wrong API key (401)
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    /// Resource not found (404)
    #[error("{0} not found")]
    NotFound(String),

    /// Request conflicts with current state, e.g. a run already in progress (409)
    #[error("{0}")]
    Conflict(String),

    /// Underlying store failure (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Pub/sub broker failure (500)
    #[error("Pub/sub error: {0}")]
    PubSub(String),

    /// Anything else (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code included in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::PubSub(_) => "PUBSUB_ERROR",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::PubSub(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized => {
                return HttpResponse::Unauthorized().json(UnauthorizedResponse {
                    error: UNAUTHORIZED_MESSAGE,
                });
            }
            AppError::Database(detail) => tracing::error!("Database error: {}", detail),
            AppError::PubSub(detail) => tracing::error!("Pub/sub error: {}", detail),
            AppError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(self.to_response(false))
    }
}

impl AppError {
    /// Message safe to show to clients; server-side failures are masked.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "An internal database error occurred".to_string(),
            AppError::PubSub(_) => "Failed to reach the message broker".to_string(),
            AppError::Internal(_) => "Internal Server Error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Build the JSON body, optionally carrying the unmasked error text.
    pub fn to_response(&self, with_details: bool) -> ErrorResponse {
        ErrorResponse {
            error: self.code().to_string(),
            message: self.public_message(),
            details: with_details.then(|| self.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Unmasked error text, only present in development.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Body returned on authentication failure.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UnauthorizedResponse {
    pub error: &'static str,
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::PubSub(err.to_string())
    }
}
