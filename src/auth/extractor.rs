//! Actix-web extractor for API key authentication.
//!
//! # Security
//! - The provided key is wrapped in `SecretString` as soon as it is read
//! - Secret values are never logged or exposed in debug output
//! - Comparison against the configured key is constant-time

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use secrecy::{ExposeSecret, SecretString};
use std::future::{Ready, ready};
use tracing::{error, warn};

use super::ApiKey;
use crate::config::API_KEY_HEADER;
use crate::error::AppError;

/// Extract a secret header value, wrapping it in SecretString.
/// Returns None if the header is missing or invalid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// Extractor that requires a valid `x-api-key` header.
///
/// ```ignore
/// async fn protected_handler(_auth: ApiKeyAuth) -> impl Responder { ... }
/// ```
///
/// Rejects with `AppError::Unauthorized` (401) when the header is missing
/// or does not match the configured key.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyAuth;

impl FromRequest for ApiKeyAuth {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(expected) = req.app_data::<web::Data<ApiKey>>() else {
            error!("ApiKey is not registered as app data; rejecting request");
            return ready(Err(AppError::Unauthorized));
        };

        match extract_secret_header(req, API_KEY_HEADER) {
            Some(provided) if expected.verify(provided.expose_secret()) => ready(Ok(ApiKeyAuth)),
            Some(_) => {
                warn!(path = %req.path(), "Rejected request with invalid API key");
                ready(Err(AppError::Unauthorized))
            }
            None => ready(Err(AppError::Unauthorized)),
        }
    }
}
