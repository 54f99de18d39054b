//! API key validation endpoint.

use actix_web::{HttpResponse, web};

use crate::auth::ApiKeyAuth;
use crate::error::AppResult;
use crate::models::ValidateKeyResponse;

/// Check the caller's API key.
///
/// The extractor rejects missing or wrong keys with 401 before the
/// handler runs.
#[utoipa::path(
    post,
    path = "/api/auth/validate",
    tag = "Auth",
    responses(
        (status = 200, description = "Key is valid", body = ValidateKeyResponse),
        (status = 401, description = "Invalid or missing API key", body = crate::error::UnauthorizedResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn validate(_auth: ApiKeyAuth) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ValidateKeyResponse { valid: true }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/validate").route(web::post().to(validate)));
}
