//! Push registration API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{DeviceToken, RegisterDeviceTokenRequest};

#[utoipa::path(
    post,
    path = "/api/device_tokens",
    tag = "Device Tokens",
    request_body = RegisterDeviceTokenRequest,
    responses(
        (status = 201, description = "Token registered", body = DeviceToken),
        (status = 200, description = "Token was already registered", body = DeviceToken),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn register_token(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<RegisterDeviceTokenRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner().validate()?;
    let (token, created) = pool.register_device_token(req).await?;
    let token = DeviceToken::from_entity(token);

    if created {
        info!(token_id = token.id, platform = ?token.platform, "Device token registered");
        Ok(HttpResponse::Created().json(token))
    } else {
        Ok(HttpResponse::Ok().json(token))
    }
}

#[utoipa::path(
    delete,
    path = "/api/device_tokens/{token}",
    tag = "Device Tokens",
    params(("token" = String, Path, description = "Registration token")),
    responses(
        (status = 204, description = "Token removed"),
        (status = 404, description = "Unknown token", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn unregister_token(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    pool.delete_device_token(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/device_tokens").route(web::post().to(register_token)))
        .service(
            web::resource("/device_tokens/{token}").route(web::delete().to(unregister_token)),
        );
}
