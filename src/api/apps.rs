//! App registry API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{App, CreateAppRequest, ListAppsQuery, UpdateAppRequest};

#[utoipa::path(
    get,
    path = "/api/apps",
    tag = "Apps",
    params(ListAppsQuery),
    responses(
        (status = 200, description = "Registered apps", body = Vec<App>),
        (status = 401, description = "Unauthorized", body = crate::error::UnauthorizedResponse),
    ),
    security(("api_key" = []))
)]
pub async fn list_apps(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    query: web::Query<ListAppsQuery>,
) -> AppResult<HttpResponse> {
    let apps: Vec<App> = pool
        .list_apps(query.watching)
        .await?
        .into_iter()
        .map(App::from_entity)
        .collect();
    Ok(HttpResponse::Ok().json(apps))
}

#[utoipa::path(
    post,
    path = "/api/apps",
    tag = "Apps",
    request_body = CreateAppRequest,
    responses(
        (status = 201, description = "App registered", body = App),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn create_app(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateAppRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner().validate()?;
    let app = pool.insert_app(req).await?;
    info!(app_id = app.id, code = %app.code, "App registered");
    Ok(HttpResponse::Created().json(App::from_entity(app)))
}

#[utoipa::path(
    get,
    path = "/api/apps/{id}",
    tag = "Apps",
    params(("id" = i32, Path, description = "App id")),
    responses(
        (status = 200, description = "App", body = App),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn get_app(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let app = pool
        .get_app(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("App {}", id)))?;
    Ok(HttpResponse::Ok().json(App::from_entity(app)))
}

#[utoipa::path(
    put,
    path = "/api/apps/{id}",
    tag = "Apps",
    params(("id" = i32, Path, description = "App id")),
    request_body = UpdateAppRequest,
    responses(
        (status = 200, description = "Updated app", body = App),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn update_app(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateAppRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner().validate()?;
    let app = pool.update_app(path.into_inner(), req).await?;
    Ok(HttpResponse::Ok().json(App::from_entity(app)))
}

#[utoipa::path(
    delete,
    path = "/api/apps/{id}",
    tag = "Apps",
    params(("id" = i32, Path, description = "App id")),
    responses(
        (status = 204, description = "Deleted with its runs and report rows"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn delete_app(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_app(id).await?;
    info!(app_id = id, "App deleted");
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/apps")
            .route(web::get().to(list_apps))
            .route(web::post().to(create_app)),
    )
    .service(
        web::resource("/apps/{id}")
            .route(web::get().to(get_app))
            .route(web::put().to(update_app))
            .route(web::delete().to(delete_app)),
    );
}
