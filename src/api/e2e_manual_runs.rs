//! Manual E2E run API handlers.

use actix_web::{HttpResponse, web};

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CreateManualRunRequest, ListManualRunsQuery, ManualRun, UpdateManualRunRequest, WsEvent,
};
use crate::services::EventBroadcaster;
use crate::services::manual_runs;

#[utoipa::path(
    post,
    path = "/api/e2e_manual_runs",
    tag = "E2E Manual Runs",
    request_body = CreateManualRunRequest,
    responses(
        (status = 201, description = "Pending run created", body = ManualRun),
        (status = 400, description = "Invalid appId: app does not exist", body = crate::error::ErrorResponse),
        (status = 409, description = "App already has a run in progress", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn create_run(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Json<CreateManualRunRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner().validate()?;
    let run = manual_runs::create_run(&pool, req).await?;

    broadcaster.publish(WsEvent::ManualRunUpdated(run.clone()));
    Ok(HttpResponse::Created().json(run))
}

#[utoipa::path(
    get,
    path = "/api/e2e_manual_runs",
    tag = "E2E Manual Runs",
    params(ListManualRunsQuery),
    responses(
        (status = 200, description = "Runs, newest first", body = Vec<ManualRun>),
        (status = 401, description = "Unauthorized", body = crate::error::UnauthorizedResponse),
    ),
    security(("api_key" = []))
)]
pub async fn list_runs(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    query: web::Query<ListManualRunsQuery>,
) -> AppResult<HttpResponse> {
    let runs: Vec<ManualRun> = pool
        .list_manual_runs(&query)
        .await?
        .into_iter()
        .map(ManualRun::from_entity)
        .collect();
    Ok(HttpResponse::Ok().json(runs))
}

#[utoipa::path(
    patch,
    path = "/api/e2e_manual_runs/{id}",
    tag = "E2E Manual Runs",
    params(("id" = i32, Path, description = "Run id")),
    request_body = UpdateManualRunRequest,
    responses(
        (status = 200, description = "Run updated", body = ManualRun),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Run already finished or transition not allowed", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn update_run(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<i32>,
    body: web::Json<UpdateManualRunRequest>,
) -> AppResult<HttpResponse> {
    let run = manual_runs::update_run(&pool, path.into_inner(), body.into_inner()).await?;

    broadcaster.publish(WsEvent::ManualRunUpdated(run.clone()));
    Ok(HttpResponse::Ok().json(run))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/e2e_manual_runs")
            .route(web::get().to(list_runs))
            .route(web::post().to(create_run)),
    )
    .service(web::resource("/e2e_manual_runs/{id}").route(web::patch().to(update_run)));
}
