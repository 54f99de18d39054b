//! E2E report API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    GenerateReportRequest, GenerateReportResponse, ReportDetailResponse, ReportGenerationRequest,
    ReportQuery, ReportResponse, WsEvent, parse_report_date,
};
use crate::services::e2e_report::{generate_report, get_report_detail};
use crate::services::{EventBroadcaster, PubSub};

#[utoipa::path(
    get,
    path = "/api/e2e_run_report",
    tag = "E2E Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Summary with per-app details", body = ReportResponse),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::UnauthorizedResponse),
    ),
    security(("api_key" = []))
)]
pub async fn get_report(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    query: web::Query<ReportQuery>,
) -> AppResult<HttpResponse> {
    let date = query.resolved_date()?;
    let force = query.force();

    let previous = pool
        .get_report_summary_by_date(date)
        .await?
        .and_then(|s| s.generated_at);
    let report = generate_report(&pool, date, force, None).await?;

    if report.summary.generated_at != previous {
        broadcaster.publish(WsEvent::report_updated(&report.summary, None));
    }
    Ok(HttpResponse::Ok().json(report))
}

#[utoipa::path(
    get,
    path = "/api/e2e_run_report/{summaryId}/{appId}",
    tag = "E2E Reports",
    params(
        ("summaryId" = i32, Path, description = "Report summary id"),
        ("appId" = i32, Path, description = "App id"),
    ),
    responses(
        (status = 200, description = "Detail row and the runs behind it", body = ReportDetailResponse),
        (status = 404, description = "No such summary or detail", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn get_app_detail(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (summary_id, app_id) = path.into_inner();
    let detail = get_report_detail(&pool, summary_id, app_id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[utoipa::path(
    post,
    path = "/api/e2e_run_report/generate",
    tag = "E2E Reports",
    request_body(content = GenerateReportRequest, description = "Optional; defaults to today (UTC)"),
    responses(
        (status = 202, description = "Generation request published", body = GenerateReportResponse),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse),
        (status = 500, description = "Broker unavailable", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn request_generation(
    _auth: ApiKeyAuth,
    pubsub: web::Data<PubSub>,
    body: Option<web::Json<GenerateReportRequest>>,
) -> AppResult<HttpResponse> {
    let req = match body.and_then(|b| b.into_inner().date) {
        Some(date) => ReportGenerationRequest::for_date(parse_report_date(&date)?),
        None => ReportGenerationRequest::for_today(),
    };

    let receivers = pubsub.publish_report_request(&req).await?;
    info!(
        date = %req.date,
        request_id = %req.request_id,
        receivers,
        "Report generation requested"
    );

    Ok(HttpResponse::Accepted().json(GenerateReportResponse {
        date: req.date.to_string(),
        request_id: req.request_id,
        receivers,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/e2e_run_report").route(web::get().to(get_report)))
        .service(
            web::resource("/e2e_run_report/generate").route(web::post().to(request_generation)),
        )
        .service(
            web::resource("/e2e_run_report/{summary_id}/{app_id}")
                .route(web::get().to(get_app_detail)),
        );
}
