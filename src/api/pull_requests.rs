//! Pull request tracker API handlers.

use actix_web::{HttpResponse, web};

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePullRequestRequest, ListPullRequestsQuery, PullRequest, UpdatePullRequestRequest,
};

#[utoipa::path(
    get,
    path = "/api/pull_requests",
    tag = "Pull Requests",
    params(ListPullRequestsQuery),
    responses(
        (status = 200, description = "Tracked pull requests", body = Vec<PullRequest>),
        (status = 401, description = "Unauthorized", body = crate::error::UnauthorizedResponse),
    ),
    security(("api_key" = []))
)]
pub async fn list_pull_requests(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    query: web::Query<ListPullRequestsQuery>,
) -> AppResult<HttpResponse> {
    let prs: Vec<PullRequest> = pool
        .list_pull_requests(query.state)
        .await?
        .into_iter()
        .map(PullRequest::from_entity)
        .collect();
    Ok(HttpResponse::Ok().json(prs))
}

#[utoipa::path(
    post,
    path = "/api/pull_requests",
    tag = "Pull Requests",
    request_body = CreatePullRequestRequest,
    responses(
        (status = 201, description = "Pull request tracked", body = PullRequest),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 409, description = "Already tracked", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn create_pull_request(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreatePullRequestRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner().validate()?;
    let pr = pool.insert_pull_request(req).await?;
    Ok(HttpResponse::Created().json(PullRequest::from_entity(pr)))
}

#[utoipa::path(
    get,
    path = "/api/pull_requests/{id}",
    tag = "Pull Requests",
    params(("id" = i32, Path, description = "Pull request id")),
    responses(
        (status = 200, description = "Pull request", body = PullRequest),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn get_pull_request(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let pr = pool
        .get_pull_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pull request {}", id)))?;
    Ok(HttpResponse::Ok().json(PullRequest::from_entity(pr)))
}

#[utoipa::path(
    put,
    path = "/api/pull_requests/{id}",
    tag = "Pull Requests",
    params(("id" = i32, Path, description = "Pull request id")),
    request_body = UpdatePullRequestRequest,
    responses(
        (status = 200, description = "Updated pull request", body = PullRequest),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn update_pull_request(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdatePullRequestRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner().validate()?;
    let pr = pool.update_pull_request(path.into_inner(), req).await?;
    Ok(HttpResponse::Ok().json(PullRequest::from_entity(pr)))
}

#[utoipa::path(
    delete,
    path = "/api/pull_requests/{id}",
    tag = "Pull Requests",
    params(("id" = i32, Path, description = "Pull request id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn delete_pull_request(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    pool.delete_pull_request(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/pull_requests")
            .route(web::get().to(list_pull_requests))
            .route(web::post().to(create_pull_request)),
    )
    .service(
        web::resource("/pull_requests/{id}")
            .route(web::get().to(get_pull_request))
            .route(web::put().to(update_pull_request))
            .route(web::delete().to(delete_pull_request)),
    );
}
