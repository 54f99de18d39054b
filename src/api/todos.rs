//! To-do list API handlers.

use actix_web::{HttpResponse, web};

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{CreateTodoRequest, Todo, UpdateTodoRequest};

#[utoipa::path(
    get,
    path = "/api/to_do_list",
    tag = "Todos",
    responses(
        (status = 200, description = "All to-dos", body = Vec<Todo>),
        (status = 401, description = "Unauthorized", body = crate::error::UnauthorizedResponse),
    ),
    security(("api_key" = []))
)]
pub async fn list_todos(_auth: ApiKeyAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let todos: Vec<Todo> = pool
        .list_todos()
        .await?
        .into_iter()
        .map(Todo::from_entity)
        .collect();
    Ok(HttpResponse::Ok().json(todos))
}

#[utoipa::path(
    post,
    path = "/api/to_do_list",
    tag = "Todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "To-do created", body = Todo),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::UnauthorizedResponse),
    ),
    security(("api_key" = []))
)]
pub async fn create_todo(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateTodoRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner().validate()?;
    let todo = pool.insert_todo(req).await?;
    Ok(HttpResponse::Created().json(Todo::from_entity(todo)))
}

#[utoipa::path(
    get,
    path = "/api/to_do_list/{id}",
    tag = "Todos",
    params(("id" = i32, Path, description = "To-do id")),
    responses(
        (status = 200, description = "To-do", body = Todo),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn get_todo(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let todo = pool
        .get_todo(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Todo {}", id)))?;
    Ok(HttpResponse::Ok().json(Todo::from_entity(todo)))
}

#[utoipa::path(
    put,
    path = "/api/to_do_list/{id}",
    tag = "Todos",
    params(("id" = i32, Path, description = "To-do id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Updated to-do", body = Todo),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn update_todo(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateTodoRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner().validate()?;
    let todo = pool.update_todo(path.into_inner(), req).await?;
    Ok(HttpResponse::Ok().json(Todo::from_entity(todo)))
}

#[utoipa::path(
    delete,
    path = "/api/to_do_list/{id}",
    tag = "Todos",
    params(("id" = i32, Path, description = "To-do id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn delete_todo(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    pool.delete_todo(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/to_do_list")
            .route(web::get().to(list_todos))
            .route(web::post().to(create_todo)),
    )
    .service(
        web::resource("/to_do_list/{id}")
            .route(web::get().to(get_todo))
            .route(web::put().to(update_todo))
            .route(web::delete().to(delete_todo)),
    );
}
