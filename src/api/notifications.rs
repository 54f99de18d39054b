//! Notification center API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::auth::ApiKeyAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    BulkActionResponse, BulkNotificationRequest, CreateNotificationRequest,
    ListNotificationsQuery, Notification, NotificationListResponse, WsEvent,
};
use crate::services::EventBroadcaster;

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    params(ListNotificationsQuery),
    responses(
        (status = 200, description = "Notifications, newest first", body = NotificationListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::UnauthorizedResponse),
    ),
    security(("api_key" = []))
)]
pub async fn list_notifications(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    query: web::Query<ListNotificationsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = pool
        .list_notifications(query.unread_only.unwrap_or(false), query.clamped_limit())
        .await?;

    Ok(HttpResponse::Ok().json(NotificationListResponse {
        notifications: page
            .notifications
            .into_iter()
            .map(Notification::from_entity)
            .collect(),
        total: page.total,
        unread_count: page.unread_count,
    }))
}

#[utoipa::path(
    post,
    path = "/api/notifications",
    tag = "Notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = Notification),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::UnauthorizedResponse),
    ),
    security(("api_key" = []))
)]
pub async fn create_notification(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Json<CreateNotificationRequest>,
) -> AppResult<HttpResponse> {
    let new = body.into_inner().validate()?;
    let notification = Notification::from_entity(pool.insert_notification(new).await?);

    info!(
        notification_id = notification.id,
        kind = %notification.notification_type,
        "Notification created"
    );
    broadcaster.publish(WsEvent::NotificationCreated(notification.clone()));

    Ok(HttpResponse::Created().json(notification))
}

#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification is read", body = Notification),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn mark_read(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let (notification, changed) = pool.mark_notification_read(id).await?;

    if changed {
        broadcaster.publish(WsEvent::notifications_read(Some(vec![id]), 1));
    }
    Ok(HttpResponse::Ok().json(Notification::from_entity(notification)))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    tag = "Notifications",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn delete_notification(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.delete_notification(id).await?;

    broadcaster.publish(WsEvent::notifications_deleted(Some(vec![id]), 1));
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    patch,
    path = "/api/notifications/read-all",
    tag = "Notifications",
    request_body(content = BulkNotificationRequest, description = "Optional; restricts the action to these ids"),
    responses(
        (status = 200, description = "Notifications marked read", body = BulkActionResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn mark_all_read(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let ids = parse_bulk_body(&body)?.ids;
    let affected = pool.mark_notifications_read(ids.as_deref()).await?;

    info!(affected, "Notifications marked read");
    if affected > 0 {
        broadcaster.publish(WsEvent::notifications_read(ids, affected));
    }
    Ok(HttpResponse::Ok().json(BulkActionResponse { affected }))
}

#[utoipa::path(
    delete,
    path = "/api/notifications",
    tag = "Notifications",
    request_body(content = BulkNotificationRequest, description = "Optional; restricts the action to these ids"),
    responses(
        (status = 200, description = "Notifications deleted", body = BulkActionResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    ),
    security(("api_key" = []))
)]
pub async fn delete_all(
    _auth: ApiKeyAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let ids = parse_bulk_body(&body)?.ids;
    let affected = pool.delete_notifications(ids.as_deref()).await?;

    info!(affected, "Notifications deleted");
    if affected > 0 {
        broadcaster.publish(WsEvent::notifications_deleted(ids, affected));
    }
    Ok(HttpResponse::Ok().json(BulkActionResponse { affected }))
}

/// An empty body selects every notification.
fn parse_bulk_body(body: &[u8]) -> AppResult<BulkNotificationRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BulkNotificationRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/notifications")
            .route(web::get().to(list_notifications))
            .route(web::post().to(create_notification))
            .route(web::delete().to(delete_all)),
    )
    .service(web::resource("/notifications/read-all").route(web::patch().to(mark_all_read)))
    .service(web::resource("/notifications/{id}/read").route(web::patch().to(mark_read)))
    .service(web::resource("/notifications/{id}").route(web::delete().to(delete_notification)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_selects_everything() {
        assert!(parse_bulk_body(b"").unwrap().ids.is_none());
        assert!(parse_bulk_body(b"  \n").unwrap().ids.is_none());
    }

    #[test]
    fn test_body_with_ids() {
        let req = parse_bulk_body(br#"{"ids":[3,4]}"#).unwrap();
        assert_eq!(req.ids, Some(vec![3, 4]));
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        assert!(matches!(
            parse_bulk_body(b"{ids"),
            Err(AppError::Validation(_))
        ));
    }
}
