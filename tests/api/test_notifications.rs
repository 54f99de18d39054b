//! Notification center against PostgreSQL.

use actix_web::test;
use serde_json::json;

use my_dashboard_lib::services::EventBroadcaster;

use super::test_helpers::*;

async fn create_notification<S, B>(app: &S, title: &str) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let (status, body) = call(
        app,
        test::TestRequest::post().uri("/api/notifications").set_json(json!({
            "title": title,
            "message": "E2E pipeline finished",
            "type": "success",
            "link": "https://ci.example.com/runs/1",
        })),
    )
    .await;
    assert_eq!(status, 201, "create failed: {}", body);
    assert_eq!(body["type"], "success");
    assert_eq!(body["isRead"], false);
    body["id"].as_i64().unwrap()
}

#[actix_rt::test]
#[ignore]
async fn test_mark_read_is_idempotent() {
    let pool = db_pool().await;
    let broadcaster = EventBroadcaster::new();
    let app = create_test_app_with_events(&pool, broadcaster.clone()).await;
    let id = create_notification(&app, "Nightly run passed").await;
    let mut events = broadcaster.subscribe();

    for attempt in 0..2 {
        let (status, body) = call(
            &app,
            test::TestRequest::patch().uri(&format!("/api/notifications/{}/read", id)),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["id"], id);
        assert_eq!(body["isRead"], true);

        // Only the first call changes anything.
        if attempt == 0 {
            let event = serde_json::to_value(events.try_recv().unwrap()).unwrap();
            assert_eq!(event["type"], "notifications_changed");
        } else {
            assert!(events.try_recv().is_err());
        }
    }
}

#[actix_rt::test]
#[ignore]
async fn test_missing_notification_returns_404() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        test::TestRequest::patch().uri("/api/notifications/2147483000/read"),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = call(
        &app,
        test::TestRequest::delete().uri("/api/notifications/2147483000"),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
#[ignore]
async fn test_bulk_actions_on_selected_ids() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let a = create_notification(&app, "Bulk A").await;
    let b = create_notification(&app, "Bulk B").await;

    let (status, body) = call(
        &app,
        test::TestRequest::patch()
            .uri("/api/notifications/read-all")
            .set_json(json!({ "ids": [a, b] })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["affected"], 2);

    let (status, body) = call(
        &app,
        test::TestRequest::delete()
            .uri("/api/notifications")
            .set_json(json!({ "ids": [a, b] })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["affected"], 2);

    let (status, _) = call(
        &app,
        test::TestRequest::delete().uri(&format!("/api/notifications/{}", a)),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
#[ignore]
async fn test_bulk_delete_with_empty_selection_affects_nothing() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_notification(&app, "Survivor").await;

    let (status, body) = call(
        &app,
        test::TestRequest::delete()
            .uri("/api/notifications")
            .set_json(json!({ "ids": [] })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["affected"], 0);

    let (status, _) = call(
        &app,
        test::TestRequest::patch().uri(&format!("/api/notifications/{}/read", id)),
    )
    .await;
    assert_eq!(status, 200);
}

#[actix_rt::test]
#[ignore]
async fn test_bulk_actions_on_unknown_ids_affect_nothing() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_notification(&app, "Untouched").await;
    let unknown = json!({ "ids": [2147483000, 2147483001] });

    let (status, body) = call(
        &app,
        test::TestRequest::delete()
            .uri("/api/notifications")
            .set_json(unknown.clone()),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["affected"], 0);

    let (status, body) = call(
        &app,
        test::TestRequest::patch()
            .uri("/api/notifications/read-all")
            .set_json(unknown),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["affected"], 0);

    // Still there.
    let (status, _) = call(
        &app,
        test::TestRequest::delete().uri(&format!("/api/notifications/{}", id)),
    )
    .await;
    assert_eq!(status, 204);
}

#[actix_rt::test]
#[ignore]
async fn test_unread_filter_and_counts() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_notification(&app, "Counted").await;

    let (status, body) = call(
        &app,
        test::TestRequest::get().uri("/api/notifications?unreadOnly=true&limit=200"),
    )
    .await;
    assert_eq!(status, 200);
    let items = body["notifications"].as_array().unwrap();
    assert!(items.iter().all(|n| n["isRead"] == false));
    assert!(body["unreadCount"].as_u64().unwrap() >= 1);
    assert!(body["total"].as_u64().unwrap() >= body["unreadCount"].as_u64().unwrap());

    call(
        &app,
        test::TestRequest::patch().uri(&format!("/api/notifications/{}/read", id)),
    )
    .await;
}
