//! Input validation that is rejected before the database is touched.

use actix_web::test;
use serde_json::json;

use my_dashboard_lib::services::EventBroadcaster;
use my_dashboard_lib::services::report_consumer::handle_message;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_blank_todo_title_is_rejected() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/to_do_list")
            .set_json(json!({ "title": "   " })),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "title is required");
}

#[actix_rt::test]
async fn test_malformed_json_is_a_validation_error() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/apps")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": "),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_non_numeric_path_id_is_rejected() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(&app, test::TestRequest::get().uri("/api/to_do_list/abc")).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_invalid_report_date_is_rejected() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        test::TestRequest::get().uri("/api/e2e_run_report?date=2025-13-45"),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/e2e_run_report/generate")
            .set_json(json!({ "date": "yesterday" })),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_out_of_range_report_year_is_rejected() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        test::TestRequest::get().uri("/api/e2e_run_report?date=%2B262142-12-31"),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/e2e_run_report/generate")
            .set_json(json!({ "date": "+262142-12-31" })),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_consumer_skips_out_of_range_year() {
    let pool = lazy_pool().await;
    let broadcaster = EventBroadcaster::new();
    let mut events = broadcaster.subscribe();

    handle_message(
        &pool,
        &broadcaster,
        r#"{"date":"+262142-12-31","requestId":"far-future"}"#,
    )
    .await;

    assert!(events.try_recv().is_err());
}

#[actix_rt::test]
async fn test_manual_run_with_invalid_app_id() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/e2e_manual_runs")
            .set_json(json!({ "appId": 0 })),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["message"], "Invalid appId: app does not exist");
}

#[actix_rt::test]
async fn test_malformed_bulk_body_is_rejected() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        test::TestRequest::patch()
            .uri("/api/notifications/read-all")
            .set_payload("{\"ids\": [1, \"two\"]}"),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_unknown_notification_type_is_rejected() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        test::TestRequest::post().uri("/api/notifications").set_json(json!({
            "title": "Deploy",
            "message": "Done",
            "type": "celebration",
        })),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}
