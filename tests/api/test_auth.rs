//! API key guard and public endpoints.

use actix_web::test;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_missing_key_returns_exact_401_body() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call_raw(&app, test::TestRequest::get().uri("/api/to_do_list")).await;

    assert_eq!(status, 401);
    assert_eq!(body, json!({ "error": "Unauthorized: Invalid or missing API key" }));
}

#[actix_rt::test]
async fn test_wrong_key_is_rejected() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call_raw(
        &app,
        test::TestRequest::get()
            .uri("/api/notifications")
            .insert_header(("x-api-key", "not-the-key")),
    )
    .await;

    assert_eq!(status, 401);
    assert_eq!(body["error"], "Unauthorized: Invalid or missing API key");
}

#[actix_rt::test]
async fn test_validate_accepts_configured_key() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(&app, test::TestRequest::post().uri("/api/auth/validate")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "valid": true }));

    let (status, _) = call_raw(&app, test::TestRequest::post().uri("/api/auth/validate")).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_health_is_public() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call_raw(&app, test::TestRequest::get().uri("/api/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[actix_rt::test]
async fn test_ready_reports_unreachable_database() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call_raw(&app, test::TestRequest::get().uri("/api/ready")).await;
    assert_eq!(status, 503);
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["database"], "unavailable");
}

#[actix_rt::test]
async fn test_websocket_requires_key() {
    let pool = lazy_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call_raw(
        &app,
        test::TestRequest::get()
            .uri("/api/ws")
            .insert_header(("upgrade", "websocket"))
            .insert_header(("connection", "Upgrade"))
            .insert_header(("sec-websocket-version", "13"))
            .insert_header(("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ==")),
    )
    .await;

    assert_eq!(status, 401);
    assert_eq!(body["error"], "Unauthorized: Invalid or missing API key");
}
