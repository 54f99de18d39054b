//! To-dos, apps, pull requests and device tokens against PostgreSQL.

use actix_web::test;
use serde_json::{Value, json};
use uuid::Uuid;

use super::test_helpers::*;

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

#[actix_rt::test]
#[ignore]
async fn test_duplicate_app_code_conflicts() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let code = unique_code("dup");
    let body = json!({ "name": "First", "code": code });

    let (status, _) = call(&app, test::TestRequest::post().uri("/api/apps").set_json(&body)).await;
    assert_eq!(status, 201);

    let (status, body) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/apps")
            .set_json(json!({ "name": "Second", "code": code })),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "CONFLICT");
}

#[actix_rt::test]
#[ignore]
async fn test_watching_filter() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let watched = create_test_app_record(&app, "watched").await;
    let code = unique_code("quiet");
    let (status, quiet) = call(
        &app,
        test::TestRequest::post().uri("/api/apps").set_json(json!({
            "name": format!("App {}", code),
            "code": code,
            "watching": false,
        })),
    )
    .await;
    assert_eq!(status, 201);
    let quiet = quiet["id"].as_i64().unwrap();

    let (status, list) = call(&app, test::TestRequest::get().uri("/api/apps?watching=true")).await;
    assert_eq!(status, 200);
    assert!(list.as_array().unwrap().iter().all(|a| a["watching"] == true));
    assert!(ids(&list).contains(&watched));
    assert!(!ids(&list).contains(&quiet));

    let (status, list) = call(&app, test::TestRequest::get().uri("/api/apps?watching=false")).await;
    assert_eq!(status, 200);
    assert!(ids(&list).contains(&quiet));
    assert!(!ids(&list).contains(&watched));
}

#[actix_rt::test]
#[ignore]
async fn test_duplicate_pull_request_conflicts() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let number = (Uuid::new_v4().as_u128() % 1_000_000) as i64 + 1;
    let body = json!({
        "repository": "mattermost/my-dashboard",
        "number": number,
        "title": "Add report drill-down",
        "url": format!("https://github.com/mattermost/my-dashboard/pull/{}", number),
    });

    let (status, pr) = call(
        &app,
        test::TestRequest::post().uri("/api/pull_requests").set_json(&body),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(pr["state"], "open");

    let (status, err) = call(
        &app,
        test::TestRequest::post().uri("/api/pull_requests").set_json(&body),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(err["error"], "CONFLICT");

    let (status, _) = call(
        &app,
        test::TestRequest::delete().uri(&format!("/api/pull_requests/{}", pr["id"])),
    )
    .await;
    assert_eq!(status, 204);
}

#[actix_rt::test]
#[ignore]
async fn test_device_token_registration_is_idempotent() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let token = format!("fcm-{}", Uuid::new_v4());
    let body = json!({ "token": token, "platform": "Android" });

    let (status, first) = call(
        &app,
        test::TestRequest::post().uri("/api/device_tokens").set_json(&body),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(first["platform"], "android");

    let (status, second) = call(
        &app,
        test::TestRequest::post().uri("/api/device_tokens").set_json(&body),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(second["id"], first["id"]);

    let uri = format!("/api/device_tokens/{}", token);
    let (status, _) = call(&app, test::TestRequest::delete().uri(&uri)).await;
    assert_eq!(status, 204);
    let (status, body) = call(&app, test::TestRequest::delete().uri(&uri)).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
#[ignore]
async fn test_todo_update_keeps_absent_fields() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;

    let (status, todo) = call(
        &app,
        test::TestRequest::post().uri("/api/to_do_list").set_json(json!({
            "title": "Triage flaky spec",
            "description": "channels suite",
            "link": "https://ci.example.com/runs/7",
            "dueDate": "2025-10-10",
        })),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(todo["isCompleted"], false);
    let uri = format!("/api/to_do_list/{}", todo["id"]);

    let (status, updated) = call(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "isCompleted": true })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["isCompleted"], true);
    assert_eq!(updated["title"], "Triage flaky spec");
    assert_eq!(updated["description"], "channels suite");
    assert_eq!(updated["link"], "https://ci.example.com/runs/7");
    assert_eq!(updated["dueDate"], "2025-10-10");

    let (status, _) = call(&app, test::TestRequest::delete().uri(&uri)).await;
    assert_eq!(status, 204);
    let (status, _) = call(&app, test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, 404);
}
