//! E2E report aggregation against PostgreSQL.

use actix_web::test;
use serde_json::{Value, json};

use my_dashboard_lib::db::DbPool;
use my_dashboard_lib::entity::{e2e_report_detail, e2e_report_summary};
use my_dashboard_lib::services::EventBroadcaster;
use my_dashboard_lib::services::e2e_report::generate_report;
use my_dashboard_lib::services::report_consumer::handle_message;

use super::test_helpers::*;

fn detail_for(report: &Value, app_id: i64) -> Value {
    report["details"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["appId"] == app_id)
        .cloned()
        .unwrap_or(Value::Null)
}

fn assert_summary_matches_details(report: &Value) {
    let details = report["details"].as_array().unwrap();
    let sum = |field: &str| details.iter().map(|d| d[field].as_i64().unwrap()).sum::<i64>();
    assert_eq!(report["summary"]["totalRuns"].as_i64().unwrap(), sum("totalRuns"));
    assert_eq!(report["summary"]["passedRuns"].as_i64().unwrap(), sum("passedRuns"));
    assert_eq!(report["summary"]["failedRuns"].as_i64().unwrap(), sum("failedRuns"));
}

/// Stored summary and details for `date`, read without regenerating.
async fn stored_report(
    pool: &DbPool,
    date: chrono::NaiveDate,
) -> (e2e_report_summary::Model, Vec<e2e_report_detail::Model>) {
    let summary = pool.get_report_summary_by_date(date).await.unwrap().unwrap();
    let details = pool
        .get_report_details(summary.id)
        .await
        .unwrap()
        .into_iter()
        .map(|(d, _)| d)
        .collect();
    (summary, details)
}

fn assert_stored_counters_match(
    summary: &e2e_report_summary::Model,
    details: &[e2e_report_detail::Model],
) {
    assert_eq!(summary.total_runs, details.iter().map(|d| d.total_runs).sum::<i32>());
    assert_eq!(summary.passed_runs, details.iter().map(|d| d.passed_runs).sum::<i32>());
    assert_eq!(summary.failed_runs, details.iter().map(|d| d.failed_runs).sum::<i32>());

    let mut app_ids: Vec<i32> = details.iter().map(|d| d.app_id).collect();
    app_ids.sort_unstable();
    app_ids.dedup();
    assert_eq!(app_ids.len(), details.len(), "duplicate detail rows");
}

async fn finish_run<S, B>(app: &S, app_id: i64, outcome: &str)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let (status, run) = call(
        app,
        test::TestRequest::post()
            .uri("/api/e2e_manual_runs")
            .set_json(json!({ "appId": app_id })),
    )
    .await;
    assert_eq!(status, 201);
    let (status, _) = call(
        app,
        test::TestRequest::patch()
            .uri(&format!("/api/e2e_manual_runs/{}", run["id"]))
            .set_json(json!({ "status": outcome })),
    )
    .await;
    assert_eq!(status, 200);
}

#[actix_rt::test]
#[ignore]
async fn test_forced_report_counts_finished_runs() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let app_id = create_test_app_record(&app, "report").await;

    for outcome in ["passed", "failed", "passed"] {
        finish_run(&app, app_id, outcome).await;
    }

    let (status, report) = call(
        &app,
        test::TestRequest::get().uri("/api/e2e_run_report?force=true"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(report["summary"]["status"], "ready");
    assert_summary_matches_details(&report);

    let detail = detail_for(&report, app_id);
    assert_eq!(detail["totalRuns"], 3);
    assert_eq!(detail["passedRuns"], 2);
    assert_eq!(detail["failedRuns"], 1);
    assert_eq!(detail["successRate"], 66.67);
    assert_eq!(detail["lastRunStatus"], "passed");

    let (status, drill) = call(
        &app,
        test::TestRequest::get().uri(&format!(
            "/api/e2e_run_report/{}/{}",
            report["summary"]["id"], app_id
        )),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(drill["runs"].as_array().unwrap().len(), 3);
}

#[actix_rt::test]
#[ignore]
async fn test_consumer_message_is_idempotent() {
    let pool = db_pool().await;
    let broadcaster = EventBroadcaster::new();
    let mut events = broadcaster.subscribe();
    let date = unique_report_date();

    let pending = pool.ensure_report_summary(date).await.unwrap();
    assert_eq!(pending.status, "pending");

    let payload = json!({ "date": date.to_string(), "requestId": "abc" }).to_string();
    handle_message(&pool, &broadcaster, &payload).await;
    let (first, first_details) = stored_report(&pool, date).await;
    assert_eq!(first.id, pending.id);
    assert_eq!(first.status, "ready");

    handle_message(&pool, &broadcaster, &payload).await;
    let (second, second_details) = stored_report(&pool, date).await;

    assert_eq!(second.id, first.id);
    assert_eq!(second.status, "ready");
    assert_eq!(second.last_request_id.as_deref(), Some("abc"));
    assert_eq!(
        (second.total_runs, second.passed_runs, second.failed_runs, second.success_rate),
        (first.total_runs, first.passed_runs, first.failed_runs, first.success_rate)
    );
    assert_eq!(second_details.len(), first_details.len());
    assert_stored_counters_match(&second, &second_details);

    let event = serde_json::to_value(events.recv().await.unwrap()).unwrap();
    assert_eq!(event["type"], "report_updated");
}

#[actix_rt::test]
#[ignore]
async fn test_concurrent_recompute_does_not_duplicate_details() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    create_test_app_record(&app, "race").await;
    let date = unique_report_date();

    let (left, right) = tokio::join!(
        generate_report(&pool, date, true, Some("left")),
        generate_report(&pool, date, true, Some("right")),
    );
    left.unwrap();
    right.unwrap();

    let (summary, details) = stored_report(&pool, date).await;
    assert_eq!(summary.status, "ready");
    assert!(!details.is_empty());
    assert_stored_counters_match(&summary, &details);
}

#[actix_rt::test]
#[ignore]
async fn test_deleting_app_invalidates_cached_report() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;
    let doomed = create_test_app_record(&app, "doomed").await;
    let kept = create_test_app_record(&app, "kept").await;
    finish_run(&app, doomed, "failed").await;
    finish_run(&app, kept, "passed").await;

    let (status, report) = call(
        &app,
        test::TestRequest::get().uri("/api/e2e_run_report?force=true"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(detail_for(&report, doomed)["totalRuns"], 1);

    let (status, _) = call(
        &app,
        test::TestRequest::delete().uri(&format!("/api/apps/{}", doomed)),
    )
    .await;
    assert_eq!(status, 204);

    let (status, report) = call(&app, test::TestRequest::get().uri("/api/e2e_run_report")).await;
    assert_eq!(status, 200);
    assert_eq!(report["summary"]["status"], "ready");
    assert_eq!(detail_for(&report, doomed), Value::Null);
    assert_eq!(detail_for(&report, kept)["totalRuns"], 1);
    assert_summary_matches_details(&report);
}

#[actix_rt::test]
#[ignore]
async fn test_invalid_consumer_payload_is_skipped() {
    let pool = db_pool().await;
    let broadcaster = EventBroadcaster::new();
    let mut events = broadcaster.subscribe();

    handle_message(&pool, &broadcaster, "{\"date\": \"not-a-date\"}").await;
    handle_message(&pool, &broadcaster, "garbage").await;

    assert!(events.try_recv().is_err());
}

#[actix_rt::test]
#[ignore]
async fn test_unknown_summary_detail_returns_404() {
    let pool = db_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call(
        &app,
        test::TestRequest::get().uri("/api/e2e_run_report/2147483000/1"),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}
