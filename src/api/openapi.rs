//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, config, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "My Dashboard API",
        description = "Engineering status dashboard: E2E run reports, pull requests, to-dos and notifications"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Auth
        api::auth::validate,
        // To-dos
        api::todos::list_todos,
        api::todos::create_todo,
        api::todos::get_todo,
        api::todos::update_todo,
        api::todos::delete_todo,
        // Notifications
        api::notifications::list_notifications,
        api::notifications::create_notification,
        api::notifications::mark_read,
        api::notifications::delete_notification,
        api::notifications::mark_all_read,
        api::notifications::delete_all,
        // Apps
        api::apps::list_apps,
        api::apps::create_app,
        api::apps::get_app,
        api::apps::update_app,
        api::apps::delete_app,
        // Pull requests
        api::pull_requests::list_pull_requests,
        api::pull_requests::create_pull_request,
        api::pull_requests::get_pull_request,
        api::pull_requests::update_pull_request,
        api::pull_requests::delete_pull_request,
        // Device tokens
        api::device_tokens::register_token,
        api::device_tokens::unregister_token,
        // E2E reports
        api::e2e_reports::get_report,
        api::e2e_reports::get_app_detail,
        api::e2e_reports::request_generation,
        // Manual runs
        api::e2e_manual_runs::create_run,
        api::e2e_manual_runs::list_runs,
        api::e2e_manual_runs::update_run,
        // Live updates
        api::websocket::websocket_handler,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            error::UnauthorizedResponse,
            models::ValidateKeyResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // To-dos
            models::Todo,
            models::CreateTodoRequest,
            models::UpdateTodoRequest,
            // Notifications
            models::NotificationType,
            models::Notification,
            models::CreateNotificationRequest,
            models::NotificationListResponse,
            models::BulkNotificationRequest,
            models::BulkActionResponse,
            // Apps
            models::App,
            models::CreateAppRequest,
            models::UpdateAppRequest,
            // Pull requests
            models::PullRequestState,
            models::PullRequest,
            models::CreatePullRequestRequest,
            models::UpdatePullRequestRequest,
            // Device tokens
            models::DeviceToken,
            models::RegisterDeviceTokenRequest,
            // E2E reports
            models::ReportStatus,
            models::LastRunStatus,
            models::ReportSummary,
            models::ReportDetail,
            models::ReportResponse,
            models::ReportDetailResponse,
            models::GenerateReportRequest,
            models::ReportGenerationRequest,
            models::GenerateReportResponse,
            // Manual runs
            models::ManualRunStatus,
            models::ManualRun,
            models::CreateManualRunRequest,
            models::UpdateManualRunRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "API key validation"),
        (name = "Todos", description = "Personal to-do list"),
        (name = "Notifications", description = "Notification center"),
        (name = "Apps", description = "Monitored application registry"),
        (name = "Pull Requests", description = "Tracked GitHub pull requests"),
        (name = "Device Tokens", description = "Push registration tokens"),
        (name = "E2E Reports", description = "Per-date E2E pass/fail aggregation"),
        (name = "E2E Manual Runs", description = "On-demand E2E pipeline runs"),
        (name = "Live Updates", description = "WebSocket event stream")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add API key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(config::API_KEY_HEADER),
                    ),
                ),
            );
        }
    }
}
