//! Domain models and wire types for the dashboard API.

use serde::Serialize;
use utoipa::ToSchema;

pub mod app;
pub mod device_token;
pub mod e2e_report;
pub mod manual_run;
pub mod notification;
pub mod pull_request;
pub mod todo;
pub mod ws_event;

// Re-export commonly used types
pub use app::{App, CreateAppRequest, ListAppsQuery, UpdateAppRequest};
pub use device_token::{DeviceToken, RegisterDeviceTokenRequest};
pub use e2e_report::{
    GenerateReportRequest, GenerateReportResponse, LastRunStatus, ReportDetail,
    ReportDetailResponse, ReportGenerationRequest, ReportQuery, ReportResponse, ReportStatus,
    ReportSummary, parse_report_date,
};
pub use manual_run::{
    CreateManualRunRequest, ListManualRunsQuery, ManualRun, ManualRunStatus,
    UpdateManualRunRequest,
};
pub use notification::{
    BulkActionResponse, BulkNotificationRequest, CreateNotificationRequest,
    ListNotificationsQuery, NewNotification, Notification, NotificationListResponse,
    NotificationType,
};
pub use pull_request::{
    CreatePullRequestRequest, ListPullRequestsQuery, PullRequest, PullRequestState,
    UpdatePullRequestRequest,
};
pub use todo::{CreateTodoRequest, Todo, UpdateTodoRequest};
pub use ws_event::{WsEvent, WsEventMessage};

/// Response of `POST /api/auth/validate`.
#[derive(Debug, Clone, Serialize, serde::Deserialize, ToSchema)]
pub struct ValidateKeyResponse {
    pub valid: bool,
}
