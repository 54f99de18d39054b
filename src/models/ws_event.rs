//! WebSocket event types for live dashboard updates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::e2e_report::{ReportStatus, ReportSummary};
use crate::models::manual_run::ManualRun;
use crate::models::notification::Notification;

/// WebSocket event sent to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum WsEvent {
    /// A notification was created.
    NotificationCreated(Notification),
    /// Notifications were read or deleted.
    NotificationsChanged(NotificationsChangedPayload),
    /// A report summary was regenerated.
    ReportUpdated(ReportUpdatedPayload),
    /// A manual run was created or changed status.
    ManualRunUpdated(ManualRun),
}

/// Payload for notifications_changed events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsChangedPayload {
    /// read or deleted
    pub action: String,
    /// Affected ids; absent when the action covered every notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<i32>>,
    pub affected: u64,
}

/// Payload for report_updated events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportUpdatedPayload {
    pub summary_id: i32,
    pub date: NaiveDate,
    pub status: ReportStatus,
    pub total_runs: i32,
    pub passed_runs: i32,
    pub failed_runs: i32,
    pub success_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Wrapper that includes timestamp with every event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsEventMessage {
    #[serde(flatten)]
    pub event: WsEvent,
    pub timestamp: DateTime<Utc>,
}

impl WsEventMessage {
    /// Create a new event message with the current timestamp.
    pub fn new(event: WsEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}

impl WsEvent {
    pub fn notifications_read(ids: Option<Vec<i32>>, affected: u64) -> Self {
        WsEvent::NotificationsChanged(NotificationsChangedPayload {
            action: "read".to_string(),
            ids,
            affected,
        })
    }

    pub fn notifications_deleted(ids: Option<Vec<i32>>, affected: u64) -> Self {
        WsEvent::NotificationsChanged(NotificationsChangedPayload {
            action: "deleted".to_string(),
            ids,
            affected,
        })
    }

    pub fn report_updated(summary: &ReportSummary, request_id: Option<String>) -> Self {
        WsEvent::ReportUpdated(ReportUpdatedPayload {
            summary_id: summary.id,
            date: summary.date,
            status: summary.status,
            total_runs: summary.total_runs,
            passed_runs: summary.passed_runs,
            failed_runs: summary.failed_runs,
            success_rate: summary.success_rate,
            request_id,
        })
    }
}
