//! Notification domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::notification;
use crate::error::{AppError, AppResult};

/// Default and maximum page sizes for notification listing.
pub const DEFAULT_NOTIFICATION_LIMIT: u64 = 50;
pub const MAX_NOTIFICATION_LIMIT: u64 = 200;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i32,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_entity(m: notification::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            message: m.message,
            notification_type: NotificationType::parse(&m.notification_type)
                .unwrap_or(NotificationType::Info),
            link: m.link,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

/// Request body for creating a notification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    /// One of info, success, warning, error (default: info)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub notification_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Validated notification ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub link: Option<String>,
}

impl CreateNotificationRequest {
    /// Check required fields and the notification type.
    pub fn validate(self) -> AppResult<NewNotification> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }

        let message = self.message.trim().to_string();
        if message.is_empty() {
            return Err(AppError::Validation("message is required".to_string()));
        }

        let notification_type = match self.notification_type.as_deref() {
            None => NotificationType::Info,
            Some(t) => NotificationType::parse(t).ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid type '{}': expected info, success, warning or error",
                    t
                ))
            })?,
        };

        let link = self.link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());

        Ok(NewNotification {
            title,
            message,
            notification_type,
            link,
        })
    }
}

/// Query parameters for listing notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListNotificationsQuery {
    /// Only return unread notifications
    #[serde(default)]
    pub unread_only: Option<bool>,
    /// Maximum number of notifications (default 50, max 200)
    #[serde(default)]
    pub limit: Option<u64>,
}

impl ListNotificationsQuery {
    pub fn clamped_limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_NOTIFICATION_LIMIT)
            .clamp(1, MAX_NOTIFICATION_LIMIT)
    }
}

/// Notification list response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    /// Total matching notifications (before the limit)
    pub total: u64,
    /// Unread notifications overall
    pub unread_count: u64,
}

/// Optional body for bulk notification actions. Without `ids` the
/// action applies to every notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BulkNotificationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<i32>>,
}

/// Result of a bulk action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkActionResponse {
    pub affected: u64,
}
