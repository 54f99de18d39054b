//! Manual E2E run models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::e2e_manual_run;
use crate::error::{AppError, AppResult};

pub const DEFAULT_RUN_LIMIT: u64 = 50;
pub const MAX_RUN_LIMIT: u64 = 500;

/// Manual run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ManualRunStatus {
    Pending,
    Running,
    Passed,
    Failed,
    Cancelled,
}

impl ManualRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Pending and running runs block new runs for the same app.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_in_progress()
    }

    /// Counted by report aggregation.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }

    /// Whether a run in `self` may move to `next`.
    pub fn can_transition_to(&self, next: ManualRunStatus) -> bool {
        match self {
            Self::Pending => next != Self::Pending,
            Self::Running => !matches!(next, Self::Pending | Self::Running),
            _ => false,
        }
    }
}

impl std::fmt::Display for ManualRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A manual E2E run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualRun {
    pub id: i32,
    pub app_id: i32,
    pub status: ManualRunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ManualRun {
    pub fn from_entity(m: e2e_manual_run::Model) -> Self {
        Self {
            id: m.id,
            app_id: m.app_id,
            status: ManualRunStatus::parse(&m.status).unwrap_or(ManualRunStatus::Pending),
            triggered_by: m.triggered_by,
            pipeline_url: m.pipeline_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
            finished_at: m.finished_at,
        }
    }
}

/// Request body for triggering a manual run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateManualRunRequest {
    pub app_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_url: Option<String>,
}

impl CreateManualRunRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        if self.app_id <= 0 {
            return Err(AppError::Validation(
                "Invalid appId: app does not exist".to_string(),
            ));
        }
        self.triggered_by = self
            .triggered_by
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self.pipeline_url = self
            .pipeline_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Ok(self)
    }
}

/// Request body for a run status transition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManualRunRequest {
    pub status: ManualRunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_url: Option<String>,
}

/// Query parameters for listing manual runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListManualRunsQuery {
    #[serde(default)]
    pub app_id: Option<i32>,
    #[serde(default)]
    pub status: Option<ManualRunStatus>,
    /// Maximum number of runs (default 50, max 500)
    #[serde(default)]
    pub limit: Option<u64>,
}

impl ListManualRunsQuery {
    pub fn clamped_limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_RUN_LIMIT).clamp(1, MAX_RUN_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_progress_statuses() {
        assert!(ManualRunStatus::Pending.is_in_progress());
        assert!(ManualRunStatus::Running.is_in_progress());
        assert!(ManualRunStatus::Cancelled.is_terminal());
        assert!(!ManualRunStatus::Cancelled.is_finished());
        assert!(ManualRunStatus::Failed.is_finished());
    }

    #[test]
    fn test_transitions() {
        use ManualRunStatus::*;
        assert!(Pending.can_transition_to(Running));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Running.can_transition_to(Passed));
        assert!(!Running.can_transition_to(Pending));
        assert!(!Passed.can_transition_to(Failed));
        assert!(!Cancelled.can_transition_to(Running));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ManualRunStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        for s in ["pending", "running", "passed", "failed", "cancelled"] {
            assert_eq!(ManualRunStatus::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_create_rejects_non_positive_app_id() {
        let req = CreateManualRunRequest {
            app_id: 0,
            triggered_by: None,
            pipeline_url: None,
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid appId: app does not exist");
    }

    #[test]
    fn test_list_query_camel_case() {
        let q: ListManualRunsQuery =
            serde_json::from_value(serde_json::json!({"appId": 3, "status": "running"})).unwrap();
        assert_eq!(q.app_id, Some(3));
        assert_eq!(q.status, Some(ManualRunStatus::Running));
        assert_eq!(q.clamped_limit(), DEFAULT_RUN_LIMIT);
    }
}
