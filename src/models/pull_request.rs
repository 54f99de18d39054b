//! Pull request tracking models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::pull_request;
use crate::error::{AppError, AppResult};

/// Pull request lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    Open,
    Merged,
    Closed,
}

impl PullRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "merged" => Some(Self::Merged),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// A tracked pull request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: i32,
    /// "owner/name"
    pub repository: String,
    pub number: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub state: PullRequestState,
    pub approved: bool,
    pub approvals_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PullRequest {
    pub fn from_entity(m: pull_request::Model) -> Self {
        Self {
            id: m.id,
            repository: m.repository,
            number: m.number,
            title: m.title,
            author: m.author,
            url: m.url,
            state: PullRequestState::parse(&m.state).unwrap_or(PullRequestState::Open),
            approved: m.approved,
            approvals_count: m.approvals_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for tracking a pull request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestRequest {
    pub repository: String,
    pub number: i32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
}

impl CreatePullRequestRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        let repository = self.repository.trim();
        match repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            }
            _ => {
                return Err(AppError::Validation(
                    "repository must look like 'owner/name'".to_string(),
                ));
            }
        }
        self.repository = repository.to_string();

        if self.number <= 0 {
            return Err(AppError::Validation("number must be positive".to_string()));
        }

        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }

        self.url = self.url.trim().to_string();
        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            return Err(AppError::Validation("url must be an http(s) URL".to_string()));
        }

        Ok(self)
    }
}

/// Request body for updating a pull request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePullRequestRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<PullRequestState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approvals_count: Option<i32>,
}

impl UpdatePullRequestRequest {
    pub fn validate(self) -> AppResult<Self> {
        if matches!(self.approvals_count, Some(n) if n < 0) {
            return Err(AppError::Validation(
                "approvalsCount must not be negative".to_string(),
            ));
        }
        if matches!(self.title.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(AppError::Validation("title is required".to_string()));
        }
        Ok(self)
    }
}

/// Query parameters for listing pull requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPullRequestsQuery {
    #[serde(default)]
    pub state: Option<PullRequestState>,
}
