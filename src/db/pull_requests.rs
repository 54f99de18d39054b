//! Database queries for tracked pull requests.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::pull_request::{self, ActiveModel, Entity as PullRequest};
use crate::error::{AppError, AppResult};
use crate::models::{CreatePullRequestRequest, PullRequestState, UpdatePullRequestRequest};

use super::{Constraint, DbPool, constraint_violation};

impl DbPool {
    /// List pull requests, most recently updated first.
    pub async fn list_pull_requests(
        &self,
        state: Option<PullRequestState>,
    ) -> AppResult<Vec<pull_request::Model>> {
        let mut select = PullRequest::find();
        if let Some(state) = state {
            select = select.filter(pull_request::Column::State.eq(state.as_str()));
        }

        select
            .order_by_desc(pull_request::Column::UpdatedAt)
            .order_by_desc(pull_request::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list pull requests: {}", e)))
    }

    pub async fn get_pull_request(&self, id: i32) -> AppResult<Option<pull_request::Model>> {
        PullRequest::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get pull request: {}", e)))
    }

    /// Track a pull request. A duplicate (repository, number) yields `Conflict`.
    pub async fn insert_pull_request(
        &self,
        req: CreatePullRequestRequest,
    ) -> AppResult<pull_request::Model> {
        let now = Utc::now();
        let label = format!("{}#{}", req.repository, req.number);
        let model = ActiveModel {
            repository: Set(req.repository),
            number: Set(req.number),
            title: Set(req.title),
            author: Set(req.author),
            url: Set(req.url),
            state: Set(PullRequestState::Open.as_str().to_string()),
            approved: Set(false),
            approvals_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(self.connection()).await.map_err(|e| {
            match constraint_violation(&e) {
                Some(Constraint::Unique(_)) => {
                    AppError::Conflict(format!("Pull request {} is already tracked", label))
                }
                _ => AppError::Database(format!("Failed to insert pull request: {}", e)),
            }
        })
    }

    pub async fn update_pull_request(
        &self,
        id: i32,
        req: UpdatePullRequestRequest,
    ) -> AppResult<pull_request::Model> {
        let existing = self
            .get_pull_request(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pull request {}", id)))?;

        let mut active: ActiveModel = existing.into();
        if let Some(title) = req.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(state) = req.state {
            active.state = Set(state.as_str().to_string());
        }
        if let Some(approved) = req.approved {
            active.approved = Set(approved);
        }
        if let Some(count) = req.approvals_count {
            active.approvals_count = Set(count);
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update pull request: {}", e)))
    }

    pub async fn delete_pull_request(&self, id: i32) -> AppResult<()> {
        let result = PullRequest::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete pull request: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Pull request {}", id)));
        }
        Ok(())
    }
}
