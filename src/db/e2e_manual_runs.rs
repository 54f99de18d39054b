//! Database queries for manual E2E runs.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::e2e_manual_run::{self as run, ActiveModel, Entity as ManualRun};
use crate::error::{AppError, AppResult};
use crate::models::{CreateManualRunRequest, ListManualRunsQuery, ManualRunStatus};

use super::DbPool;

impl DbPool {
    /// Insert a pending run.
    ///
    /// Returns the raw store error so callers can tell a missing app
    /// (foreign key) from an in-progress run (unique index).
    pub async fn insert_manual_run(&self, req: CreateManualRunRequest) -> Result<run::Model, DbErr> {
        let now = Utc::now();
        let model = ActiveModel {
            app_id: Set(req.app_id),
            status: Set(ManualRunStatus::Pending.as_str().to_string()),
            triggered_by: Set(req.triggered_by),
            pipeline_url: Set(req.pipeline_url),
            created_at: Set(now),
            updated_at: Set(now),
            finished_at: Set(None),
            ..Default::default()
        };

        model.insert(self.connection()).await
    }

    pub async fn get_manual_run(&self, id: i32) -> AppResult<Option<run::Model>> {
        ManualRun::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get manual run: {}", e)))
    }

    /// List runs newest first.
    pub async fn list_manual_runs(&self, query: &ListManualRunsQuery) -> AppResult<Vec<run::Model>> {
        let mut select = ManualRun::find();
        if let Some(app_id) = query.app_id {
            select = select.filter(run::Column::AppId.eq(app_id));
        }
        if let Some(status) = query.status {
            select = select.filter(run::Column::Status.eq(status.as_str()));
        }

        select
            .order_by_desc(run::Column::CreatedAt)
            .order_by_desc(run::Column::Id)
            .limit(query.clamped_limit())
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list manual runs: {}", e)))
    }

    /// Move a run from `from` to `to`.
    ///
    /// The update only applies while the row still has status `from`;
    /// returns `None` when another writer changed it first.
    pub async fn transition_manual_run(
        &self,
        id: i32,
        from: ManualRunStatus,
        to: ManualRunStatus,
        pipeline_url: Option<String>,
    ) -> AppResult<Option<run::Model>> {
        let now = Utc::now();
        let mut update = ManualRun::update_many()
            .col_expr(run::Column::Status, Expr::value(to.as_str()))
            .col_expr(run::Column::UpdatedAt, Expr::value(now))
            .filter(run::Column::Id.eq(id))
            .filter(run::Column::Status.eq(from.as_str()));
        if to.is_terminal() {
            update = update.col_expr(run::Column::FinishedAt, Expr::value(Some(now)));
        }
        if let Some(url) = pipeline_url {
            update = update.col_expr(run::Column::PipelineUrl, Expr::value(Some(url)));
        }

        let result = update
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update manual run: {}", e)))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_manual_run(id).await
    }

    /// Finished runs of one app within `[start, end)`, oldest first.
    pub async fn finished_runs_for_app(
        &self,
        app_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<run::Model>> {
        finished_runs_query(start, end)
            .filter(run::Column::AppId.eq(app_id))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load finished runs: {}", e)))
    }
}

/// Finished (passed or failed) runs within `[start, end)`, oldest first.
///
/// Takes any connection so it can run inside the aggregation transaction.
pub(crate) async fn finished_runs_between<C: ConnectionTrait>(
    conn: &C,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<run::Model>, DbErr> {
    finished_runs_query(start, end).all(conn).await
}

fn finished_runs_query(start: DateTime<Utc>, end: DateTime<Utc>) -> sea_orm::Select<ManualRun> {
    ManualRun::find()
        .filter(
            run::Column::Status.is_in([
                ManualRunStatus::Passed.as_str(),
                ManualRunStatus::Failed.as_str(),
            ]),
        )
        .filter(run::Column::FinishedAt.gte(start))
        .filter(run::Column::FinishedAt.lt(end))
        .order_by_asc(run::Column::FinishedAt)
        .order_by_asc(run::Column::Id)
}
