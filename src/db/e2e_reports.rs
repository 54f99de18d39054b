//! Database queries for E2E report summaries and details.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, Statement,
};

use crate::entity::app;
use crate::entity::e2e_report_detail::{self as detail, Entity as ReportDetail};
use crate::entity::e2e_report_summary::{self as summary, Entity as ReportSummary};
use crate::error::{AppError, AppResult};
use crate::models::ReportStatus;

use super::DbPool;

impl DbPool {
    /// Fetch the summary for `date`, creating a pending one if none exists.
    ///
    /// The insert is a no-op when a concurrent caller created the row first,
    /// so at most one summary exists per date.
    pub async fn ensure_report_summary(&self, date: NaiveDate) -> AppResult<summary::Model> {
        self.connection()
            .execute_raw(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                r#"INSERT INTO e2e_report_summaries (date, status)
                   VALUES ($1, 'pending')
                   ON CONFLICT (date) DO NOTHING"#,
                [date.into()],
            ))
            .await
            .map_err(|e| AppError::Database(format!("Failed to create report summary: {}", e)))?;

        self.get_report_summary_by_date(date).await?.ok_or_else(|| {
            AppError::Internal(format!("Report summary for {} missing after insert", date))
        })
    }

    pub async fn get_report_summary(&self, id: i32) -> AppResult<Option<summary::Model>> {
        ReportSummary::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get report summary: {}", e)))
    }

    pub async fn get_report_summary_by_date(
        &self,
        date: NaiveDate,
    ) -> AppResult<Option<summary::Model>> {
        ReportSummary::find()
            .filter(summary::Column::Date.eq(date))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get report summary: {}", e)))
    }

    /// Details of a summary with their apps, ordered by app name.
    pub async fn get_report_details(
        &self,
        summary_id: i32,
    ) -> AppResult<Vec<(detail::Model, Option<app::Model>)>> {
        ReportDetail::find()
            .filter(detail::Column::ReportSummaryId.eq(summary_id))
            .find_also_related(app::Entity)
            .order_by_asc(app::Column::Name)
            .order_by_asc(detail::Column::AppId)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get report details: {}", e)))
    }

    pub async fn get_report_detail(
        &self,
        summary_id: i32,
        app_id: i32,
    ) -> AppResult<Option<(detail::Model, Option<app::Model>)>> {
        ReportDetail::find()
            .filter(detail::Column::ReportSummaryId.eq(summary_id))
            .filter(detail::Column::AppId.eq(app_id))
            .find_also_related(app::Entity)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get report detail: {}", e)))
    }

    /// Flag a summary whose regeneration failed.
    pub async fn mark_report_failed(&self, summary_id: i32) -> AppResult<()> {
        ReportSummary::update_many()
            .col_expr(summary::Column::Status, Expr::value(ReportStatus::Failed.as_str()))
            .filter(summary::Column::Id.eq(summary_id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to mark report failed: {}", e)))?;
        Ok(())
    }
}

// Transaction-scoped helpers used by report regeneration.

/// Load a summary and hold a row lock on it until the transaction ends.
pub(crate) async fn lock_report_summary<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<summary::Model>, DbErr> {
    ReportSummary::find_by_id(id).lock_exclusive().one(conn).await
}

/// Apps included in automated reporting, by id.
pub(crate) async fn watched_apps<C: ConnectionTrait>(conn: &C) -> Result<Vec<app::Model>, DbErr> {
    app::Entity::find()
        .filter(app::Column::Watching.eq(true))
        .order_by_asc(app::Column::Id)
        .all(conn)
        .await
}

/// Swap a summary's detail rows for `rows`.
pub(crate) async fn replace_report_details<C: ConnectionTrait>(
    conn: &C,
    summary_id: i32,
    rows: Vec<detail::ActiveModel>,
) -> Result<(), DbErr> {
    ReportDetail::delete_many()
        .filter(detail::Column::ReportSummaryId.eq(summary_id))
        .exec(conn)
        .await?;

    if !rows.is_empty() {
        ReportDetail::insert_many(rows).exec(conn).await?;
    }
    Ok(())
}

/// Send every summary holding a detail row for `app_id` back to `pending`.
///
/// Run before the app is deleted, in the same transaction, so the cascade
/// on details never leaves a `ready` summary with stale counters. Returns
/// the number of summaries reset.
pub(crate) async fn reset_summaries_for_app<C: ConnectionTrait>(
    conn: &C,
    app_id: i32,
) -> Result<u64, DbErr> {
    let holding_app = Query::select()
        .column(detail::Column::ReportSummaryId)
        .from(ReportDetail)
        .and_where(detail::Column::AppId.eq(app_id))
        .to_owned();

    let result = ReportSummary::update_many()
        .col_expr(summary::Column::Status, Expr::value(ReportStatus::Pending.as_str()))
        .col_expr(summary::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(summary::Column::Id.in_subquery(holding_app))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Aggregate counters written back to a summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SummaryCounters {
    pub total_runs: i32,
    pub passed_runs: i32,
    pub failed_runs: i32,
    pub success_rate: f64,
}

/// Store fresh counters and mark the summary ready.
pub(crate) async fn complete_report_summary<C: ConnectionTrait>(
    conn: &C,
    locked: summary::Model,
    counters: SummaryCounters,
    request_id: Option<String>,
) -> Result<summary::Model, DbErr> {
    let mut active: summary::ActiveModel = locked.into();
    active.status = Set(ReportStatus::Ready.as_str().to_string());
    active.total_runs = Set(counters.total_runs);
    active.passed_runs = Set(counters.passed_runs);
    active.failed_runs = Set(counters.failed_runs);
    active.success_rate = Set(counters.success_rate);
    active.last_request_id = Set(request_id);
    active.generated_at = Set(Some(Utc::now()));
    active.updated_at = Set(Utc::now());
    active.update(conn).await
}
