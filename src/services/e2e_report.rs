//! E2E report aggregation.
//!
//! A summary holds one date's pass/fail counters across watched apps and
//! owns one detail row per app. Regeneration replaces the details and
//! rewrites the counters inside a single transaction that holds a row
//! lock on the summary, so concurrent requests for the same date
//! serialize instead of double counting.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{Set, TransactionTrait};
use tracing::{info, warn};

use crate::db::DbPool;
use crate::db::e2e_manual_runs::finished_runs_between;
use crate::db::e2e_reports::{
    SummaryCounters, complete_report_summary, lock_report_summary, replace_report_details,
    watched_apps,
};
use crate::entity::{e2e_manual_run, e2e_report_detail, e2e_report_summary};
use crate::error::{AppError, AppResult};
use crate::models::{
    App, LastRunStatus, ManualRun, ManualRunStatus, ReportDetail, ReportDetailResponse,
    ReportResponse, ReportStatus, ReportSummary,
};

/// One finished run as seen by the aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOutcome {
    pub app_id: i32,
    pub passed: bool,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    /// `None` for runs that are not finished.
    pub fn from_run(run: &e2e_manual_run::Model) -> Option<Self> {
        let status = ManualRunStatus::parse(&run.status)?;
        if !status.is_finished() {
            return None;
        }
        Some(Self {
            app_id: run.app_id,
            passed: status == ManualRunStatus::Passed,
            finished_at: run.finished_at?,
        })
    }
}

/// Counters for one app.
#[derive(Debug, Clone, PartialEq)]
pub struct AppStats {
    pub app_id: i32,
    pub total_runs: i32,
    pub passed_runs: i32,
    pub failed_runs: i32,
    pub success_rate: f64,
    pub last_run_status: LastRunStatus,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_failed_run_at: Option<DateTime<Utc>>,
}

/// Percentage of passed runs, rounded to two decimals. Zero when there are no runs.
pub fn success_rate(passed: i32, total: i32) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (f64::from(passed) / f64::from(total) * 10_000.0).round() / 100.0
}

/// Fold the runs belonging to `app_id`.
pub fn summarize_app(app_id: i32, runs: &[RunOutcome]) -> AppStats {
    let mut passed = 0;
    let mut failed = 0;
    let mut last: Option<&RunOutcome> = None;
    let mut last_failed_run_at: Option<DateTime<Utc>> = None;

    for run in runs.iter().filter(|r| r.app_id == app_id) {
        if run.passed {
            passed += 1;
        } else {
            failed += 1;
            if last_failed_run_at.is_none_or(|t| run.finished_at >= t) {
                last_failed_run_at = Some(run.finished_at);
            }
        }
        if last.is_none_or(|l| run.finished_at >= l.finished_at) {
            last = Some(run);
        }
    }

    let total = passed + failed;
    AppStats {
        app_id,
        total_runs: total,
        passed_runs: passed,
        failed_runs: failed,
        success_rate: success_rate(passed, total),
        last_run_status: match last {
            None => LastRunStatus::None,
            Some(r) if r.passed => LastRunStatus::Passed,
            Some(_) => LastRunStatus::Failed,
        },
        last_run_at: last.map(|r| r.finished_at),
        last_failed_run_at,
    }
}

/// Per-app stats for every watched app plus the summary counters.
///
/// Runs of apps that are not watched are ignored. Summary counters are
/// the sums of the per-app counters.
pub(crate) fn summarize_report(
    app_ids: &[i32],
    runs: &[RunOutcome],
) -> (Vec<AppStats>, SummaryCounters) {
    let stats: Vec<AppStats> = app_ids.iter().map(|&id| summarize_app(id, runs)).collect();

    let passed: i32 = stats.iter().map(|s| s.passed_runs).sum();
    let failed: i32 = stats.iter().map(|s| s.failed_runs).sum();
    let counters = SummaryCounters {
        total_runs: passed + failed,
        passed_runs: passed,
        failed_runs: failed,
        success_rate: success_rate(passed, passed + failed),
    };

    (stats, counters)
}

/// UTC bounds `[start, end)` of a calendar day.
pub fn day_bounds(date: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| AppError::Validation(format!("Date {} is out of range", date)))?;
    Ok((
        date.and_time(NaiveTime::MIN).and_utc(),
        next.and_time(NaiveTime::MIN).and_utc(),
    ))
}

/// Return the report for `date`, regenerating it when needed.
///
/// A `ready` summary is returned as stored unless `force` is set. Anything
/// else is recomputed from the finished runs of that UTC day. When
/// recomputation fails the summary is marked `failed` and the error
/// propagates.
pub async fn generate_report(
    pool: &DbPool,
    date: NaiveDate,
    force: bool,
    request_id: Option<&str>,
) -> AppResult<ReportResponse> {
    day_bounds(date)?;
    let summary = pool.ensure_report_summary(date).await?;

    if summary.status == ReportStatus::Ready.as_str() && !force {
        return load_report(pool, summary).await;
    }

    let summary = match regenerate(pool, summary.id, date, request_id).await {
        Ok(summary) => summary,
        Err(e) => {
            if let Err(mark_err) = pool.mark_report_failed(summary.id).await {
                warn!(
                    date = %date,
                    error = %mark_err,
                    "Failed to mark report summary as failed"
                );
            }
            return Err(e);
        }
    };

    info!(
        date = %date,
        request_id = request_id.unwrap_or("-"),
        total_runs = summary.total_runs,
        success_rate = summary.success_rate,
        "E2E report regenerated"
    );

    load_report(pool, summary).await
}

async fn regenerate(
    pool: &DbPool,
    summary_id: i32,
    date: NaiveDate,
    request_id: Option<&str>,
) -> AppResult<e2e_report_summary::Model> {
    let txn = pool.connection().begin().await?;

    let locked = lock_report_summary(&txn, summary_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report summary {}", summary_id)))?;

    let app_ids: Vec<i32> = watched_apps(&txn).await?.iter().map(|a| a.id).collect();
    let (start, end) = day_bounds(date)?;
    let runs: Vec<RunOutcome> = finished_runs_between(&txn, start, end)
        .await?
        .iter()
        .filter_map(RunOutcome::from_run)
        .collect();

    let (stats, counters) = summarize_report(&app_ids, &runs);

    let now = Utc::now();
    let rows = stats
        .into_iter()
        .map(|s| e2e_report_detail::ActiveModel {
            report_summary_id: Set(summary_id),
            app_id: Set(s.app_id),
            total_runs: Set(s.total_runs),
            passed_runs: Set(s.passed_runs),
            failed_runs: Set(s.failed_runs),
            success_rate: Set(s.success_rate),
            last_run_status: Set(s.last_run_status.as_str().to_string()),
            last_run_at: Set(s.last_run_at),
            last_failed_run_at: Set(s.last_failed_run_at),
            created_at: Set(now),
            ..Default::default()
        })
        .collect();
    replace_report_details(&txn, summary_id, rows).await?;

    let summary =
        complete_report_summary(&txn, locked, counters, request_id.map(String::from)).await?;

    txn.commit().await?;
    Ok(summary)
}

async fn load_report(
    pool: &DbPool,
    summary: e2e_report_summary::Model,
) -> AppResult<ReportResponse> {
    let details = pool
        .get_report_details(summary.id)
        .await?
        .into_iter()
        .map(|(d, app)| ReportDetail::from_entity(d).with_app(app.map(App::from_entity)))
        .collect();

    Ok(ReportResponse {
        summary: ReportSummary::from_entity(summary),
        details,
    })
}

/// One app's detail row and the runs behind it.
pub async fn get_report_detail(
    pool: &DbPool,
    summary_id: i32,
    app_id: i32,
) -> AppResult<ReportDetailResponse> {
    let summary = pool
        .get_report_summary(summary_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report summary {}", summary_id)))?;

    let (detail, app) = pool
        .get_report_detail(summary_id, app_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Report detail for app {} in summary {}", app_id, summary_id))
        })?;

    let (start, end) = day_bounds(summary.date)?;
    let runs = pool
        .finished_runs_for_app(app_id, start, end)
        .await?
        .into_iter()
        .map(ManualRun::from_entity)
        .collect();

    Ok(ReportDetailResponse {
        summary: ReportSummary::from_entity(summary),
        detail: ReportDetail::from_entity(detail).with_app(app.map(App::from_entity)),
        runs,
    })
}
