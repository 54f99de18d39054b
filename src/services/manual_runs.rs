//! Manual E2E run lifecycle.

use tracing::info;

use crate::db::{Constraint, DbPool, constraint_violation};
use crate::error::AppError;
use crate::models::{CreateManualRunRequest, ManualRun, ManualRunStatus, UpdateManualRunRequest};

/// Failures of manual run operations, before they are mapped to HTTP.
#[derive(Debug, thiserror::Error)]
pub enum ManualRunError {
    #[error("app {0} does not exist")]
    UnknownApp(i32),

    #[error("app {0} already has a run in progress")]
    RunInProgress(i32),

    #[error("manual run {0} not found")]
    NotFound(i32),

    #[error("manual run {id} is already {status}")]
    AlreadyFinished { id: i32, status: ManualRunStatus },

    #[error("cannot move manual run {id} from {from} to {to}")]
    InvalidTransition {
        id: i32,
        from: ManualRunStatus,
        to: ManualRunStatus,
    },

    #[error(transparent)]
    App(#[from] AppError),
}

/// Create a pending run for an app.
///
/// A missing app surfaces as a foreign key violation and an existing
/// pending or running run as a unique violation of the in-progress index.
pub async fn create_run(
    pool: &DbPool,
    req: CreateManualRunRequest,
) -> Result<ManualRun, ManualRunError> {
    let app_id = req.app_id;
    let run = pool.insert_manual_run(req).await.map_err(|e| {
        match constraint_violation(&e) {
            Some(Constraint::ForeignKey(_)) => ManualRunError::UnknownApp(app_id),
            Some(Constraint::Unique(_)) => ManualRunError::RunInProgress(app_id),
            None => AppError::Database(format!("Failed to insert manual run: {}", e)).into(),
        }
    })?;

    info!(run_id = run.id, app_id, "Manual run created");
    Ok(ManualRun::from_entity(run))
}

/// Apply a status transition.
///
/// Terminal statuses set `finishedAt`. Finished runs cannot change.
pub async fn update_run(
    pool: &DbPool,
    id: i32,
    req: UpdateManualRunRequest,
) -> Result<ManualRun, ManualRunError> {
    let current = pool
        .get_manual_run(id)
        .await?
        .ok_or(ManualRunError::NotFound(id))?;
    let from = ManualRunStatus::parse(&current.status)
        .ok_or_else(|| AppError::Internal(format!("Unknown run status '{}'", current.status)))?;

    if from.is_terminal() {
        return Err(ManualRunError::AlreadyFinished { id, status: from });
    }
    if !from.can_transition_to(req.status) {
        return Err(ManualRunError::InvalidTransition {
            id,
            from,
            to: req.status,
        });
    }

    let pipeline_url = req
        .pipeline_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    match pool
        .transition_manual_run(id, from, req.status, pipeline_url)
        .await?
    {
        Some(updated) => {
            info!(run_id = id, from = %from, to = %req.status, "Manual run updated");
            Ok(ManualRun::from_entity(updated))
        }
        // Another writer moved the run between the read and the update
        None => {
            let latest = pool
                .get_manual_run(id)
                .await?
                .ok_or(ManualRunError::NotFound(id))?;
            let status = ManualRunStatus::parse(&latest.status).unwrap_or(from);
            Err(ManualRunError::InvalidTransition {
                id,
                from: status,
                to: req.status,
            })
        }
    }
}

impl From<ManualRunError> for AppError {
    fn from(err: ManualRunError) -> Self {
        match err {
            ManualRunError::UnknownApp(_) => {
                AppError::Validation("Invalid appId: app does not exist".to_string())
            }
            ManualRunError::RunInProgress(_) => AppError::Conflict(
                "A manual run is already in progress for this app".to_string(),
            ),
            ManualRunError::NotFound(id) => AppError::NotFound(format!("Manual run {}", id)),
            e @ (ManualRunError::AlreadyFinished { .. }
            | ManualRunError::InvalidTransition { .. }) => AppError::Conflict(capitalize(&e.to_string())),
            ManualRunError::App(e) => e,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_app_maps_to_validation() {
        let err: AppError = ManualRunError::UnknownApp(999).into();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid appId: app does not exist"));
    }

    #[test]
    fn test_in_progress_maps_to_conflict() {
        let err: AppError = ManualRunError::RunInProgress(1).into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_finished_run_maps_to_conflict() {
        let err: AppError = ManualRunError::AlreadyFinished {
            id: 4,
            status: ManualRunStatus::Passed,
        }
        .into();
        assert_eq!(err.to_string(), "Manual run 4 is already passed");
    }

    #[test]
    fn test_store_errors_pass_through() {
        let err: AppError = ManualRunError::App(AppError::Database("boom".to_string())).into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
