//! Database queries for the app registry.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entity::app::{self, ActiveModel, Entity as App};
use crate::error::{AppError, AppResult};
use crate::models::{CreateAppRequest, UpdateAppRequest};

use super::e2e_reports::reset_summaries_for_app;
use super::{Constraint, DbPool, constraint_violation};

fn write_error(action: &str, code: &str, err: DbErr) -> AppError {
    match constraint_violation(&err) {
        Some(Constraint::Unique(_)) => {
            AppError::Conflict(format!("An app with code '{}' already exists", code))
        }
        _ => AppError::Database(format!("Failed to {} app: {}", action, err)),
    }
}

impl DbPool {
    /// List apps ordered by name, optionally filtered by `watching`.
    pub async fn list_apps(&self, watching: Option<bool>) -> AppResult<Vec<app::Model>> {
        let mut select = App::find();
        if let Some(watching) = watching {
            select = select.filter(app::Column::Watching.eq(watching));
        }

        select
            .order_by_asc(app::Column::Name)
            .order_by_asc(app::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list apps: {}", e)))
    }

    pub async fn get_app(&self, id: i32) -> AppResult<Option<app::Model>> {
        App::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get app: {}", e)))
    }

    /// Insert an app. A duplicate `code` yields `Conflict`.
    pub async fn insert_app(&self, req: CreateAppRequest) -> AppResult<app::Model> {
        let now = Utc::now();
        let code = req.code.clone();
        let model = ActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            pipeline_url: Set(req.pipeline_url),
            e2e_trigger_configuration: Set(req
                .e2e_trigger_configuration
                .unwrap_or_else(|| serde_json::json!({}))),
            watching: Set(req.watching),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| write_error("insert", &code, e))
    }

    pub async fn update_app(&self, id: i32, req: UpdateAppRequest) -> AppResult<app::Model> {
        let existing = self
            .get_app(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("App {}", id)))?;
        let code = req.code.clone().unwrap_or_else(|| existing.code.clone());

        let mut active: ActiveModel = existing.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(code) = req.code {
            active.code = Set(code);
        }
        if let Some(pipeline_url) = req.pipeline_url {
            active.pipeline_url = Set(Some(pipeline_url).filter(|u| !u.is_empty()));
        }
        if let Some(config) = req.e2e_trigger_configuration {
            active.e2e_trigger_configuration = Set(config);
        }
        if let Some(watching) = req.watching {
            active.watching = Set(watching);
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| write_error("update", &code, e))
    }

    /// Delete an app together with its runs and report rows.
    ///
    /// Summaries that lose a detail row are reset to `pending` in the same
    /// transaction, so the next read recomputes their counters.
    pub async fn delete_app(&self, id: i32) -> AppResult<()> {
        let db_err = |e: DbErr| AppError::Database(format!("Failed to delete app: {}", e));
        let txn = self.connection().begin().await.map_err(db_err)?;

        let reset = reset_summaries_for_app(&txn, id).await.map_err(db_err)?;
        let result = App::delete_by_id(id).exec(&txn).await.map_err(db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(AppError::NotFound(format!("App {}", id)));
        }
        txn.commit().await.map_err(db_err)?;

        if reset > 0 {
            info!(app_id = id, summaries = reset, "Report summaries reset after app deletion");
        }
        Ok(())
    }
}
