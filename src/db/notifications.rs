//! Database queries for notifications.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::notification::{self, ActiveModel, Entity as Notification};
use crate::error::{AppError, AppResult};
use crate::models::NewNotification;

use super::DbPool;

/// A page of notifications with the counters the list endpoint reports.
#[derive(Debug)]
pub struct NotificationPage {
    pub notifications: Vec<notification::Model>,
    pub total: u64,
    pub unread_count: u64,
}

impl DbPool {
    /// List notifications newest first.
    pub async fn list_notifications(&self, unread_only: bool, limit: u64) -> AppResult<NotificationPage> {
        let mut select = Notification::find();
        if unread_only {
            select = select.filter(notification::Column::IsRead.eq(false));
        }

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count notifications: {}", e)))?;

        let notifications = select
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list notifications: {}", e)))?;

        let unread_count = Notification::find()
            .filter(notification::Column::IsRead.eq(false))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count unread notifications: {}", e)))?;

        Ok(NotificationPage {
            notifications,
            total,
            unread_count,
        })
    }

    pub async fn get_notification(&self, id: i32) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get notification: {}", e)))
    }

    /// Insert an unread notification.
    pub async fn insert_notification(&self, new: NewNotification) -> AppResult<notification::Model> {
        let now = Utc::now();
        let model = ActiveModel {
            title: Set(new.title),
            message: Set(new.message),
            notification_type: Set(new.notification_type.as_str().to_string()),
            link: Set(new.link),
            is_read: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert notification: {}", e)))
    }

    /// Mark one notification read.
    ///
    /// Returns the stored row and whether it flipped from unread. Already-read
    /// rows are left untouched.
    pub async fn mark_notification_read(&self, id: i32) -> AppResult<(notification::Model, bool)> {
        let result = Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .col_expr(notification::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to mark notification read: {}", e)))?;

        let notification = self
            .get_notification(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification {}", id)))?;

        Ok((notification, result.rows_affected > 0))
    }

    pub async fn delete_notification(&self, id: i32) -> AppResult<()> {
        let result = Notification::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete notification: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Notification {}", id)));
        }
        Ok(())
    }

    /// Mark unread notifications read with a single `UPDATE`.
    ///
    /// `ids` restricts the set; `None` means every notification.
    /// Returns the number of rows that changed.
    pub async fn mark_notifications_read(&self, ids: Option<&[i32]>) -> AppResult<u64> {
        if matches!(ids, Some([])) {
            return Ok(0);
        }

        let mut update = Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .col_expr(notification::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(notification::Column::IsRead.eq(false));
        if let Some(ids) = ids {
            update = update.filter(notification::Column::Id.is_in(ids.iter().copied()));
        }

        let result = update
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to mark notifications read: {}", e)))?;

        Ok(result.rows_affected)
    }

    /// Delete notifications with a single `DELETE`.
    ///
    /// `ids` restricts the set; `None` means every notification.
    pub async fn delete_notifications(&self, ids: Option<&[i32]>) -> AppResult<u64> {
        if matches!(ids, Some([])) {
            return Ok(0);
        }

        let mut delete = Notification::delete_many();
        if let Some(ids) = ids {
            delete = delete.filter(notification::Column::Id.is_in(ids.iter().copied()));
        }

        let result = delete
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete notifications: {}", e)))?;

        Ok(result.rows_affected)
    }
}
