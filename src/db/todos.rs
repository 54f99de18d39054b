//! Database queries for to-dos.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::entity::todo::{self, ActiveModel, Entity as Todo};
use crate::error::{AppError, AppResult};
use crate::models::{CreateTodoRequest, UpdateTodoRequest};

use super::DbPool;

impl DbPool {
    /// List to-dos, open items first, then by due date and age.
    pub async fn list_todos(&self) -> AppResult<Vec<todo::Model>> {
        Todo::find()
            .order_by_asc(todo::Column::IsCompleted)
            .order_by_asc(todo::Column::DueDate)
            .order_by_desc(todo::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list todos: {}", e)))
    }

    pub async fn get_todo(&self, id: i32) -> AppResult<Option<todo::Model>> {
        Todo::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get todo: {}", e)))
    }

    pub async fn insert_todo(&self, req: CreateTodoRequest) -> AppResult<todo::Model> {
        let now = Utc::now();
        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            link: Set(req.link),
            is_completed: Set(false),
            due_date: Set(req.due_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert todo: {}", e)))
    }

    /// Apply a partial update. Fails with `NotFound` for unknown ids.
    pub async fn update_todo(&self, id: i32, req: UpdateTodoRequest) -> AppResult<todo::Model> {
        let todo = self
            .get_todo(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Todo {}", id)))?;

        let mut active: ActiveModel = todo.into();
        if let Some(title) = req.title {
            active.title = Set(title);
        }
        if let Some(description) = req.description {
            active.description = Set(Some(description).filter(|d| !d.is_empty()));
        }
        if let Some(link) = req.link {
            active.link = Set(Some(link).filter(|l| !l.is_empty()));
        }
        if let Some(is_completed) = req.is_completed {
            active.is_completed = Set(is_completed);
        }
        if let Some(due_date) = req.due_date {
            active.due_date = Set(Some(due_date));
        }
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update todo: {}", e)))
    }

    /// Delete a to-do. Fails with `NotFound` for unknown ids.
    pub async fn delete_todo(&self, id: i32) -> AppResult<()> {
        let result = Todo::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete todo: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Todo {}", id)));
        }
        Ok(())
    }
}
