//! To-do list models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::todo;
use crate::error::{AppError, AppResult};

/// A to-do item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn from_entity(m: todo::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            link: m.link,
            is_completed: m.is_completed,
            due_date: m.due_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for creating a to-do.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl CreateTodoRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        self.title = validate_title(&self.title)?;
        Ok(self)
    }
}

/// Request body for updating a to-do. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl UpdateTodoRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        if let Some(ref title) = self.title {
            self.title = Some(validate_title(title)?);
        }
        Ok(self)
    }
}

fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if title.chars().count() > 255 {
        return Err(AppError::Validation(
            "title must be at most 255 characters".to_string(),
        ));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_title() {
        let req = CreateTodoRequest {
            title: "  write report  ".to_string(),
            description: None,
            link: None,
            due_date: None,
        };
        assert_eq!(req.validate().unwrap().title, "write report");
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let req = UpdateTodoRequest {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_without_title_is_valid() {
        let req = UpdateTodoRequest {
            is_completed: Some(true),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_long_title_rejected() {
        assert!(validate_title(&"x".repeat(256)).is_err());
    }
}
