//! App registry models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

use crate::entity::app;
use crate::error::{AppError, AppResult};

/// A monitored application.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: i32,
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_url: Option<String>,
    /// Opaque trigger settings for the app's E2E pipeline
    #[schema(value_type = Object)]
    pub e2e_trigger_configuration: JsonValue,
    pub watching: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl App {
    pub fn from_entity(m: app::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            code: m.code,
            pipeline_url: m.pipeline_url,
            e2e_trigger_configuration: m.e2e_trigger_configuration,
            watching: m.watching,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for registering an app.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequest {
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub e2e_trigger_configuration: Option<JsonValue>,
    #[serde(default)]
    pub watching: bool,
}

impl CreateAppRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        self.name = require("name", &self.name)?;
        self.code = require("code", &self.code)?;
        Ok(self)
    }
}

/// Request body for updating an app. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub e2e_trigger_configuration: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watching: Option<bool>,
}

impl UpdateAppRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        if let Some(ref name) = self.name {
            self.name = Some(require("name", name)?);
        }
        if let Some(ref code) = self.code {
            self.code = Some(require("code", code)?);
        }
        Ok(self)
    }
}

/// Query parameters for listing apps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAppsQuery {
    /// Only apps included (or excluded) from E2E reporting
    #[serde(default)]
    pub watching: Option<bool>,
}

fn require(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}
