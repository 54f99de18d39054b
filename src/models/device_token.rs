//! Push registration token DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::device_token;
use crate::error::{AppError, AppResult};

/// A registered device token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceToken {
    pub id: i32,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DeviceToken {
    pub fn from_entity(m: device_token::Model) -> Self {
        Self {
            id: m.id,
            token: m.token,
            platform: m.platform,
            created_at: m.created_at,
        }
    }
}

/// Request body for registering a device token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterDeviceTokenRequest {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl RegisterDeviceTokenRequest {
    pub fn validate(mut self) -> AppResult<Self> {
        self.token = self.token.trim().to_string();
        if self.token.is_empty() {
            return Err(AppError::Validation("token is required".to_string()));
        }
        self.platform = self
            .platform
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty());
        Ok(self)
    }
}
