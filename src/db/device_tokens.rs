//! Database queries for push registration tokens.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::entity::device_token::{self, ActiveModel, Entity as DeviceToken};
use crate::error::{AppError, AppResult};
use crate::models::RegisterDeviceTokenRequest;

use super::{Constraint, DbPool, constraint_violation};

impl DbPool {
    pub async fn get_device_token(&self, token: &str) -> AppResult<Option<device_token::Model>> {
        DeviceToken::find()
            .filter(device_token::Column::Token.eq(token))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get device token: {}", e)))
    }

    /// Register a token.
    ///
    /// Returns the stored row and whether it was newly created. Registering
    /// a known token is a no-op that returns the existing row.
    pub async fn register_device_token(
        &self,
        req: RegisterDeviceTokenRequest,
    ) -> AppResult<(device_token::Model, bool)> {
        if let Some(existing) = self.get_device_token(&req.token).await? {
            return Ok((existing, false));
        }

        let now = Utc::now();
        let token = req.token.clone();
        let model = ActiveModel {
            token: Set(req.token),
            platform: Set(req.platform),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(self.connection()).await {
            Ok(created) => Ok((created, true)),
            // Lost a race with a concurrent registration of the same token
            Err(e) if matches!(constraint_violation(&e), Some(Constraint::Unique(_))) => {
                let existing = self.get_device_token(&token).await?.ok_or_else(|| {
                    AppError::Database(format!("Device token vanished after conflict: {}", e))
                })?;
                Ok((existing, false))
            }
            Err(e) => Err(AppError::Database(format!(
                "Failed to insert device token: {}",
                e
            ))),
        }
    }

    pub async fn delete_device_token(&self, token: &str) -> AppResult<()> {
        let result = DeviceToken::delete_many()
            .filter(device_token::Column::Token.eq(token))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete device token: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Device token".to_string()));
        }
        Ok(())
    }
}
