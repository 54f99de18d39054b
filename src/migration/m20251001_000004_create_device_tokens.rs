//! Migration: Create device_tokens table.
//!
//! Push registration tokens for client devices.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE device_tokens (
                    id SERIAL PRIMARY KEY,
                    token VARCHAR(4096) NOT NULL,
                    platform VARCHAR(50),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    CONSTRAINT device_tokens_token_key UNIQUE (token)
                );

                CREATE TRIGGER update_device_tokens_updated_at
                    BEFORE UPDATE ON device_tokens
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_device_tokens_updated_at ON device_tokens;
                DROP TABLE IF EXISTS device_tokens CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
