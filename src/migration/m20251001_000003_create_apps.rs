//! Migration: Create apps table.
//!
//! Registry of applications whose E2E pipelines are monitored.

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
                CREATE TABLE apps (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    code VARCHAR(100) NOT NULL,
                    pipeline_url VARCHAR(2048),
                    -- Opaque trigger settings passed to the pipeline
                    e2e_trigger_configuration JSONB NOT NULL DEFAULT '{}'::jsonb,
                    -- Included in automated E2E reporting
                    watching BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    CONSTRAINT apps_code_key UNIQUE (code)
                );

                CREATE INDEX idx_apps_watching ON apps(watching)
                    WHERE watching = TRUE;

                CREATE TRIGGER update_apps_updated_at
                    BEFORE UPDATE ON apps
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
                DROP TRIGGER IF EXISTS update_apps_updated_at ON apps;
                DROP TABLE IF EXISTS apps CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
