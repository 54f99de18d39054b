//! Migration: Create e2e_report_summaries table.
//!
//! One aggregate row per calendar date.

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
                CREATE TABLE e2e_report_summaries (
                    id SERIAL PRIMARY KEY,
                    date DATE NOT NULL,
                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'ready', 'failed')),
                    total_runs INTEGER NOT NULL DEFAULT 0,
                    passed_runs INTEGER NOT NULL DEFAULT 0,
                    failed_runs INTEGER NOT NULL DEFAULT 0,
                    success_rate DOUBLE PRECISION NOT NULL DEFAULT 0,
                    last_request_id VARCHAR(255),
                    generated_at TIMESTAMPTZ,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    CONSTRAINT e2e_report_summaries_date_key UNIQUE (date),
                    CHECK (total_runs = passed_runs + failed_runs)
                );

                CREATE TRIGGER update_e2e_report_summaries_updated_at
                    BEFORE UPDATE ON e2e_report_summaries
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
                DROP TRIGGER IF EXISTS update_e2e_report_summaries_updated_at ON e2e_report_summaries;
                DROP TABLE IF EXISTS e2e_report_summaries CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
