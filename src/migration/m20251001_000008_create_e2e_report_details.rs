//! Migration: Create e2e_report_details table.
//!
//! Per-app breakdown rows, replaced as a batch whenever their summary is recomputed.

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
                CREATE TABLE e2e_report_details (
                    id SERIAL PRIMARY KEY,
                    report_summary_id INTEGER NOT NULL
                        REFERENCES e2e_report_summaries(id) ON DELETE CASCADE,
                    app_id INTEGER NOT NULL REFERENCES apps(id) ON DELETE CASCADE,
                    total_runs INTEGER NOT NULL DEFAULT 0,
                    passed_runs INTEGER NOT NULL DEFAULT 0,
                    failed_runs INTEGER NOT NULL DEFAULT 0,
                    success_rate DOUBLE PRECISION NOT NULL DEFAULT 0,
                    last_run_status VARCHAR(20) NOT NULL DEFAULT 'none'
                        CHECK (last_run_status IN ('none', 'passed', 'failed')),
                    last_run_at TIMESTAMPTZ,
                    last_failed_run_at TIMESTAMPTZ,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    CONSTRAINT e2e_report_details_summary_app_key UNIQUE (report_summary_id, app_id),
                    CHECK (total_runs = passed_runs + failed_runs)
                );

                CREATE INDEX idx_e2e_report_details_app_id ON e2e_report_details(app_id);
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
                DROP TABLE IF EXISTS e2e_report_details CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
