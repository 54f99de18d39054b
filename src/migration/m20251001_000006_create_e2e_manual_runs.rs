//! Migration: Create e2e_manual_runs table.
//!
//! On-demand E2E pipeline runs. Finished runs are the input to report aggregation.

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
                CREATE TABLE e2e_manual_runs (
                    id SERIAL PRIMARY KEY,
                    app_id INTEGER NOT NULL REFERENCES apps(id) ON DELETE CASCADE,
                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'running', 'passed', 'failed', 'cancelled')),
                    triggered_by VARCHAR(255),
                    pipeline_url VARCHAR(2048),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    finished_at TIMESTAMPTZ
                );

                -- At most one in-progress run per app
                CREATE UNIQUE INDEX idx_e2e_manual_runs_in_progress ON e2e_manual_runs(app_id)
                    WHERE status IN ('pending', 'running');

                -- Aggregation scans finished runs by day
                CREATE INDEX idx_e2e_manual_runs_finished_at ON e2e_manual_runs(finished_at)
                    WHERE finished_at IS NOT NULL;

                CREATE TRIGGER update_e2e_manual_runs_updated_at
                    BEFORE UPDATE ON e2e_manual_runs
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
                DROP TRIGGER IF EXISTS update_e2e_manual_runs_updated_at ON e2e_manual_runs;
                DROP TABLE IF EXISTS e2e_manual_runs CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
