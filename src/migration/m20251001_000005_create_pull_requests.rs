//! Migration: Create pull_requests table.
//!
//! Tracked GitHub pull requests and their approval state.

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
                CREATE TABLE pull_requests (
                    id SERIAL PRIMARY KEY,
                    -- "owner/name"
                    repository VARCHAR(255) NOT NULL,
                    number INTEGER NOT NULL CHECK (number > 0),
                    title VARCHAR(1024) NOT NULL,
                    author VARCHAR(255),
                    url VARCHAR(2048) NOT NULL,
                    state VARCHAR(20) NOT NULL DEFAULT 'open'
                        CHECK (state IN ('open', 'merged', 'closed')),
                    approved BOOLEAN NOT NULL DEFAULT FALSE,
                    approvals_count INTEGER NOT NULL DEFAULT 0,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    CONSTRAINT pull_requests_repository_number_key UNIQUE (repository, number)
                );

                CREATE INDEX idx_pull_requests_state ON pull_requests(state);

                CREATE TRIGGER update_pull_requests_updated_at
                    BEFORE UPDATE ON pull_requests
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
                DROP TRIGGER IF EXISTS update_pull_requests_updated_at ON pull_requests;
                DROP TABLE IF EXISTS pull_requests CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
