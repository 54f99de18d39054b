//! Migration: Create notifications table.
//!
//! Notifications are created by jobs or API calls and read/deleted by users.

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
                CREATE TABLE notifications (
                    id SERIAL PRIMARY KEY,
                    title VARCHAR(255) NOT NULL,
                    message TEXT NOT NULL,
                    type VARCHAR(20) NOT NULL DEFAULT 'info'
                        CHECK (type IN ('info', 'success', 'warning', 'error')),
                    link VARCHAR(2048),
                    is_read BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Newest-first listing
                CREATE INDEX idx_notifications_created_at ON notifications(created_at DESC);

                -- Unread badge count
                CREATE INDEX idx_notifications_unread ON notifications(is_read)
                    WHERE is_read = FALSE;

                CREATE TRIGGER update_notifications_updated_at
                    BEFORE UPDATE ON notifications
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
                DROP TRIGGER IF EXISTS update_notifications_updated_at ON notifications;
                DROP TABLE IF EXISTS notifications CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
