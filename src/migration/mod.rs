//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20251001_000001_create_todos;
mod m20251001_000002_create_notifications;
mod m20251001_000003_create_apps;
mod m20251001_000004_create_device_tokens;
mod m20251001_000005_create_pull_requests;
mod m20251001_000006_create_e2e_manual_runs;
mod m20251001_000007_create_e2e_report_summaries;
mod m20251001_000008_create_e2e_report_details;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_todos::Migration),
            Box::new(m20251001_000002_create_notifications::Migration),
            Box::new(m20251001_000003_create_apps::Migration),
            Box::new(m20251001_000004_create_device_tokens::Migration),
            Box::new(m20251001_000005_create_pull_requests::Migration),
            Box::new(m20251001_000006_create_e2e_manual_runs::Migration),
            Box::new(m20251001_000007_create_e2e_report_summaries::Migration),
            Box::new(m20251001_000008_create_e2e_report_details::Migration),
        ]
    }
}
