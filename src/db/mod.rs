//! Database module providing connection management, migrations, and queries.
//!
//! Each submodule extends [`DbPool`] with the queries for one table.

pub mod apps;
pub mod device_tokens;
pub mod e2e_manual_runs;
pub mod e2e_reports;
pub mod notifications;
pub mod pull_requests;
pub mod todos;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Handle to the PostgreSQL connection pool.
///
/// Constructed once on process start and handed to handlers and background
/// tasks through `web::Data`; clones share the same underlying pool.
/// Call [`DbPool::close`] during shutdown.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Connect to the database described by the configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        let conn = Database::connect(Self::connect_options(config))
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(Self { conn })
    }

    /// Build a pool that does not open connections until first use.
    ///
    /// Useful for tests that exercise request handling paths which never
    /// reach the database.
    pub async fn new_lazy(config: &Config) -> AppResult<Self> {
        let mut options = Self::connect_options(config);
        options.connect_lazy(true);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create lazy pool: {}", e)))?;

        Ok(Self { conn })
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn connect_options(config: &Config) -> ConnectOptions {
        let mut options = ConnectOptions::new(config.database.url.clone());
        options
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect_timeout(config.database.connect_timeout)
            .sqlx_logging(false);
        options
    }

    /// Borrow the underlying SeaORM connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
        info!("Database migrations complete");
        Ok(())
    }

    /// Cheap connectivity check used by the readiness probe.
    pub async fn ping(&self) -> Result<(), DbErr> {
        let stmt = sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_owned(),
        );
        self.conn.query_one_raw(stmt).await.map(|_| ())
    }

    /// Close every pooled connection.
    pub async fn close(self) -> AppResult<()> {
        self.conn
            .close()
            .await
            .map_err(|e| AppError::Database(format!("Failed to close database pool: {}", e)))
    }
}

/// Classify a write failure caused by a constraint.
///
/// Returns `None` when the error is not a constraint violation.
pub(crate) fn constraint_violation(err: &DbErr) -> Option<Constraint> {
    match err.sql_err()? {
        sea_orm::SqlErr::UniqueConstraintViolation(detail) => Some(Constraint::Unique(detail)),
        sea_orm::SqlErr::ForeignKeyConstraintViolation(detail) => {
            Some(Constraint::ForeignKey(detail))
        }
        _ => None,
    }
}

/// Constraint kinds the service layer distinguishes.
#[derive(Debug)]
pub(crate) enum Constraint {
    Unique(String),
    ForeignKey(String),
}
