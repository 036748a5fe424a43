//! Database migration runner.

use tracing::info;

use repairdesk_core::error::{AppError, ErrorKind};

use crate::connection::DatabasePool;

/// Apply all pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), AppError> {
    let migrator = sqlx::migrate!("../../migrations");
    info!(available = migrator.iter().count(), "Running database migrations");

    migrator.run(pool.pool()).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to run migrations", e)
    })?;

    info!("Database migrations complete");
    Ok(())
}
