//! Database migration command.

use anyhow::Context;

use repairdesk_core::config::DatabaseBackend;
use repairdesk_database::DatabasePool;
use repairdesk_database::migration::run_migrations;

use crate::output;

/// Apply every pending migration to the configured PostgreSQL database.
pub async fn execute(config_path: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if config.database.backend == DatabaseBackend::Memory {
        output::print_warning("The memory backend has no schema; nothing to migrate.");
        return Ok(());
    }

    let pool = DatabasePool::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    println!("Running database migrations...");
    run_migrations(&pool).await.context("Migration failed")?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
