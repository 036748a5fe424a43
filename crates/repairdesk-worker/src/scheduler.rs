//! Cron scheduler driving periodic jobs in-process.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use repairdesk_core::error::AppError;

use crate::jobs::TimeoutSweeper;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler })
    }

    /// Run the timeout sweep on `cron` (six fields, seconds first).
    pub async fn register_timeout_sweep(
        &self,
        sweeper: Arc<TimeoutSweeper>,
        cron: &str,
    ) -> Result<(), AppError> {
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let sweeper = Arc::clone(&sweeper);
            Box::pin(async move {
                tracing::debug!("Running scheduled timeout sweep");
                if let Err(e) = sweeper.check_timeout_orders().await {
                    tracing::error!("Timeout sweep failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid sweeper cron expression '{cron}': {e}"))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add timeout sweep schedule: {}", e))
        })?;

        tracing::info!(cron, "Registered: timeout sweep");
        Ok(())
    }

    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
