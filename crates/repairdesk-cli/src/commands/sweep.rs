//! One-shot timeout sweep, for driving the check from an external scheduler.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use repairdesk_database::Stores;
use repairdesk_service::notification::{NotificationService, NullPushGateway};
use repairdesk_worker::{SweepSummary, TimeoutSweeper};

use crate::output::{self, OutputFormat};

/// Arguments for the sweep command
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Override the pending-hours threshold
    #[arg(long)]
    pub threshold_hours: Option<u64>,
}

#[derive(Debug, Serialize, Tabled)]
struct SweepRow {
    stalled: usize,
    notified: usize,
    failed: usize,
}

impl From<SweepSummary> for SweepRow {
    fn from(s: SweepSummary) -> Self {
        Self {
            stalled: s.stalled,
            notified: s.notified,
            failed: s.failed,
        }
    }
}

/// Execute the sweep command.
///
/// Notifications are persisted only. This process holds no live
/// connections, so recipients see them on their next inbox fetch.
pub async fn execute(args: &SweepArgs, config_path: &str, format: OutputFormat) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(hours) = args.threshold_hours {
        config.sweeper.threshold_hours = hours;
    }

    let stores = Stores::from_config(&config.database)
        .await
        .context("Failed to open store")?;

    let notifications = Arc::new(NotificationService::new(
        Arc::clone(&stores.notifications),
        Arc::new(NullPushGateway),
    ));
    let sweeper = TimeoutSweeper::new(
        Arc::clone(&stores.orders),
        Arc::clone(&stores.users),
        notifications,
        &config.sweeper,
    )
    .context("Invalid sweeper configuration")?;

    let summary = sweeper
        .check_timeout_orders()
        .await
        .context("Timeout sweep failed")?;

    let failed = summary.failed;
    output::print_record(&SweepRow::from(summary), format);
    if failed > 0 {
        output::print_warning(&format!("{failed} order(s) could not be notified"));
    }
    Ok(())
}
