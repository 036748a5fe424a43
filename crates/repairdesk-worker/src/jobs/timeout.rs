//! Stalled-order sweep.
//!
//! Every run re-notifies about every order still pending past the
//! threshold. Nothing is deduplicated: two runs in one period send two
//! reminders, so the scheduler must trigger exactly once per period.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use repairdesk_core::config::SweeperConfig;
use repairdesk_core::events::OrderEventKind;
use repairdesk_core::error::AppError;
use repairdesk_core::result::AppResult;
use repairdesk_database::store::{OrderStore, UserStore};
use repairdesk_entity::user::UserRole;
use repairdesk_service::notification::NotificationService;
use repairdesk_service::order::lifecycle_event;

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Pending orders older than the threshold.
    pub stalled: usize,
    /// Notifications persisted.
    pub notified: usize,
    /// Orders whose notifications all failed.
    pub failed: usize,
}

/// Finds orders stuck in `Pending` and reminds every active admin.
#[derive(Debug, Clone)]
pub struct TimeoutSweeper {
    orders: Arc<dyn OrderStore>,
    users: Arc<dyn UserStore>,
    notifications: Arc<NotificationService>,
    threshold: Duration,
}

impl TimeoutSweeper {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        users: Arc<dyn UserStore>,
        notifications: Arc<NotificationService>,
        config: &SweeperConfig,
    ) -> AppResult<Self> {
        let threshold = i64::try_from(config.threshold_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "sweeper.threshold_hours is out of range: {}",
                    config.threshold_hours
                ))
            })?;
        Ok(Self {
            orders,
            users,
            notifications,
            threshold,
        })
    }

    /// Run one sweep against the current time.
    pub async fn check_timeout_orders(&self) -> AppResult<SweepSummary> {
        self.check_timeout_orders_at(Utc::now()).await
    }

    /// Run one sweep as of `now`.
    ///
    /// A failure on one order is logged and the scan moves on; the next
    /// run picks the order up again.
    pub async fn check_timeout_orders_at(&self, now: DateTime<Utc>) -> AppResult<SweepSummary> {
        // A cutoff before the representable range means nothing is old enough.
        let Some(cutoff) = now.checked_sub_signed(self.threshold) else {
            return Ok(SweepSummary::default());
        };
        let stalled = self.orders.find_pending_created_before(cutoff).await?;
        let mut summary = SweepSummary {
            stalled: stalled.len(),
            ..Default::default()
        };
        if stalled.is_empty() {
            info!("Timeout sweep found no stalled orders");
            return Ok(summary);
        }

        let admins: Vec<String> = self
            .users
            .find_active_by_role(UserRole::Admin)
            .await?
            .into_iter()
            .map(|u| u.username)
            .collect();
        if admins.is_empty() {
            warn!(stalled = stalled.len(), "Stalled orders found but no active admins to notify");
            return Ok(summary);
        }

        for order in &stalled {
            let mut event = lifecycle_event(OrderEventKind::TimedOut, order);
            event.pending_hours = Some(order.hours_pending(now));

            match self.notifications.publish(&event, &admins).await {
                Ok(created) => summary.notified += created.len(),
                Err(e) => {
                    warn!(order_id = order.id, error = %e, "Timeout notification failed");
                    summary.failed += 1;
                }
            }
        }

        info!(
            stalled = summary.stalled,
            notified = summary.notified,
            failed = summary.failed,
            "Timeout sweep finished"
        );
        Ok(summary)
    }
}
