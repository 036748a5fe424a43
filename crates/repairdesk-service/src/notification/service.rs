//! Durable notifications with best-effort live delivery.

use std::sync::Arc;

use tracing::{debug, info, warn};

use repairdesk_core::error::AppError;
use repairdesk_core::events::OrderEvent;
use repairdesk_core::result::AppResult;
use repairdesk_core::types::pagination::{PageRequest, PageResponse};
use repairdesk_database::store::NotificationStore;
use repairdesk_entity::notification::{CreateNotification, Notification};

use super::content::NotificationContent;
use super::gateway::{PushGateway, PushPayload};
use crate::context::RequestContext;

/// Persists one notification per recipient, then pushes it.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    gateway: Arc<dyn PushGateway>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>, gateway: Arc<dyn PushGateway>) -> Self {
        Self { store, gateway }
    }

    /// Persist a notification for `recipient`, then push it to their group.
    ///
    /// Only persistence errors are returned. A failed push is logged and
    /// dropped; the stored row is what the recipient will read later.
    pub async fn notify(
        &self,
        recipient: &str,
        content: &NotificationContent,
        related_order_id: Option<i64>,
    ) -> AppResult<Notification> {
        let notification = self
            .store
            .create(&CreateNotification {
                receiver_username: recipient.to_string(),
                title: content.title.clone(),
                message: content.message.clone(),
                kind: content.kind,
                related_order_id,
            })
            .await?;

        let payload = PushPayload {
            order_id: related_order_id,
            title: content.title.clone(),
        };
        match self
            .gateway
            .send_to_group(recipient, &content.message, &payload)
            .await
        {
            Ok(delivered) => {
                debug!(recipient, delivered, notification_id = notification.id, "Notification pushed");
            }
            Err(e) => {
                warn!(recipient, notification_id = notification.id, error = %e, "Push delivery failed");
            }
        }

        Ok(notification)
    }

    /// Notify every recipient of a lifecycle event.
    ///
    /// Each recipient is attempted even if an earlier one fails. Returns
    /// the notifications that were stored; an error comes back only when
    /// every recipient failed, and it is the last one seen.
    pub async fn publish(
        &self,
        event: &OrderEvent,
        recipients: &[String],
    ) -> AppResult<Vec<Notification>> {
        let content = NotificationContent::for_event(event);
        let mut created = Vec::with_capacity(recipients.len());
        let mut last_error = None;

        for recipient in recipients {
            match self.notify(recipient, &content, Some(event.order_id)).await {
                Ok(n) => created.push(n),
                Err(e) => {
                    warn!(
                        recipient = %recipient,
                        order_id = event.order_id,
                        error = %e,
                        "Failed to persist notification"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if created.is_empty() => Err(e),
            _ => Ok(created),
        }
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        is_read: Option<bool>,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.store
            .find_for_receiver(&ctx.username, is_read, &page)
            .await
    }

    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.store.count_unread(&ctx.username).await
    }

    /// Marks one of the caller's notifications read. Already-read is a no-op.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: i64,
    ) -> AppResult<Notification> {
        self.store
            .mark_read(notification_id, &ctx.username)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let count = self.store.mark_all_read(&ctx.username).await?;
        info!(recipient = %ctx.username, count, "Marked all notifications read");
        Ok(count)
    }

    /// Deletes one of the caller's notifications.
    pub async fn delete(&self, ctx: &RequestContext, notification_id: i64) -> AppResult<()> {
        if self
            .store
            .delete_for_receiver(notification_id, &ctx.username)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }

    /// Cascade used when an order is deleted.
    pub async fn delete_for_order(&self, order_id: i64) -> AppResult<u64> {
        self.store.delete_by_order(order_id).await
    }
}
