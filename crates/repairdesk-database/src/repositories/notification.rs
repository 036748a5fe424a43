//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use repairdesk_core::error::{AppError, ErrorKind};
use repairdesk_core::result::AppResult;
use repairdesk_core::types::pagination::{PageRequest, PageResponse};
use repairdesk_entity::notification::{CreateNotification, Notification};

use crate::store::NotificationStore;

/// Repository for notification CRUD operations.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (receiver_username, title, message, kind, related_order_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.receiver_username)
        .bind(&data.title)
        .bind(&data.message)
        .bind(data.kind)
        .bind(data.related_order_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn find_for_receiver(
        &self,
        receiver: &str,
        is_read: Option<bool>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE receiver_username = $1 AND ($2::boolean IS NULL OR is_read = $2)",
        )
        .bind(receiver)
        .bind(is_read)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count notifications", e))?;

        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE receiver_username = $1 AND ($2::boolean IS NULL OR is_read = $2) \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4",
        )
        .bind(receiver)
        .bind(is_read)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))?;

        Ok(PageResponse::new(notifs, page, total as u64))
    }

    async fn count_unread(&self, receiver: &str) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE receiver_username = $1 AND is_read = FALSE",
        )
        .bind(receiver)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))?;
        Ok(count as u64)
    }

    async fn mark_read(&self, id: i64, receiver: &str) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications \
             SET read_at = CASE WHEN is_read THEN read_at ELSE NOW() END, is_read = TRUE \
             WHERE id = $1 AND receiver_username = $2 RETURNING *",
        )
        .bind(id)
        .bind(receiver)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    async fn mark_all_read(&self, receiver: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE receiver_username = $1 AND is_read = FALSE",
        )
        .bind(receiver)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_for_receiver(&self, id: i64, receiver: &str) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE id = $1 AND receiver_username = $2")
                .bind(id)
                .bind(receiver)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_order(&self, order_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE related_order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to delete order notifications",
                    e,
                )
            })?;
        Ok(result.rows_affected())
    }
}
