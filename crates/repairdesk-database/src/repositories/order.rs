//! Order repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use repairdesk_core::error::{AppError, ErrorKind};
use repairdesk_core::result::AppResult;
use repairdesk_core::types::pagination::{PageRequest, PageResponse};
use repairdesk_entity::order::{CreateOrder, Order, OrderFilter, OrderStatus};

use crate::store::OrderStore;

/// Shared `WHERE` clause for listings. `$1` status, `$2` creator,
/// `$3`/`$4` involvement (assignee id / creator name).
const FILTER_CLAUSE: &str = "($1::order_status IS NULL OR status = $1) \
     AND ($2::text IS NULL OR creator = $2) \
     AND ($3::bigint IS NULL OR assigned_to = $3 OR creator = $4)";

/// Repository for order CRUD operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn create(&self, data: &CreateOrder) -> AppResult<Order> {
        sqlx::query_as::<_, Order>(
            "INSERT INTO orders (title, description, location, creator, status, image_url) \
             VALUES ($1, $2, $3, $4, 'Pending', $5) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.location)
        .bind(&data.creator)
        .bind(&data.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create order", e))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find order", e))
    }

    async fn find_paginated(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Order>> {
        let (involved_id, involved_name) = match &filter.involving {
            Some((id, name)) => (Some(*id), Some(name.as_str())),
            None => (None, None),
        };

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM orders WHERE {FILTER_CLAUSE}"
        ))
        .bind(filter.status)
        .bind(filter.creator.as_deref())
        .bind(involved_id)
        .bind(involved_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count orders", e))?;

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT * FROM orders WHERE {FILTER_CLAUSE} \
             ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(filter.status)
        .bind(filter.creator.as_deref())
        .bind(involved_id)
        .bind(involved_name)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list orders", e))?;

        Ok(PageResponse::new(orders, page, total as u64))
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        assigned_to: Option<i64>,
    ) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $2, assigned_to = COALESCE($3, assigned_to), \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(assigned_to)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update order status", e))
    }

    async fn update_assignee(&self, id: i64, assigned_to: i64) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, Order>(
            "UPDATE orders SET assigned_to = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(assigned_to)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to assign order", e))
    }

    async fn find_pending_created_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Order>> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE status = 'Pending' AND created_at < $1 \
             ORDER BY created_at ASC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find stalled orders", e)
        })
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete order", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
