//! Store traits consumed by the service layer.
//!
//! Services hold `Arc<dyn ...Store>` so the PostgreSQL repositories and
//! the in-memory store are interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use repairdesk_core::result::AppResult;
use repairdesk_core::types::pagination::{PageRequest, PageResponse};
use repairdesk_entity::notification::{CreateNotification, Notification};
use repairdesk_entity::order::{CreateOrder, Order, OrderFilter, OrderStatus};
use repairdesk_entity::permission::Action;
use repairdesk_entity::user::{CreateUser, User, UserRole};

/// Persistence for orders.
#[async_trait]
pub trait OrderStore: Send + Sync + std::fmt::Debug {
    /// Insert a new order in `Pending`, unassigned.
    async fn create(&self, data: &CreateOrder) -> AppResult<Order>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>>;

    /// Page through orders matching `filter`, newest first.
    async fn find_paginated(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Order>>;

    /// Write a new status, and the assignee when `assigned_to` is `Some`.
    /// Returns `None` if the order no longer exists.
    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        assigned_to: Option<i64>,
    ) -> AppResult<Option<Order>>;

    /// Replace the assignee without touching status.
    async fn update_assignee(&self, id: i64, assigned_to: i64) -> AppResult<Option<Order>>;

    /// Orders still `Pending` that were created before `cutoff`.
    async fn find_pending_created_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Order>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Persistence for notifications. Every read and write is scoped to a
/// receiver except the order cascade.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug {
    async fn create(&self, data: &CreateNotification) -> AppResult<Notification>;

    /// Page through a receiver's notifications, newest first.
    async fn find_for_receiver(
        &self,
        receiver: &str,
        is_read: Option<bool>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    async fn count_unread(&self, receiver: &str) -> AppResult<u64>;

    /// Mark one notification read. `read_at` is only stamped on the first
    /// transition. Returns `None` if the id does not belong to `receiver`.
    async fn mark_read(&self, id: i64, receiver: &str) -> AppResult<Option<Notification>>;

    /// Mark every unread notification read. Returns the number changed.
    async fn mark_all_read(&self, receiver: &str) -> AppResult<u64>;

    /// Returns whether a row owned by `receiver` was removed.
    async fn delete_for_receiver(&self, id: i64, receiver: &str) -> AppResult<bool>;

    /// Remove all notifications about an order. Returns the number removed.
    async fn delete_by_order(&self, order_id: i64) -> AppResult<u64>;
}

/// Read access to principals.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Active users holding `role`, ordered by id.
    async fn find_active_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;
}

/// The stored role-to-action relation.
#[async_trait]
pub trait RolePermissionStore: Send + Sync + std::fmt::Debug {
    async fn find_actions_for_role(&self, role: UserRole) -> AppResult<Vec<Action>>;

    /// Idempotent.
    async fn grant(&self, role: UserRole, action: Action) -> AppResult<()>;
}
