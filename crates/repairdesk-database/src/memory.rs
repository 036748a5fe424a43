//! In-memory store.
//!
//! Implements every store trait over process-local maps. Used by tests
//! and by `database.backend = "memory"` for local development.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use repairdesk_core::error::AppError;
use repairdesk_core::result::AppResult;
use repairdesk_core::types::pagination::{PageRequest, PageResponse};
use repairdesk_entity::notification::{CreateNotification, Notification};
use repairdesk_entity::order::{CreateOrder, Order, OrderFilter, OrderStatus};
use repairdesk_entity::permission::Action;
use repairdesk_entity::user::{CreateUser, User, UserRole};

use crate::store::{NotificationStore, OrderStore, RolePermissionStore, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    orders: BTreeMap<i64, Order>,
    notifications: BTreeMap<i64, Notification>,
    role_permissions: BTreeSet<(UserRole, Action)>,
    next_user_id: i64,
    next_order_id: i64,
    next_notification_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Process-local implementation of all store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an order's creation time. Lets callers simulate age.
    pub async fn set_order_created_at(&self, id: i64, created_at: DateTime<Utc>) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let order = tables
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
        order.created_at = created_at;
        Ok(())
    }

    /// Toggle a user's active flag.
    pub async fn set_user_active(&self, id: i64, active: bool) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.is_active = active;
        Ok(())
    }
}

fn paginate<T>(rows: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(items, page, total)
}

fn matches_filter(order: &Order, filter: &OrderFilter) -> bool {
    if let Some(status) = filter.status {
        if order.status != status {
            return false;
        }
    }
    if let Some(creator) = &filter.creator {
        if &order.creator != creator {
            return false;
        }
    }
    if let Some((user_id, username)) = &filter.involving {
        if !order.is_assigned_to(*user_id) && !order.is_created_by(username) {
            return false;
        }
    }
    true
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create(&self, data: &CreateOrder) -> AppResult<Order> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_order_id);
        let now = Utc::now();
        let order = Order {
            id,
            title: data.title.clone(),
            description: data.description.clone(),
            location: data.location.clone(),
            creator: data.creator.clone(),
            status: OrderStatus::Pending,
            image_url: data.image_url.clone(),
            assigned_to: None,
            created_at: now,
            updated_at: now,
        };
        tables.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn find_paginated(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Order>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| matches_filter(o, filter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(rows, page))
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        assigned_to: Option<i64>,
    ) -> AppResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        Ok(tables.orders.get_mut(&id).map(|order| {
            order.status = status;
            if assigned_to.is_some() {
                order.assigned_to = assigned_to;
            }
            order.updated_at = Utc::now();
            order.clone()
        }))
    }

    async fn update_assignee(&self, id: i64, assigned_to: i64) -> AppResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        Ok(tables.orders.get_mut(&id).map(|order| {
            order.assigned_to = Some(assigned_to);
            order.updated_at = Utc::now();
            order.clone()
        }))
    }

    async fn find_pending_created_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Pending && o.created_at < cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|o| o.created_at);
        Ok(rows)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.orders.remove(&id).is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_notification_id);
        let notification = Notification {
            id,
            receiver_username: data.receiver_username.clone(),
            title: data.title.clone(),
            message: data.message.clone(),
            kind: data.kind,
            related_order_id: data.related_order_id,
            is_read: false,
            created_at: Utc::now(),
            read_at: None,
        };
        tables.notifications.insert(id, notification.clone());
        Ok(notification)
    }

    async fn find_for_receiver(
        &self,
        receiver: &str,
        is_read: Option<bool>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| n.receiver_username == receiver)
            .filter(|n| is_read.is_none_or(|r| n.is_read == r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(rows, page))
    }

    async fn count_unread(&self, receiver: &str) -> AppResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .notifications
            .values()
            .filter(|n| n.receiver_username == receiver && n.is_unread())
            .count() as u64)
    }

    async fn mark_read(&self, id: i64, receiver: &str) -> AppResult<Option<Notification>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .notifications
            .get_mut(&id)
            .filter(|n| n.receiver_username == receiver)
            .map(|n| {
                if !n.is_read {
                    n.is_read = true;
                    n.read_at = Some(Utc::now());
                }
                n.clone()
            }))
    }

    async fn mark_all_read(&self, receiver: &str) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for n in tables
            .notifications
            .values_mut()
            .filter(|n| n.receiver_username == receiver && !n.is_read)
        {
            n.is_read = true;
            n.read_at = Some(now);
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_for_receiver(&self, id: i64, receiver: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .notifications
            .get(&id)
            .is_some_and(|n| n.receiver_username == receiver);
        if owned {
            tables.notifications.remove(&id);
        }
        Ok(owned)
    }

    async fn delete_by_order(&self, order_id: i64) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.notifications.len();
        tables
            .notifications
            .retain(|_, n| n.related_order_id != Some(order_id));
        Ok((before - tables.notifications.len()) as u64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == data.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                data.username
            )));
        }
        let id = Tables::next_id(&mut tables.next_user_id);
        let user = User {
            id,
            username: data.username.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            phone_number: data.phone_number.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_active_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| u.role == role && u.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RolePermissionStore for MemoryStore {
    async fn find_actions_for_role(&self, role: UserRole) -> AppResult<Vec<Action>> {
        let tables = self.tables.read().await;
        Ok(tables
            .role_permissions
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, a)| *a)
            .collect())
    }

    async fn grant(&self, role: UserRole, action: Action) -> AppResult<()> {
        self.tables.write().await.role_permissions.insert((role, action));
        Ok(())
    }
}
