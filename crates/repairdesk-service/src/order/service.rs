//! Order lifecycle engine: status and assignment transitions.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use repairdesk_cache::{ReadCache, keys};
use repairdesk_core::config::CacheConfig;
use repairdesk_core::error::AppError;
use repairdesk_core::events::{OrderEvent, OrderEventKind};
use repairdesk_core::result::AppResult;
use repairdesk_core::types::pagination::{PageRequest, PageResponse};
use repairdesk_database::store::{OrderStore, UserStore};
use repairdesk_entity::order::{CreateOrder, Order, OrderDetail, OrderFilter, OrderStatus};
use repairdesk_entity::permission::Action;
use repairdesk_entity::user::{MaintainerSummary, User, UserRole};

use super::request::{CreateOrderRequest, CreatedOrder, OrderListQuery, StatusChangeRequest};
use crate::context::RequestContext;
use crate::notification::NotificationService;

/// Cache lifetimes used by the engine.
#[derive(Debug, Clone, Copy)]
pub struct OrderServiceConfig {
    pub order_list_ttl: Duration,
    pub roster_ttl: Duration,
}

impl OrderServiceConfig {
    pub fn from_cache_config(config: &CacheConfig) -> Self {
        Self {
            order_list_ttl: Duration::from_secs(config.order_list_ttl_seconds),
            roster_ttl: Duration::from_secs(config.maintainer_roster_ttl_seconds),
        }
    }
}

impl Default for OrderServiceConfig {
    fn default() -> Self {
        Self::from_cache_config(&CacheConfig::default())
    }
}

/// Builds the lifecycle event describing `order` after a change.
pub fn lifecycle_event(kind: OrderEventKind, order: &Order) -> OrderEvent {
    OrderEvent {
        kind,
        order_id: order.id,
        title: order.title.clone(),
        new_status: order.status.as_str().to_string(),
        creator: order.creator.clone(),
        assignee: order.assigned_to,
        pending_hours: None,
        occurred_at: Utc::now(),
    }
}

/// Validates and applies order transitions, then emits lifecycle events.
///
/// There are no version stamps: two concurrent writes to the same order
/// both succeed and the later one wins. Likewise a listing that misses the
/// cache while a write is in flight may cache the pre-write page after the
/// invalidation; it lives at most `order_list_ttl`.
#[derive(Debug, Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    users: Arc<dyn UserStore>,
    notifications: Arc<NotificationService>,
    cache: ReadCache,
    config: OrderServiceConfig,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        users: Arc<dyn UserStore>,
        notifications: Arc<NotificationService>,
        cache: ReadCache,
        config: OrderServiceConfig,
    ) -> Self {
        Self {
            orders,
            users,
            notifications,
            cache,
            config,
        }
    }

    // ── Commands ─────────────────────────────────────────────

    /// Files a new order in `Pending` and tells every active admin.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateOrderRequest,
    ) -> AppResult<CreatedOrder> {
        ctx.require(Action::CreateOrder)?;
        let req = req.normalize()?;

        let image_url = req
            .image_extension
            .as_ref()
            .map(|ext| format!("/uploads/{}.{ext}", Uuid::new_v4()));

        let order = self
            .orders
            .create(&CreateOrder {
                title: req.title,
                description: req.description,
                location: req.location,
                creator: ctx.username.clone(),
                image_url: image_url.clone(),
            })
            .await?;

        self.invalidate_listings().await;
        info!(order_id = order.id, creator = %order.creator, "Order created");

        let admins = self.admin_usernames().await;
        self.emit(OrderEventKind::Created, &order, admins).await;

        Ok(CreatedOrder {
            order_id: order.id,
            image_url,
        })
    }

    /// Moves an order one step along `Pending -> Processing -> Completed`.
    ///
    /// An unassigned order can only leave `Pending` if an admin names a
    /// maintainer in the same request, or a maintainer picks it up for
    /// themselves.
    pub async fn request_status_change(
        &self,
        ctx: &RequestContext,
        order_id: i64,
        req: StatusChangeRequest,
    ) -> AppResult<Order> {
        let order = self.find(order_id).await?;
        let requested = req.status;

        if ctx.is_student() && !order.is_created_by(&ctx.username) {
            return Err(AppError::forbidden("You can only act on your own orders"));
        }
        if order.status.is_terminal() {
            return Err(AppError::precondition_failed(format!(
                "Order {order_id} is already {}",
                order.status
            )));
        }
        if !order.status.can_transition_to(requested) {
            return Err(AppError::precondition_failed(format!(
                "Cannot move order from {} to {requested}",
                order.status
            )));
        }

        let mut new_assignee: Option<User> = None;
        match order.assigned_to {
            None => match (ctx.user_role(), req.assign_to) {
                (Some(UserRole::Admin), Some(maintainer_id)) => {
                    new_assignee = Some(self.load_maintainer(maintainer_id).await?);
                }
                (Some(UserRole::Maintainer), _) if requested == OrderStatus::Processing => {}
                _ => {
                    return Err(AppError::precondition_failed(
                        "Must assign a maintainer first",
                    ));
                }
            },
            Some(current) => {
                if req.assign_to.is_some_and(|m| m != current) {
                    return Err(AppError::precondition_failed(
                        "Order is already assigned; reassign it instead",
                    ));
                }
            }
        }

        let required = match requested {
            OrderStatus::Completed => Action::CompleteOrder,
            _ => Action::ProcessOrder,
        };
        ctx.require(required)?;

        let self_assign = order.assigned_to.is_none() && new_assignee.is_none();
        if ctx.is_maintainer() && !self_assign && !order.is_assigned_to(ctx.user_id) {
            return Err(AppError::forbidden(
                "Only the assigned maintainer may update this order",
            ));
        }

        let assignee_id = match (&new_assignee, self_assign) {
            (Some(user), _) => Some(user.id),
            (None, true) => Some(ctx.user_id),
            (None, false) => None,
        };

        let updated = self
            .orders
            .update_status(order_id, requested, assignee_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

        self.invalidate_listings().await;
        info!(
            order_id,
            from = %order.status,
            to = %updated.status,
            actor = %ctx.username,
            "Order status changed"
        );

        self.emit(
            OrderEventKind::StatusChanged,
            &updated,
            vec![updated.creator.clone()],
        )
        .await;
        if let Some(maintainer) = new_assignee {
            self.emit(OrderEventKind::Assigned, &updated, vec![maintainer.username])
                .await;
        }

        Ok(updated)
    }

    /// Assigns a maintainer to an unassigned order. Status is left alone.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        order_id: i64,
        maintainer_id: i64,
    ) -> AppResult<Order> {
        ctx.require(Action::AssignOrder)?;
        let order = self.find(order_id).await?;
        let maintainer = self.load_maintainer(maintainer_id).await?;

        if order.status.is_terminal() {
            return Err(AppError::precondition_failed(format!(
                "Order {order_id} is already completed"
            )));
        }
        match order.assigned_to {
            Some(current) if current == maintainer_id => return Ok(order),
            Some(_) => {
                return Err(AppError::precondition_failed(
                    "Order is already assigned; reassign it instead",
                ));
            }
            None => {}
        }

        let updated = self.write_assignee(order_id, maintainer_id).await?;
        info!(order_id, maintainer = %maintainer.username, actor = %ctx.username, "Order assigned");

        self.emit(OrderEventKind::Assigned, &updated, vec![maintainer.username])
            .await;
        Ok(updated)
    }

    /// Replaces the assignee. Admin only; status is left alone.
    pub async fn reassign(
        &self,
        ctx: &RequestContext,
        order_id: i64,
        maintainer_id: i64,
    ) -> AppResult<Order> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Only administrators may reassign orders"));
        }
        let order = self.find(order_id).await?;
        let maintainer = self.load_maintainer(maintainer_id).await?;

        if order.status.is_terminal() {
            return Err(AppError::precondition_failed(format!(
                "Order {order_id} is already completed"
            )));
        }
        match order.assigned_to {
            None => {
                return Err(AppError::precondition_failed(
                    "Order has no assignee; assign it first",
                ));
            }
            Some(current) if current == maintainer_id => return Ok(order),
            Some(_) => {}
        }

        let updated = self.write_assignee(order_id, maintainer_id).await?;
        info!(
            order_id,
            from = ?order.assigned_to,
            to = maintainer_id,
            actor = %ctx.username,
            "Order reassigned"
        );

        self.emit(OrderEventKind::Reassigned, &updated, vec![maintainer.username])
            .await;
        Ok(updated)
    }

    /// Deletes an order and every notification about it. Admin only.
    pub async fn delete(&self, ctx: &RequestContext, order_id: i64) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Only administrators may delete orders"));
        }
        self.find(order_id).await?;

        let removed = self.notifications.delete_for_order(order_id).await?;
        if !self.orders.delete(order_id).await? {
            return Err(AppError::not_found(format!("Order {order_id} not found")));
        }

        self.invalidate_listings().await;
        info!(order_id, notifications = removed, actor = %ctx.username, "Order deleted");
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────

    /// Paginated listing, served from the read cache when fresh.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: OrderListQuery,
    ) -> AppResult<PageResponse<Order>> {
        ctx.require_any(&[Action::ViewAllOrders, Action::ViewOwnOrders])?;

        let page = PageRequest::new(query.page, query.page_size);
        let mut filter = OrderFilter {
            status: query.status,
            ..Default::default()
        };
        if query.assigned_to_me {
            filter.involving = Some((ctx.user_id, ctx.username.clone()));
        }
        if ctx.is_student() && !ctx.can(Action::ViewAllOrders) {
            filter.creator = Some(ctx.username.clone());
        }

        let key = keys::order_list(&filter.fingerprint(), page.page, page.page_size, &ctx.username);
        let orders = self.orders.clone();
        self.cache
            .get_or_create(&key, self.config.order_list_ttl, || async move {
                orders.find_paginated(&filter, &page).await
            })
            .await
    }

    /// One order with the assignee's username resolved.
    pub async fn get(&self, ctx: &RequestContext, order_id: i64) -> AppResult<OrderDetail> {
        ctx.require_any(&[Action::ViewAllOrders, Action::ViewOwnOrders])?;
        let order = self.find(order_id).await?;

        if ctx.is_student() && !ctx.can(Action::ViewAllOrders) && !order.is_created_by(&ctx.username)
        {
            return Err(AppError::forbidden("You can only view your own orders"));
        }

        let assigned_to_name = match order.assigned_to {
            Some(id) => self.users.find_by_id(id).await?.map(|u| u.username),
            None => None,
        };

        Ok(OrderDetail {
            order,
            assigned_to_name,
        })
    }

    /// Active maintainers, cached under a constant key.
    pub async fn maintainers(&self, ctx: &RequestContext) -> AppResult<Vec<MaintainerSummary>> {
        ctx.require(Action::AssignOrder)?;
        let users = self.users.clone();
        self.cache
            .get_or_create(&keys::maintainer_roster(), self.config.roster_ttl, || async move {
                users
                    .find_active_by_role(UserRole::Maintainer)
                    .await
                    .map(|maintainers| {
                        maintainers
                            .into_iter()
                            .map(|u| MaintainerSummary {
                                id: u.id,
                                username: u.username,
                            })
                            .collect()
                    })
            })
            .await
    }

    /// Drop the cached roster after a user change.
    pub async fn invalidate_maintainer_roster(&self) {
        self.cache.remove(&keys::maintainer_roster()).await;
    }

    // ── Helpers ──────────────────────────────────────────────

    async fn find(&self, order_id: i64) -> AppResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
    }

    async fn load_maintainer(&self, user_id: i64) -> AppResult<User> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        if user.role != UserRole::Maintainer {
            return Err(AppError::validation(format!(
                "User '{}' is not a maintainer",
                user.username
            )));
        }
        if !user.is_active {
            return Err(AppError::validation(format!(
                "Maintainer '{}' is inactive",
                user.username
            )));
        }
        Ok(user)
    }

    async fn write_assignee(&self, order_id: i64, maintainer_id: i64) -> AppResult<Order> {
        let updated = self
            .orders
            .update_assignee(order_id, maintainer_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;
        self.invalidate_listings().await;
        Ok(updated)
    }

    async fn invalidate_listings(&self) {
        self.cache.invalidate_prefix(&keys::order_list_pattern()).await;
    }

    async fn admin_usernames(&self) -> Vec<String> {
        match self.users.find_active_by_role(UserRole::Admin).await {
            Ok(admins) => admins.into_iter().map(|u| u.username).collect(),
            Err(e) => {
                warn!(error = %e, "Failed to load administrators");
                Vec::new()
            }
        }
    }

    /// The order change is already committed, so notification failures
    /// are logged rather than returned.
    async fn emit(&self, kind: OrderEventKind, order: &Order, recipients: Vec<String>) {
        if recipients.is_empty() {
            return;
        }
        let event = lifecycle_event(kind, order);
        if let Err(e) = self.notifications.publish(&event, &recipients).await {
            warn!(order_id = order.id, ?kind, error = %e, "Failed to notify recipients");
        }
    }
}
