//! # repairdesk-service
//!
//! Business logic for RepairDesk. The order lifecycle engine validates
//! every transition against the caller's permissions and the order's
//! current state, then hands lifecycle events to the notification
//! service, which persists one record per recipient before pushing.
//!
//! Services follow constructor injection: all collaborators are
//! provided at construction time via `Arc` references.

pub mod context;
pub mod notification;
pub mod order;

pub use context::RequestContext;
pub use notification::{
    NotificationContent, NotificationService, NullPushGateway, PushGateway, PushPayload,
};
pub use order::{OrderService, OrderServiceConfig};
