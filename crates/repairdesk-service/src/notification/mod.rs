//! Notification service, push gateway seam, and message formatting.

pub mod content;
pub mod gateway;
pub mod service;

pub use content::NotificationContent;
pub use gateway::{NullPushGateway, PushGateway, PushPayload};
pub use service::NotificationService;
