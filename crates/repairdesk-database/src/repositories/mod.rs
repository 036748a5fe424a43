//! PostgreSQL repository implementations of the store traits.

pub mod notification;
pub mod order;
pub mod role_permission;
pub mod user;

pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use role_permission::RolePermissionRepository;
pub use user::UserRepository;
