//! Order lifecycle engine.

pub mod request;
pub mod service;

pub use request::{
    AssignRequest, CreateOrderRequest, CreatedOrder, OrderListQuery, StatusChangeRequest,
};
pub use service::{OrderService, OrderServiceConfig, lifecycle_event};
