//! Repair order entities.

pub mod filter;
pub mod model;
pub mod status;

pub use filter::OrderFilter;
pub use model::{CreateOrder, Order, OrderDetail};
pub use status::OrderStatus;
