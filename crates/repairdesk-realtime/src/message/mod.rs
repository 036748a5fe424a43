//! Wire messages of the live channel.

pub mod serializer;
pub mod types;

pub use types::{InboundMessage, OutboundMessage};
