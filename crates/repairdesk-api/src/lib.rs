//! # repairdesk-api
//!
//! HTTP API layer for RepairDesk built on Axum.
//!
//! A thin translation layer: extractors turn a bearer token into a
//! `RequestContext`, handlers call the order and notification services,
//! and `AppError` is mapped onto status codes. The live notification
//! channel is upgraded at `/ws`.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
