//! Route definitions for the RepairDesk HTTP API.
//!
//! All REST routes are mounted under `/api`; the live channel sits at `/ws`.

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route, threading `AppState` through
/// `.with_state(state)`. Layers are added by [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(order_routes())
        .merge(notification_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .with_state(state)
}

/// Order lifecycle
fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            get(handlers::order::list_orders).post(handlers::order::create_order),
        )
        .route("/orders/maintainers", get(handlers::order::list_maintainers))
        .route(
            "/orders/{id}",
            get(handlers::order::get_order).delete(handlers::order::delete_order),
        )
        .route("/orders/{id}/status", patch(handlers::order::change_status))
        .route("/orders/{id}/assign", post(handlers::order::assign_order))
        .route("/orders/{id}/reassign", put(handlers::order::reassign_order))
}

/// The caller's notification inbox
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
