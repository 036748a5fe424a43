//! Liveness and dependency probes.

use axum::Json;
use axum::extract::State;

use repairdesk_core::traits::cache::CacheProvider;

use crate::dto::response::{ApiResponse, DependencyStatus, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
///
/// Probe errors count as unavailable; the endpoint itself always answers 200.
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let database = DependencyStatus::from(
        state.stores.orders.health_check().await.unwrap_or(false),
    );
    let cache = DependencyStatus::from(state.cache.health_check().await.unwrap_or(false));
    let all_up = database == DependencyStatus::Connected && cache == DependencyStatus::Connected;

    let connections = &state.realtime.connections;
    Json(ApiResponse::ok(DetailedHealthResponse {
        status: if all_up { "ok" } else { "degraded" },
        database,
        cache,
        ws_connections: connections.connection_count(),
        online_users: connections.user_count(),
    }))
}
