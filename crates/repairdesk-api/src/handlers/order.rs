//! Order handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use repairdesk_core::error::AppError;
use repairdesk_core::types::pagination::PageResponse;
use repairdesk_entity::order::{Order, OrderDetail};
use repairdesk_entity::user::MaintainerSummary;
use repairdesk_service::order::{
    AssignRequest, CreateOrderRequest, CreatedOrder, OrderListQuery, StatusChangeRequest,
};

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedOrder>>), AppError> {
    let created = state.order_service.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// GET /api/orders?page&pageSize&status&assignedToMe
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<ApiResponse<PageResponse<Order>>>, AppError> {
    let page = state.order_service.list(&auth, query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/orders/maintainers
pub async fn list_maintainers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<MaintainerSummary>>>, AppError> {
    let roster = state.order_service.maintainers(&auth).await?;
    Ok(Json(ApiResponse::ok(roster)))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<OrderDetail>>, AppError> {
    let detail = state.order_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// PATCH /api/orders/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = state
        .order_service
        .request_status_change(&auth, id, req)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// POST /api/orders/{id}/assign
pub async fn assign_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = state
        .order_service
        .assign(&auth, id, req.maintainer_id)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// PUT /api/orders/{id}/reassign
pub async fn reassign_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = state
        .order_service
        .reassign(&auth, id, req.maintainer_id)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// DELETE /api/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.order_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Order deleted"))))
}
