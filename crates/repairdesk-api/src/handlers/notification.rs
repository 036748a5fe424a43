//! Notification handlers. Every route acts on the caller's own inbox.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use repairdesk_core::error::AppError;
use repairdesk_core::types::pagination::{PageRequest, PageResponse};
use repairdesk_entity::notification::Notification;

use crate::dto::response::{ApiResponse, CountResponse, MessageResponse};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Query for the inbox listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    /// Only read (`true`) or only unread (`false`) notifications.
    pub is_read: Option<bool>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl NotificationQuery {
    fn page_request(&self) -> PageRequest {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
        .into()
    }
}

/// GET /api/notifications?isRead&page&pageSize
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<ApiResponse<PageResponse<Notification>>>, AppError> {
    let page = state
        .notification_service
        .list(&auth, query.is_read, query.page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Notification>>, AppError> {
    let notification = state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let count = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.notification_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Notification deleted",
    ))))
}
