//! Inputs and outputs of order operations.

use serde::{Deserialize, Serialize};
use validator::Validate;

use repairdesk_core::error::AppError;
use repairdesk_core::result::AppResult;
use repairdesk_core::types::pagination::DEFAULT_PAGE_SIZE;
use repairdesk_entity::order::OrderStatus;

/// Longest accepted image extension, without the dot.
const MAX_EXTENSION_LEN: usize = 10;

/// Input for filing a new order.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 100, message = "Title is required and at most 100 characters"))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 500,
        message = "Description is required and at most 500 characters"
    ))]
    pub description: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    /// Extension of an attached image, e.g. `jpg` or `.png`.
    #[serde(default)]
    pub image_extension: Option<String>,
}

impl CreateOrderRequest {
    /// Trim fields and check lengths.
    pub fn normalize(self) -> AppResult<Self> {
        let normalized = Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            image_extension: self
                .image_extension
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty()),
        };
        normalized
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        if let Some(ext) = &normalized.image_extension {
            if ext.len() > MAX_EXTENSION_LEN || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(AppError::validation(format!(
                    "Invalid image extension '{ext}'"
                )));
            }
        }
        Ok(normalized)
    }
}

/// Result of filing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: i64,
    pub image_url: Option<String>,
}

/// Listing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// Restrict to orders assigned to or filed by the caller.
    #[serde(default)]
    pub assigned_to_me: bool,
}

impl Default for OrderListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            status: None,
            assigned_to_me: false,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Body of a status change request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub status: OrderStatus,
    /// Maintainer to assign in the same step. Administrators only.
    #[serde(default)]
    pub assign_to: Option<i64>,
}

/// Body of assign and reassign requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub maintainer_id: i64,
}
