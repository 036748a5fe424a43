//! `page` / `pageSize` query parameters.

use serde::Deserialize;

use repairdesk_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};

/// Raw paging parameters. Missing values fall back to page 1 and
/// [`DEFAULT_PAGE_SIZE`]; out-of-range values are clamped by [`PageRequest`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl From<PaginationParams> for PageRequest {
    fn from(params: PaginationParams) -> Self {
        PageRequest::new(
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}
