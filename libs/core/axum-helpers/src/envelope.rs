//! Success envelope shared by every API response.
//!
//! Clients branch on a single `success` flag: `true` here, `false` in
//! [`crate::errors::ErrorResponse`]. List endpoints attach a [`PageInfo`]
//! block describing the page that was returned.

use serde::Serialize;
use utoipa::ToSchema;

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageInfo {
    /// Total records that matched the query, across all pages
    pub total: usize,
    /// 1-based page number that was served
    pub page: usize,
    /// Page size that was applied
    pub limit: usize,
    /// Total number of pages (ceiling of total / limit)
    pub pages: usize,
}

impl PageInfo {
    /// Compute the page count from the match total and page size.
    ///
    /// `limit` must already be clamped to a positive value by the caller.
    pub fn new(total: usize, page: usize, limit: usize) -> Self {
        Self {
            total,
            page,
            limit,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Standard success envelope for API responses.
///
/// # JSON Examples
///
/// ```json
/// {"success": true, "data": {"id": "…", "name": "Ada"}}
/// {"success": true, "message": "Developer deleted"}
/// {"success": true, "data": [], "pagination": {"total": 0, "page": 1, "limit": 10, "pages": 0}}
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiEnvelope<T> {
    /// Always true for success responses
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

impl<T: Serialize> ApiEnvelope<T> {
    /// Envelope carrying a payload.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    /// Envelope carrying a payload plus a human-readable note.
    pub fn data_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            pagination: None,
        }
    }

    /// Envelope carrying a page of results.
    pub fn page(data: T, pagination: PageInfo) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: Some(pagination),
        }
    }
}

impl ApiEnvelope<()> {
    /// Envelope with only a confirmation message (e.g., after a delete).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}
