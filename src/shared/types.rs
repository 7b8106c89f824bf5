use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for offset-based list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    /// Get clamped page number (never below 1)
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Query parameters for cursor-based scroll endpoints: results are keyed by
/// "last seen id" rather than page number.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ScrollQuery {
    /// Return items with id strictly greater than this cursor
    pub after: Option<i64>,

    /// Number of items to return (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,
}

impl ScrollQuery {
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn after(&self) -> i64 {
        self.after.unwrap_or(0).max(0)
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_pagination_clamps_page_and_size() {
        let q = PaginationQuery {
            page: 0,
            page_size: 500,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), MAX_PAGE_SIZE);
        assert_eq!(q.offset(), 0);

        let q = PaginationQuery {
            page: -3,
            page_size: 0,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 1);
    }

    #[test]
    fn offset_math_for_later_pages() {
        let q = PaginationQuery {
            page: 2,
            page_size: 10,
        };
        assert_eq!(q.offset(), 10);

        let q = PaginationQuery {
            page: 3,
            page_size: 25,
        };
        assert_eq!(q.offset(), 50);
    }

    #[test]
    fn default_page_size_is_twenty() {
        let q = PaginationQuery::default();
        assert_eq!(q.limit(), 20);
        let s = ScrollQuery::default();
        // serde default applies on deserialization; Default trait gives 0 which clamps to 1
        assert_eq!(s.after(), 0);
        let s: ScrollQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(s.limit(), 20);
    }

    #[test]
    fn scroll_query_negative_cursor_treated_as_start() {
        let s = ScrollQuery {
            after: Some(-5),
            limit: 10,
        };
        assert_eq!(s.after(), 0);
    }
}
