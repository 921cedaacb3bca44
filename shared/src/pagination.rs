use serde::{Deserialize, Serialize};

use crate::ValidationError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Size of the recent-items listing.
pub const RECENT_LIMIT: i64 = 10;

/// A validated page/limit pair. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Result<Self, ValidationError> {
        if page < 1 {
            return Err(ValidationError::InvalidPage);
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ValidationError::InvalidLimit);
        }
        Ok(Self { page, limit })
    }

    /// Parses raw query-string values, applying defaults for absent ones.
    /// Text that is not an integer is rejected like an out-of-range value.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, ValidationError> {
        let page = match page.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<i64>().map_err(|_| ValidationError::InvalidPage)?,
            None => DEFAULT_PAGE,
        };
        let limit = match limit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<i64>().map_err(|_| ValidationError::InvalidLimit)?,
            None => DEFAULT_LIMIT,
        };
        Self::new(page, limit)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination metadata returned next to a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = (total + request.limit - 1) / request.limit;
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}
