//! Pagination types for row browsing.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 100;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping the page size to [`MAX_PAGE_SIZE`].
    pub fn new(page: u64, page_size: u64) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::validation("page must be at least 1"));
        }
        if page_size < 1 {
            return Err(AppError::validation("limit must be at least 1"));
        }
        let page_size = page_size.min(MAX_PAGE_SIZE);
        let offset_fits = (page - 1)
            .checked_mul(page_size)
            .is_some_and(|offset| offset <= i64::MAX as u64);
        if !offset_fits {
            return Err(AppError::validation("page is out of range"));
        }
        Ok(Self { page, page_size })
    }

    /// Parse raw `page`/`limit` query values, applying defaults when absent.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, AppError> {
        let page = parse_number("page", page, 1)?;
        let limit = parse_number("limit", limit, DEFAULT_PAGE_SIZE)?;
        Self::new(page, limit)
    }

    /// Calculate the SQL `OFFSET` value. Always fits in an `i64`.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_number(name: &str, raw: Option<&str>, default: u64) -> Result<u64, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| AppError::validation(format!("{name} must be a positive integer"))),
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages, `ceil(total_items / page_size)`.
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

impl<T: Serialize> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.page_size);
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages,
            has_next: request.page < total_pages,
            has_previous: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_for_third_page() {
        let req = PageRequest::new(3, 10).unwrap();
        assert_eq!(req.offset(), 20);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn test_defaults_when_absent() {
        let req = PageRequest::parse(None, Some("")).unwrap();
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.offset(), 0);
        assert_eq!(req.limit(), 100);
    }

    #[test]
    fn test_rejects_malformed_and_zero() {
        assert!(PageRequest::parse(Some("abc"), None).is_err());
        assert!(PageRequest::parse(Some("-1"), None).is_err());
        assert!(PageRequest::parse(Some("0"), None).is_err());
        assert!(PageRequest::parse(None, Some("0")).is_err());
    }

    #[test]
    fn test_rejects_page_whose_offset_overflows() {
        let err = PageRequest::parse(Some("18446744073709551615"), Some("10")).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
        assert!(PageRequest::new(u64::MAX, 1).is_err());

        let last = i64::MAX as u64 / MAX_PAGE_SIZE + 1;
        let req = PageRequest::new(last, MAX_PAGE_SIZE).unwrap();
        assert!(req.offset() <= i64::MAX as u64);
        assert!(PageRequest::new(last + 1, MAX_PAGE_SIZE).is_err());
    }

    #[test]
    fn test_limit_is_capped() {
        let req = PageRequest::parse(Some("2"), Some("50000")).unwrap();
        assert_eq!(req.limit(), MAX_PAGE_SIZE);
        assert_eq!(req.offset(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let req = PageRequest::new(1, 10).unwrap();
        let resp = PageResponse::new(vec![1, 2, 3], &req, 21);
        assert_eq!(resp.total_pages, 3);
        assert!(resp.has_next);
        assert!(!resp.has_previous);

        let resp = PageResponse::<u8>::new(vec![], &req, 0);
        assert_eq!(resp.total_pages, 0);
        assert!(!resp.has_next);

        let last = PageRequest::new(2, 10).unwrap();
        let resp = PageResponse::<u8>::new(vec![], &last, 20);
        assert_eq!(resp.total_pages, 2);
        assert!(!resp.has_next);
        assert!(resp.has_previous);
    }
}
