//! Shared pagination utilities
//!
//! Page/per-page parameters with validation, and the slice math used by
//! every list endpoint: `start = (page - 1) * per_page`,
//! `total_pages = ceil(total / per_page)`. A page past the end is an empty
//! slice, not an error; non-positive parameters are input errors.

use serde::{Deserialize, Serialize};

/// Default items per page, matching the dashboard's table size.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Upper bound on items per page.
pub const MAX_PER_PAGE: i64 = 100;

/// Common pagination request parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Items per page. Defaults to 10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    /// Get the page number (1-indexed), defaulting to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get items per page, defaulting to 10 and clamped to 1-100
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Validate pagination parameters
    ///
    /// Guards the undefined-behavior corner: zero or negative values are
    /// rejected as input errors before any slice math runs.
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(page) = self.page {
            if page < 1 {
                return Err("page must be greater than 0");
            }
        }
        if let Some(per_page) = self.per_page {
            if per_page < 1 || per_page > MAX_PER_PAGE {
                return Err("per_page must be between 1 and 100");
            }
        }
        Ok(())
    }
}

/// A materialized page of items plus the counters every list response
/// carries.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Slice a full result set down to one page.
pub fn paginate<T: Clone>(items: &[T], params: &PaginationParams) -> Page<T> {
    let page = params.page();
    let per_page = params.per_page();
    let total = items.len() as i64;
    let total_pages = if total == 0 {
        0
    } else {
        (total + per_page - 1) / per_page
    };

    let start = ((page - 1) * per_page) as usize;
    let data = if start >= items.len() {
        Vec::new()
    } else {
        let end = (start + per_page as usize).min(items.len());
        items[start..end].to_vec()
    };

    Page {
        data,
        page,
        per_page,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 10);
    }

    #[test]
    fn test_params_validation() {
        assert!(PaginationParams::new(Some(1), Some(50)).validate().is_ok());
        assert_eq!(
            PaginationParams::new(Some(0), None).validate(),
            Err("page must be greater than 0")
        );
        assert_eq!(
            PaginationParams::new(None, Some(0)).validate(),
            Err("per_page must be between 1 and 100")
        );
        assert_eq!(
            PaginationParams::new(None, Some(-3)).validate(),
            Err("per_page must be between 1 and 100")
        );
    }

    #[test]
    fn test_pagination_math() {
        let items: Vec<i64> = (1..=23).collect();

        let page3 = paginate(&items, &PaginationParams::new(Some(3), Some(10)));
        assert_eq!(page3.total, 23);
        assert_eq!(page3.total_pages, 3);
        assert_eq!(page3.data, vec![21, 22, 23]);

        // A page beyond the end is an empty slice, not an error.
        let page4 = paginate(&items, &PaginationParams::new(Some(4), Some(10)));
        assert!(page4.data.is_empty());
        assert_eq!(page4.total_pages, 3);
    }

    #[test]
    fn test_pagination_empty_set() {
        let items: Vec<i64> = Vec::new();
        let page = paginate(&items, &PaginationParams::default());
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }
}
