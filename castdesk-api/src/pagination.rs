/// Pagination for list endpoints
///
/// Every list endpoint takes `page` and `size` query parameters and returns a
/// [`Paginated`] envelope with the page of results plus count metadata.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// `page`/`size` query parameters
///
/// Out-of-range values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,

    /// Page size, 1..=100 (default 20)
    pub size: Option<i64>,
}

impl PaginationQuery {
    /// Effective page number, at least 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to 1..=100
    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// SQL LIMIT for this page
    pub fn limit(&self) -> i64 {
        self.size()
    }

    /// SQL OFFSET for this page
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.size()
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: None, size: None }
    }
}

/// Page count metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: i64,
    pub size: i64,

    /// Total rows matching the query across all pages
    pub total: i64,

    /// Total number of pages
    pub pages: i64,

    pub has_next: bool,
    pub has_prev: bool,
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Wraps a page of results with metadata derived from the query and the
    /// total row count
    pub fn new(results: Vec<T>, query: &PaginationQuery, total: i64) -> Self {
        let page = query.page();
        let size = query.size();
        let pages = if total == 0 { 0 } else { (total + size - 1) / size };

        Self {
            results,
            meta: PageMeta {
                page,
                size,
                total,
                pages,
                has_next: page < pages,
                has_prev: page > 1 && total > 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: i64, size: i64) -> PaginationQuery {
        PaginationQuery {
            page: Some(page),
            size: Some(size),
        }
    }

    #[test]
    fn test_defaults() {
        let q = PaginationQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.size(), 20);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(query(0, 0).page(), 1);
        assert_eq!(query(0, 0).size(), 1);
        assert_eq!(query(-5, 1000).page(), 1);
        assert_eq!(query(-5, 1000).size(), 100);
    }

    #[test]
    fn test_offset() {
        assert_eq!(query(1, 20).offset(), 0);
        assert_eq!(query(3, 20).offset(), 40);
        assert_eq!(query(2, 7).offset(), 7);
    }

    #[test]
    fn test_meta_arithmetic() {
        let p = Paginated::new(vec![1, 2, 3], &query(1, 3), 10);
        assert_eq!(p.meta.pages, 4);
        assert!(p.meta.has_next);
        assert!(!p.meta.has_prev);

        let p = Paginated::new(vec![10], &query(4, 3), 10);
        assert_eq!(p.meta.pages, 4);
        assert!(!p.meta.has_next);
        assert!(p.meta.has_prev);

        let p: Paginated<i32> = Paginated::new(vec![], &query(1, 20), 0);
        assert_eq!(p.meta.pages, 0);
        assert!(!p.meta.has_next);
        assert!(!p.meta.has_prev);

        // Exact multiple
        let p = Paginated::new(vec![1, 2], &query(2, 2), 4);
        assert_eq!(p.meta.pages, 2);
        assert!(!p.meta.has_next);
    }
}
