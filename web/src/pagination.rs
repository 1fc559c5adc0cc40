//! Page-number pagination.
//!
//! The order listing wraps its results in the classic page-number envelope:
//! `{"count": .., "next": .., "previous": .., "results": [..]}` with a
//! default page size of 10 and a hard cap of 100.

use serde::{Deserialize, Serialize};

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

const fn default_page() -> u32 {
    1
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Query parameters for paginated listings (`?page=`, `?page_size=`).
///
/// Pages are 1-based. Out-of-range values are clamped rather than rejected:
/// `page=0` reads as the first page and `page_size` above the cap reads as
/// the cap.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Requested page size, capped at [`MAX_PAGE_SIZE`].
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageQuery {
    /// The effective page number (at least 1).
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// The effective page size (between 1 and [`MAX_PAGE_SIZE`]).
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// SQL `LIMIT` for this page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size())
    }

    /// SQL `OFFSET` for this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.page_size())
    }
}

/// One page of results plus navigation links.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// Total number of rows across all pages.
    pub count: u64,
    /// Link to the following page, when one exists.
    pub next: Option<String>,
    /// Link to the preceding page, when one exists.
    pub previous: Option<String>,
    /// The rows of this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble the envelope for `results` fetched with `query` against a
    /// listing mounted at `path`.
    #[must_use]
    pub fn new(path: &str, query: PageQuery, count: u64, results: Vec<T>) -> Self {
        let page = u64::from(query.page());
        let page_size = u64::from(query.page_size());

        let next = (page * page_size < count).then(|| page_link(path, page + 1, query));
        let previous = (page > 1).then(|| page_link(path, page - 1, query));

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

fn page_link(path: &str, page: u64, query: PageQuery) -> String {
    if query.page_size() == DEFAULT_PAGE_SIZE {
        format!("{path}?page={page}")
    } else {
        format!("{path}?page={page}&page_size={}", query.page_size())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(page: u32, page_size: u32) -> PageQuery {
        PageQuery { page, page_size }
    }

    #[test]
    fn defaults_are_first_page_of_ten() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), 10);
        assert_eq!(q.limit(), 10);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn page_size_is_capped() {
        let q = query(1, 1000);
        assert_eq!(q.page_size(), MAX_PAGE_SIZE);
        assert_eq!(query(0, 0).page(), 1);
        assert_eq!(query(0, 0).page_size(), 1);
    }

    #[test]
    fn offset_moves_with_the_page() {
        assert_eq!(query(3, 10).offset(), 20);
        assert_eq!(query(2, 25).offset(), 25);
    }

    #[test]
    fn middle_page_links_both_ways() {
        let page: Page<i64> = Page::new("/api/orders", query(2, 10), 25, vec![1]);
        assert_eq!(page.count, 25);
        assert_eq!(page.next.as_deref(), Some("/api/orders?page=3"));
        assert_eq!(page.previous.as_deref(), Some("/api/orders?page=1"));
    }

    #[test]
    fn edges_have_no_dangling_links() {
        let first: Page<i64> = Page::new("/api/orders", query(1, 10), 25, vec![]);
        assert!(first.previous.is_none());
        assert!(first.next.is_some());

        let last: Page<i64> = Page::new("/api/orders", query(3, 10), 25, vec![]);
        assert!(last.next.is_none());
        assert!(last.previous.is_some());

        let only: Page<i64> = Page::new("/api/orders", query(1, 10), 5, vec![]);
        assert!(only.next.is_none());
        assert!(only.previous.is_none());
    }

    #[test]
    fn custom_page_size_survives_in_links() {
        let page: Page<i64> = Page::new("/api/orders", query(2, 5), 20, vec![]);
        assert_eq!(page.next.as_deref(), Some("/api/orders?page=3&page_size=5"));
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/orders?page=1&page_size=5")
        );
    }

    #[test]
    fn envelope_serializes_with_nulls() {
        let page: Page<i64> = Page::new("/api/orders", PageQuery::default(), 2, vec![7, 8]);
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["next"], serde_json::Value::Null);
        assert_eq!(value["previous"], serde_json::Value::Null);
        assert_eq!(value["results"], serde_json::json!([7, 8]));
    }
}
