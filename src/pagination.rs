//! Pagination utilities for GitLab API responses.

use serde::{Deserialize, Serialize};

use crate::response::ResponseMeta;

/// A page of results from the GitLab API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages (if reported).
    pub total: Option<u64>,
    /// Total number of pages (if reported).
    pub total_pages: Option<u32>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub per_page: u32,
    /// The next page number, if any.
    pub next_page: Option<u32>,
    /// Whether there are more pages.
    pub has_more: bool,
    /// Metadata of the response this page was decoded from.
    #[serde(skip)]
    pub response: ResponseMeta,
}

impl<T> Page<T> {
    /// Create a page from decoded items and the response they came with.
    ///
    /// `requested` supplies the page number and size when the server did not
    /// echo them back.
    #[must_use]
    pub fn new(items: Vec<T>, requested: &ListOptions, response: ResponseMeta) -> Self {
        let info = &response.pagination;
        let page = info.page.or(requested.page).unwrap_or(1);
        let per_page = info
            .per_page
            .or(requested.per_page)
            .unwrap_or(DEFAULT_SERVER_PAGE_SIZE);

        let has_more = match (info.next_page, info.total_pages) {
            (Some(_), _) => true,
            (None, Some(_)) => false,
            // GitLab omits the cursor headers on very large collections
            (None, None) => info.next_link.is_some() || items.len() >= per_page as usize,
        };

        Self {
            total: info.total,
            total_pages: info.total_pages,
            next_page: info.next_page,
            items,
            page,
            per_page,
            has_more,
            response,
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            total_pages: self.total_pages,
            page: self.page,
            per_page: self.per_page,
            next_page: self.next_page,
            has_more: self.has_more,
            response: self.response,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// GitLab's page size when `per_page` is not sent.
const DEFAULT_SERVER_PAGE_SIZE: u32 = 20;

/// Query parameters for paginated requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Number of items per page (GitLab caps this at 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListOptions {
    /// Options for a specific page.
    #[must_use]
    pub fn for_page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::PageInfo;

    fn meta(info: PageInfo) -> ResponseMeta {
        ResponseMeta {
            status: 200,
            pagination: info,
            ..Default::default()
        }
    }

    #[test]
    fn test_page_has_more_with_next_page() {
        let page: Page<i32> = Page::new(
            vec![1; 20],
            &ListOptions::default(),
            meta(PageInfo {
                page: Some(1),
                per_page: Some(20),
                total_pages: Some(3),
                next_page: Some(2),
                ..Default::default()
            }),
        );
        assert!(page.has_more);
        assert_eq!(page.next_page, Some(2));

        // Last page: empty X-Next-Page, known total
        let page: Page<i32> = Page::new(
            vec![1; 5],
            &ListOptions::default(),
            meta(PageInfo {
                page: Some(3),
                per_page: Some(20),
                total_pages: Some(3),
                ..Default::default()
            }),
        );
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_has_more_without_headers() {
        // Full page suggests more
        let page: Page<i32> =
            Page::new(vec![1; 100], &ListOptions::for_page(1, 100), ResponseMeta::default());
        assert!(page.has_more);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 100);

        // Partial page means no more
        let page: Page<i32> =
            Page::new(vec![1; 50], &ListOptions::for_page(1, 100), ResponseMeta::default());
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], &ListOptions::default(), ResponseMeta::default());
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.page, 1);
        assert_eq!(mapped.per_page, 20);
    }

    #[test]
    fn test_list_options_query_omits_absent_fields() {
        let query = serde_qs::to_string(&ListOptions::default()).unwrap();
        assert_eq!(query, "");

        let query = serde_qs::to_string(&ListOptions {
            page: None,
            per_page: Some(50),
        })
        .unwrap();
        assert_eq!(query, "per_page=50");

        let query = serde_qs::to_string(&ListOptions::for_page(2, 10)).unwrap();
        assert_eq!(query, "page=2&per_page=10");
    }
}
