//! Index-based pagination shared by catalog and order queries.

use serde::{Deserialize, Serialize};

/// Page size used when neither the caller nor the configuration picks one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Which page of a result set to return (0-based index).
///
/// An unset `page_size` means "the service default"; see
/// [`PageRequest::or_size`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    pub page_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl PageRequest {
    /// A zero page size is bumped to 1 so every request can make progress.
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size: Some(page_size.max(1)),
        }
    }

    /// Effective page size (at least 1).
    pub fn size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// Fill in `default_size` when the caller left the size unset.
    pub fn or_size(self, default_size: usize) -> Self {
        Self::new(self.page_index, self.page_size.unwrap_or(default_size))
    }

    /// Cap the page size (callers may ask for arbitrarily large pages).
    pub fn clamped(self, max_page_size: usize) -> Self {
        Self::new(self.page_index, self.size().min(max_page_size.max(1)))
    }

    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.size())
    }

    /// Cut one page out of an already filtered and ordered result set.
    pub fn slice<T>(&self, all: Vec<T>) -> Page<T> {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(self.offset())
            .take(self.size())
            .collect();
        Page {
            items,
            total,
            page_index: self.page_index,
            page_size: self.size(),
        }
    }
}

/// One page of results plus the total match count across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page_index: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size.max(1))
    }

    pub fn has_more(&self) -> bool {
        self.page_index.saturating_add(1) < self.page_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_returns_requested_window_and_total() {
        let page = PageRequest::new(1, 3).slice((0..8).collect::<Vec<_>>());
        assert_eq!(page.items, vec![3, 4, 5]);
        assert_eq!(page.total, 8);
        assert_eq!(page.page_count(), 3);
        assert!(page.has_more());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = PageRequest::new(5, 10).slice(vec!['a', 'b']);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
        assert!(!page.has_more());
    }

    #[test]
    fn zero_and_oversized_page_sizes_are_normalized() {
        assert_eq!(PageRequest::new(0, 0).size(), 1);
        assert_eq!(PageRequest::new(2, 500).clamped(100).size(), 100);
    }

    #[test]
    fn unset_size_takes_the_supplied_default() {
        let unset: PageRequest = serde_json::from_str(r#"{"pageIndex": 2}"#).unwrap();
        assert_eq!(unset.page_size, None);
        assert_eq!(unset.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(unset.or_size(3), PageRequest::new(2, 3));
        assert_eq!(PageRequest::new(0, 7).or_size(3).size(), 7);
    }

    #[test]
    fn last_possible_page_index_does_not_overflow() {
        let page: Page<u8> = Page {
            items: vec![],
            total: 5,
            page_index: usize::MAX,
            page_size: 1,
        };
        assert!(!page.has_more());

        let request: PageRequest =
            serde_json::from_str(&format!(r#"{{"pageIndex": {}, "pageSize": 2}}"#, usize::MAX)).unwrap();
        assert!(!request.slice(vec![1, 2, 3]).has_more());
    }
}
