//! Pagination types for list views.
//!
//! This module defines the derived page state of a filtered collection, the
//! page slice handed to the view, and the shape of server-paginated
//! responses.
//!
//! Out-of-range page requests are clamped, never rejected: asking for a page
//! past the end yields the last page and a negative index yields the first.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Derived pagination metadata for a filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    /// Zero-based index of the page being shown.
    pub current_page: usize,

    /// Number of items per page.
    pub page_size: usize,

    /// Number of items after filtering.
    pub total_items: usize,

    /// `ceil(total_items / page_size)`; zero for an empty collection.
    pub total_pages: usize,
}

impl PageState {
    /// Derives the page state for `total_items` items, clamping the
    /// requested page into range.
    ///
    /// A `page_size` of zero is treated as one so the result is always
    /// well-formed; configuration validation rejects it earlier.
    pub fn new(total_items: usize, page_size: usize, requested_page: i64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        let mut state = Self {
            current_page: 0,
            page_size,
            total_items,
            total_pages,
        };
        state.current_page = state.clamp(requested_page);
        state
    }

    /// Index of the last page, or zero when there are no pages.
    pub fn last_page(&self) -> usize {
        self.total_pages.saturating_sub(1)
    }

    /// Clamps a requested page index into `[0, last_page]`.
    pub fn clamp(&self, requested_page: i64) -> usize {
        if requested_page <= 0 {
            return 0;
        }
        usize::try_from(requested_page)
            .unwrap_or(usize::MAX)
            .min(self.last_page())
    }

    /// True when the filtered collection is empty and the view should
    /// render its empty state instead of a page.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// True when a page after the current one exists.
    pub fn has_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    /// True when a page before the current one exists.
    pub fn has_previous(&self) -> bool {
        self.current_page > 0
    }

    /// Index of the next page; stays put on the last page.
    pub fn next(&self) -> usize {
        if self.has_next() {
            self.current_page + 1
        } else {
            self.current_page
        }
    }

    /// Index of the previous page; stays put on the first page.
    pub fn previous(&self) -> usize {
        self.current_page.saturating_sub(1)
    }

    /// Offset of the first item on the current page.
    pub fn offset(&self) -> usize {
        self.current_page * self.page_size
    }

    /// Item index range covered by the current page.
    pub fn range(&self) -> Range<usize> {
        let start = self.offset().min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// Page numbers the pager should render.
    ///
    /// Empty when there is at most one page: single-page and empty results
    /// both collapse to "no pager".
    pub fn controls(&self) -> Vec<usize> {
        if self.total_pages <= 1 {
            Vec::new()
        } else {
            (0..self.total_pages).collect()
        }
    }

    /// Like [`controls`](Self::controls), limited to at most `max_visible`
    /// page numbers in a window around the current page.
    pub fn controls_window(&self, max_visible: usize) -> Vec<usize> {
        if self.total_pages <= 1 || max_visible == 0 {
            return Vec::new();
        }
        let visible = max_visible.min(self.total_pages);
        let start = self
            .current_page
            .saturating_sub(visible / 2)
            .min(self.total_pages - visible);
        (start..start + visible).collect()
    }

    /// Takes the page state from a server-paginated response.
    ///
    /// The server is trusted for totals; only the page index is clamped.
    pub fn from_remote<T>(page: &RemotePage<T>) -> Self {
        let mut state = Self {
            current_page: 0,
            page_size: page.page_size.max(1),
            total_items: page.total_elements,
            total_pages: page.total_pages,
        };
        state.current_page = page.page.min(state.last_page());
        state
    }
}

/// One page of results plus its page state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,

    /// Pagination information.
    pub state: PageState,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, state: PageState) -> Self {
        Self { items, state }
    }

    /// Creates an empty page.
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            state: PageState::new(0, page_size, 0),
        }
    }

    /// Returns true if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            state: self.state,
        }
    }
}

/// Slices a filtered sequence into the requested page.
pub fn paginate<T>(items: Vec<T>, page_size: usize, requested_page: i64) -> Page<T> {
    let state = PageState::new(items.len(), page_size, requested_page);
    let range = state.range();
    let items = items
        .into_iter()
        .skip(range.start)
        .take(range.len())
        .collect();
    Page { items, state }
}

/// A server-paginated response.
///
/// `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePage<T> {
    /// Records on this page.
    pub data: Vec<T>,

    /// Zero-based page index.
    pub page: usize,

    /// Requested page size.
    pub page_size: usize,

    /// Total number of pages.
    pub total_pages: usize,

    /// Total number of matching records.
    pub total_elements: usize,
}

impl<T> RemotePage<T> {
    /// Builds a response from a locally computed page.
    pub fn from_page(page: Page<T>) -> Self {
        Self {
            data: page.items,
            page: page.state.current_page,
            page_size: page.state.page_size,
            total_pages: page.state.total_pages,
            total_elements: page.state.total_items,
        }
    }

    /// Converts the response into a page for the view.
    pub fn into_page(self) -> Page<T> {
        let state = PageState::from_remote(&self);
        Page {
            items: self.data,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(PageState::new(0, 5, 0).total_pages, 0);
        assert_eq!(PageState::new(5, 5, 0).total_pages, 1);
        assert_eq!(PageState::new(6, 5, 0).total_pages, 2);
        assert_eq!(PageState::new(7, 5, 0).total_pages, 2);
    }

    #[test]
    fn test_clamp() {
        let state = PageState::new(7, 5, 5);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.range(), 5..7);

        let state = PageState::new(7, 5, -3);
        assert_eq!(state.current_page, 0);

        let state = PageState::new(0, 5, 2);
        assert_eq!(state.current_page, 0);
        assert!(state.is_empty());
        assert_eq!(state.range(), 0..0);
    }

    #[test]
    fn test_zero_page_size_is_total() {
        let state = PageState::new(3, 0, 0);
        assert_eq!(state.page_size, 1);
        assert_eq!(state.total_pages, 3);
    }

    #[test]
    fn test_next_previous_are_clamped() {
        let first = PageState::new(12, 5, 0);
        assert_eq!(first.previous(), 0);
        assert_eq!(first.next(), 1);

        let last = PageState::new(12, 5, 2);
        assert!(!last.has_next());
        assert_eq!(last.next(), 2);
        assert_eq!(last.previous(), 1);
    }

    #[test]
    fn test_controls_collapse() {
        assert!(PageState::new(0, 5, 0).controls().is_empty());
        assert!(PageState::new(5, 5, 0).controls().is_empty());
        assert_eq!(PageState::new(11, 5, 0).controls(), vec![0, 1, 2]);
    }

    #[test]
    fn test_controls_window() {
        let state = PageState::new(100, 10, 5);
        assert_eq!(state.controls_window(5), vec![3, 4, 5, 6, 7]);

        let state = PageState::new(100, 10, 0);
        assert_eq!(state.controls_window(5), vec![0, 1, 2, 3, 4]);

        let state = PageState::new(100, 10, 9);
        assert_eq!(state.controls_window(5), vec![5, 6, 7, 8, 9]);

        let state = PageState::new(20, 10, 1);
        assert_eq!(state.controls_window(5), vec![0, 1]);
    }

    #[test]
    fn test_paginate_slices() {
        let page = paginate((0..12).collect(), 5, 2);
        assert_eq!(page.items, vec![10, 11]);
        assert_eq!(page.state.current_page, 2);
    }

    #[test]
    fn test_remote_page_json() {
        let page: RemotePage<u32> = serde_json::from_str(
            r#"{"data":[1,2],"page":3,"pageSize":2,"totalPages":2,"totalElements":4}"#,
        )
        .unwrap();

        let state = PageState::from_remote(&page);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_items, 4);

        let view = page.into_page();
        assert_eq!(view.items, vec![1, 2]);
    }
}
