//! Assertion helpers for pages and record lists.

#![allow(dead_code)]

use medidesk_query::types::{Page, Record};

/// Collects record ids.
pub fn ids<R: Record>(records: &[R]) -> Vec<String> {
    records.iter().map(|r| r.id().to_string()).collect()
}

/// Asserts a page holds exactly the given ids, in order.
pub fn assert_page_ids<R: Record>(page: &Page<R>, expected: &[&str]) {
    let actual = ids(&page.items);
    assert_eq!(
        actual, expected,
        "Page {} mismatch: expected {:?}, got {:?}",
        page.state.current_page, expected, actual
    );
}
