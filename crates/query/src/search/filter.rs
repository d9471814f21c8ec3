//! The filter engine.
//!
//! Filtering is a stable pass over the collection: matching records keep
//! their relative order and nothing is re-sorted.
//!
//! [`FilterCache`] memoizes the result against the collection's identity and
//! the predicate's value so unrelated re-renders do not re-filter large
//! collections. Recomputing is always safe; the cache only saves work.

use std::sync::{Arc, Weak};

use tracing::trace;

use super::predicate::Predicate;
use crate::types::Record;

/// Returns the records matching the predicate, in their original order.
pub fn filter_records<'a, R: Record>(records: &'a [R], predicate: &Predicate) -> Vec<&'a R> {
    if predicate.is_trivial() {
        return records.iter().collect();
    }
    records.iter().filter(|r| predicate.matches(*r)).collect()
}

/// Returns the indices of the records matching the predicate, ascending.
pub fn filter_indices<R: Record>(records: &[R], predicate: &Predicate) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| predicate.matches(*r))
        .map(|(i, _)| i)
        .collect()
}

struct CacheEntry<R> {
    records: Weak<[R]>,
    predicate: Predicate,
    indices: Vec<usize>,
}

/// Memoized filter result for one list view.
///
/// The collection is identified by its `Arc` allocation, not by content:
/// handing in a new `Arc` (even with equal records) recomputes.
pub struct FilterCache<R> {
    entry: Option<CacheEntry<R>>,
    hits: u64,
    misses: u64,
}

impl<R> Default for FilterCache<R> {
    fn default() -> Self {
        Self {
            entry: None,
            hits: 0,
            misses: 0,
        }
    }
}

impl<R> std::fmt::Debug for FilterCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCache")
            .field("cached", &self.entry.is_some())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

impl<R: Record> FilterCache<R> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the matching indices, recomputing only when the collection or
    /// the predicate changed since the last call.
    pub fn get_or_compute(&mut self, records: &Arc<[R]>, predicate: &Predicate) -> &[usize] {
        let fresh = self.entry.as_ref().is_some_and(|entry| {
            Weak::ptr_eq(&entry.records, &Arc::downgrade(records)) && entry.predicate == *predicate
        });

        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            let indices = filter_indices(records, predicate);
            trace!(
                total = records.len(),
                matched = indices.len(),
                clauses = predicate.clauses().len(),
                "filter recomputed"
            );
            self.entry = Some(CacheEntry {
                records: Arc::downgrade(records),
                predicate: predicate.clone(),
                indices,
            });
        }

        match &self.entry {
            Some(entry) => &entry.indices,
            None => &[],
        }
    }

    /// Drops the cached result.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of calls answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of calls that recomputed.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
