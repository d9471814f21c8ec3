//! Per-view list query state.
//!
//! [`ListQuery`] is the one state machine every list page instantiates: the
//! filter criteria, the committed search term and the page position for a
//! single entity type, configured by an [`EntityProfile`].
//!
//! Any change to the criteria or the committed term sends the view back to
//! the first page, even when the page it was on would still exist.
//! Navigation methods return the new page index so the owning view can keep
//! it. Until the changed criteria have been viewed again, navigation is
//! clamped against the last known result size; a query that has never been
//! viewed only clamps negative indices.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::config::ListConfig;
use crate::core::RemoteQuery;
use crate::error::QueryResult;
use crate::search::{FilterCache, Predicate, PredicateBuilder};
use crate::types::{EntityProfile, FilterCriteria, FilterValue, Page, PageState, Record, RemotePage};

/// Filter, search and page state for one list view.
pub struct ListQuery<R> {
    profile: EntityProfile,
    config: ListConfig,
    criteria: FilterCriteria,
    search_term: String,
    page_index: usize,
    page_size: usize,
    as_of: NaiveDate,
    predicate: Predicate,
    last_state: Option<PageState>,
    last_total: Option<usize>,
    cache: FilterCache<R>,
}

impl<R: Record> ListQuery<R> {
    /// Creates the state for a view, starting on the first page with no
    /// filters.
    pub fn new(profile: EntityProfile, config: &ListConfig) -> Self {
        Self {
            profile,
            config: config.clone(),
            criteria: FilterCriteria::new(),
            search_term: String::new(),
            page_index: 0,
            page_size: config.default_page_size.max(1),
            as_of: Utc::now().date_naive(),
            predicate: Predicate::always(),
            last_state: None,
            last_total: None,
            cache: FilterCache::new(),
        }
    }

    /// Sets the reference date for age range filters.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self.rebuild();
        self
    }

    /// The entity profile.
    pub fn profile(&self) -> &EntityProfile {
        &self.profile
    }

    /// The active criteria.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The committed search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// The current page index.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The predicate for the current criteria and term.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Page state computed by the last [`view`](Self::view) or
    /// [`apply_remote`](Self::apply_remote).
    pub fn last_state(&self) -> Option<PageState> {
        self.last_state
    }

    /// Selects a value for a filter dimension. Returns the page index (0).
    pub fn set_filter(&mut self, name: impl Into<String>, value: FilterValue) -> usize {
        let name = name.into();
        debug!(entity = %self.profile.entity, filter = %name, "filter changed");
        self.criteria.set(name, value);
        self.rebuild()
    }

    /// Removes the selection for one dimension. Returns the page index (0).
    pub fn clear_filter(&mut self, name: &str) -> usize {
        self.criteria.remove(name);
        self.rebuild()
    }

    /// Removes every selection ("clear filters"). Returns the page index (0).
    pub fn clear_filters(&mut self) -> usize {
        self.criteria.clear();
        self.rebuild()
    }

    /// Replaces the whole criteria. Returns the page index (0).
    pub fn replace_criteria(&mut self, criteria: FilterCriteria) -> usize {
        self.criteria = criteria;
        self.rebuild()
    }

    /// Applies a committed search term. Returns the page index (0).
    pub fn set_search(&mut self, term: impl Into<String>) -> usize {
        self.search_term = term.into();
        debug!(entity = %self.profile.entity, term = %self.search_term, "search term applied");
        self.rebuild()
    }

    /// Changes rows per page and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> QueryResult<usize> {
        self.config.check_page_size(page_size)?;
        self.page_size = page_size;
        self.page_index = 0;
        self.last_state = None;
        Ok(0)
    }

    /// Moves to a page, clamped against the last computed page state, or
    /// against the last known result size when the criteria changed since.
    pub fn go_to_page(&mut self, requested: i64) -> usize {
        self.page_index = match self.bounds() {
            Some(state) => state.clamp(requested),
            None => usize::try_from(requested.max(0)).unwrap_or(0),
        };
        self.page_index
    }

    fn bounds(&self) -> Option<PageState> {
        self.last_state.or_else(|| {
            self.last_total
                .map(|total| PageState::new(total, self.page_size, 0))
        })
    }

    /// Moves to the next page; a no-op on the last page.
    pub fn next_page(&mut self) -> usize {
        let requested = self.page_index.saturating_add(1);
        self.go_to_page(i64::try_from(requested).unwrap_or(i64::MAX))
    }

    /// Moves to the previous page; a no-op on the first page.
    pub fn previous_page(&mut self) -> usize {
        let requested = self.page_index.saturating_sub(1);
        self.go_to_page(i64::try_from(requested).unwrap_or(0))
    }

    /// Filters (memoized) and paginates an in-memory collection.
    ///
    /// The stored page index is clamped to the result, so the view is never
    /// handed an out-of-range page.
    pub fn view<'a>(&mut self, records: &'a Arc<[R]>) -> Page<&'a R> {
        let indices = self.cache.get_or_compute(records, &self.predicate);
        let state = PageState::new(
            indices.len(),
            self.page_size,
            i64::try_from(self.page_index).unwrap_or(i64::MAX),
        );
        let items = indices[state.range()].iter().map(|&i| &records[i]).collect();

        self.page_index = state.current_page;
        self.last_state = Some(state);
        self.last_total = Some(state.total_items);
        Page::new(items, state)
    }

    /// The query to send to a remote source, which filters server-side.
    pub fn remote_query(&self) -> RemoteQuery {
        RemoteQuery {
            entity: self.profile.entity.clone(),
            criteria: self.criteria.clone(),
            search: self.search_term.clone(),
            page: self.page_index,
            page_size: self.page_size,
        }
    }

    /// Takes the page state from a server response without filtering again.
    pub fn apply_remote<T>(&mut self, page: &RemotePage<T>) -> PageState {
        let state = PageState::from_remote(page);
        self.page_index = state.current_page;
        self.last_state = Some(state);
        self.last_total = Some(state.total_items);
        state
    }

    /// Memoization hits and misses of the filter cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.hits(), self.cache.misses())
    }

    fn rebuild(&mut self) -> usize {
        self.predicate = PredicateBuilder::new(&self.profile)
            .with_as_of(self.as_of)
            .build(&self.criteria, &self.search_term);
        self.page_index = 0;
        self.last_state = None;
        0
    }
}

impl<R> std::fmt::Debug for ListQuery<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListQuery")
            .field("entity", &self.profile.entity)
            .field("criteria", &self.criteria)
            .field("search_term", &self.search_term)
            .field("page_index", &self.page_index)
            .field("page_size", &self.page_size)
            .finish()
    }
}
