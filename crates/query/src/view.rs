//! A list view: query state, search box and fetching wired together.
//!
//! [`ListView`] owns the three moving parts of one list page and keeps them
//! consistent with each other:
//!
//! - A committed search term is applied to the [`ListQuery`] and, for a
//!   remote view, fetched.
//! - Changing the criteria cancels any pending search commit, so a term typed
//!   before a filter change never lands on top of it. The text stays in the
//!   box and commits again on the next keystroke.
//! - Every criteria, term or page change of a remote view resubmits the
//!   query, superseding a fetch still in flight.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::core::{FetchCoordinator, FetchState, RecordSource};
use crate::error::QueryResult;
use crate::search::{SearchController, SearchState};
use crate::state::ListQuery;
use crate::types::{FilterCriteria, FilterValue, Page, PageState, Record};

struct Shared<R> {
    query: ListQuery<R>,
    /// Bumped by every criteria change.
    epoch: u64,
    /// Epoch at the last keystroke; a commit from an older epoch is dropped.
    armed: u64,
}

/// One list page: a [`ListQuery`], its [`SearchController`] and, for remote
/// data, a [`FetchCoordinator`].
///
/// Requires a Tokio runtime. Dropping the view cancels the pending search
/// commit and the in-flight fetch.
pub struct ListView<R> {
    shared: Arc<Mutex<Shared<R>>>,
    fetch: Option<Arc<FetchCoordinator<R>>>,
    search: SearchController,
}

impl<R> ListView<R>
where
    R: Record + Clone + Send + Sync + 'static,
{
    /// A view over an in-memory collection, filtered with
    /// [`view`](Self::view).
    pub fn local(query: ListQuery<R>, delay: Duration) -> Self {
        Self::build(query, delay, None)
    }

    /// A view whose pages come from `source`, which filters server-side.
    pub fn remote(query: ListQuery<R>, delay: Duration, source: Arc<dyn RecordSource<R>>) -> Self {
        Self::build(query, delay, Some(Arc::new(FetchCoordinator::new(source))))
    }

    fn build(query: ListQuery<R>, delay: Duration, fetch: Option<Arc<FetchCoordinator<R>>>) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            query,
            epoch: 0,
            armed: 0,
        }));

        let target = Arc::clone(&shared);
        let coordinator = fetch.clone();
        let search = SearchController::new(delay, move |term| {
            let mut shared = target.lock();
            if shared.armed != shared.epoch {
                debug!(term = %term, "search commit dropped after criteria change");
                return;
            }
            shared.query.set_search(term);
            if let Some(fetch) = &coordinator {
                fetch.submit(shared.query.remote_query());
            }
        });

        Self {
            shared,
            fetch,
            search,
        }
    }

    /// Records a keystroke in the search box.
    pub fn input(&self, text: impl Into<String>) {
        {
            let mut shared = self.shared.lock();
            shared.armed = shared.epoch;
        }
        self.search.input(text);
    }

    /// The "clear search" action: puts the committed term back in the box.
    pub fn clear_search(&self) {
        self.search.reset_to_committed();
    }

    /// A snapshot of the search box.
    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    /// Selects a value for a filter dimension. Returns the page index (0).
    pub fn set_filter(&self, name: impl Into<String>, value: FilterValue) -> usize {
        self.change_criteria(|query| query.set_filter(name, value))
    }

    /// Removes the selection for one dimension. Returns the page index (0).
    pub fn clear_filter(&self, name: &str) -> usize {
        self.change_criteria(|query| query.clear_filter(name))
    }

    /// Removes every selection. Returns the page index (0).
    pub fn clear_filters(&self) -> usize {
        self.change_criteria(ListQuery::clear_filters)
    }

    /// Replaces the whole criteria. Returns the page index (0).
    pub fn replace_criteria(&self, criteria: FilterCriteria) -> usize {
        self.change_criteria(|query| query.replace_criteria(criteria))
    }

    /// Moves to a page.
    pub fn go_to_page(&self, requested: i64) -> usize {
        self.navigate(|query| query.go_to_page(requested))
    }

    /// Moves to the next page.
    pub fn next_page(&self) -> usize {
        self.navigate(ListQuery::next_page)
    }

    /// Moves to the previous page.
    pub fn previous_page(&self) -> usize {
        self.navigate(ListQuery::previous_page)
    }

    /// Changes rows per page and returns to the first page.
    pub fn set_page_size(&self, page_size: usize) -> QueryResult<usize> {
        let mut shared = self.shared.lock();
        let page = shared.query.set_page_size(page_size)?;
        self.refetch(&shared.query);
        Ok(page)
    }

    /// Filters (memoized) and paginates an in-memory collection.
    pub fn view<'a>(&self, records: &'a Arc<[R]>) -> Page<&'a R> {
        self.shared.lock().query.view(records)
    }

    /// Takes the page state from the loaded remote page, if there is one.
    pub fn sync_remote(&self) -> Option<PageState> {
        let state = self.fetch.as_ref()?.state();
        let page = state.page()?;
        Some(self.shared.lock().query.apply_remote(page))
    }

    /// The active criteria.
    pub fn criteria(&self) -> FilterCriteria {
        self.shared.lock().query.criteria().clone()
    }

    /// The committed search term.
    pub fn search_term(&self) -> String {
        self.shared.lock().query.search_term().to_string()
    }

    /// The current page index.
    pub fn page_index(&self) -> usize {
        self.shared.lock().query.page_index()
    }

    /// The latest fetch state; always [`FetchState::Idle`] for a local view.
    pub fn fetch_state(&self) -> FetchState<R> {
        self.fetch
            .as_ref()
            .map_or(FetchState::Idle, |fetch| fetch.state())
    }

    /// Subscribes to fetch states. `None` for a local view.
    pub fn subscribe(&self) -> Option<watch::Receiver<FetchState<R>>> {
        self.fetch.as_ref().map(|fetch| fetch.subscribe())
    }

    /// Re-submits the last query (the error banner's retry action).
    pub fn retry(&self) -> Option<u64> {
        self.fetch.as_ref()?.retry()
    }

    fn change_criteria(&self, apply: impl FnOnce(&mut ListQuery<R>) -> usize) -> usize {
        self.search.cancel();
        let mut shared = self.shared.lock();
        shared.epoch += 1;
        let page = apply(&mut shared.query);
        self.refetch(&shared.query);
        page
    }

    fn navigate(&self, apply: impl FnOnce(&mut ListQuery<R>) -> usize) -> usize {
        let mut shared = self.shared.lock();
        let page = apply(&mut shared.query);
        self.refetch(&shared.query);
        page
    }

    fn refetch(&self, query: &ListQuery<R>) {
        if let Some(fetch) = &self.fetch {
            fetch.submit(query.remote_query());
        }
    }
}

impl<R> std::fmt::Debug for ListView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("query", &self.shared.lock().query)
            .field("search", &self.search)
            .field("remote", &self.fetch.is_some())
            .finish()
    }
}
