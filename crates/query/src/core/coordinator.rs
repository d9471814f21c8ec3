//! Latest-wins fetch coordination.
//!
//! When criteria change while a fetch is still in flight, the old fetch must
//! not land on top of the new one. [`FetchCoordinator`] guarantees that:
//!
//! - Each [`submit`](FetchCoordinator::submit) bumps a generation counter and
//!   aborts the previous fetch task.
//! - A finished fetch publishes its result only if its generation is still
//!   the current one; otherwise the response is stale and is dropped.
//! - Publishing happens under the same lock that guards the generation, so a
//!   submit cannot slip in between the check and the publish.
//!
//! Results are published through a `tokio::sync::watch` channel as
//! [`FetchState`] values.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::source::{RecordSource, RemoteQuery};
use crate::types::RemotePage;

/// The published state of a coordinated fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<R> {
    /// Nothing requested yet, or the last request was cancelled.
    Idle,

    /// A fetch for `generation` is in flight.
    Loading {
        /// Generation of the in-flight fetch.
        generation: u64,
    },

    /// The current fetch succeeded.
    Loaded {
        /// Generation that produced the page.
        generation: u64,
        /// The page.
        page: RemotePage<R>,
    },

    /// The current fetch failed; the view shows an error banner with a
    /// retry action.
    Failed {
        /// Generation that failed.
        generation: u64,
        /// Error message for the banner.
        message: String,
    },
}

impl<R> FetchState<R> {
    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    /// The loaded page, if any.
    pub fn page(&self) -> Option<&RemotePage<R>> {
        match self {
            FetchState::Loaded { page, .. } => Some(page),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Inner {
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    last_query: Option<RemoteQuery>,
}

impl Inner {
    fn abort_in_flight(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}

/// Runs fetches against a [`RecordSource`], keeping only the newest result.
///
/// Requires a Tokio runtime. Dropping the coordinator aborts the in-flight
/// fetch.
pub struct FetchCoordinator<R> {
    source: Arc<dyn RecordSource<R>>,
    inner: Arc<Mutex<Inner>>,
    state: Arc<watch::Sender<FetchState<R>>>,
}

impl<R> FetchCoordinator<R>
where
    R: Clone + Send + Sync + 'static,
{
    /// Creates a coordinator over a source.
    pub fn new(source: Arc<dyn RecordSource<R>>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            source,
            inner: Arc::new(Mutex::new(Inner::default())),
            state: Arc::new(state),
        }
    }

    /// Subscribes to published states.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<R>> {
        self.state.subscribe()
    }

    /// The latest published state.
    pub fn state(&self) -> FetchState<R> {
        self.state.borrow().clone()
    }

    /// The generation of the newest request.
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// The most recently submitted query.
    pub fn last_query(&self) -> Option<RemoteQuery> {
        self.inner.lock().last_query.clone()
    }

    /// Starts a fetch, superseding any fetch still in flight.
    ///
    /// Returns the generation assigned to this request.
    pub fn submit(&self, query: RemoteQuery) -> u64 {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        let generation = inner.generation;

        if inner.in_flight.is_some() {
            debug!(generation, "superseding in-flight fetch");
        }
        inner.abort_in_flight();
        inner.last_query = Some(query.clone());
        self.state.send_replace(FetchState::Loading { generation });

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.inner);
        let state = Arc::clone(&self.state);

        inner.in_flight = Some(tokio::spawn(async move {
            let result = source.fetch(&query).await;

            let mut inner = shared.lock();
            if inner.generation != generation {
                debug!(
                    generation,
                    current = inner.generation,
                    "discarding stale fetch response"
                );
                return;
            }

            let next = match result {
                Ok(page) => FetchState::Loaded { generation, page },
                Err(err) => {
                    warn!(generation, entity = %query.entity, error = %err, "fetch failed");
                    FetchState::Failed {
                        generation,
                        message: err.to_string(),
                    }
                }
            };
            state.send_replace(next);
            inner.in_flight = None;
        }));

        generation
    }

    /// Re-submits the last query (the error banner's retry action).
    ///
    /// Returns `None` when nothing has been submitted yet.
    pub fn retry(&self) -> Option<u64> {
        let query = self.last_query()?;
        Some(self.submit(query))
    }

    /// Cancels the in-flight fetch, if any. Its response will be ignored.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.abort_in_flight();
        let loading = self.state.borrow().is_loading();
        if loading {
            self.state.send_replace(FetchState::Idle);
        }
    }
}

impl<R> Drop for FetchCoordinator<R> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.abort_in_flight();
    }
}
