//! Debounced search input.
//!
//! [`SearchController`] sits between a search box and the list query. The
//! raw input updates synchronously on every keystroke; the committed term
//! only changes once input has been quiet for the debounce delay.
//!
//! ```text
//! Idle(committed) --input differs--> Pending(timer armed)
//! Pending --timer fires--> Idle(new committed)      (on_commit runs)
//! Pending --input reverts to committed--> Idle      (timer cancelled)
//! Pending --further input--> Pending                (timer restarted)
//! ```
//!
//! Each controller owns at most one timer. Every input bumps a generation
//! counter and aborts the previous timer task; a timer that wakes after
//! losing that race sees a newer generation and does nothing.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::debug;

/// Delay used by every search box unless configured otherwise.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Snapshot of a search box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    /// Text currently in the box.
    pub raw_input: String,

    /// Term the list is filtered by.
    pub committed_term: String,

    /// True between an input that differs from the committed term and the
    /// commit or cancellation that follows.
    pub is_pending: bool,
}

type CommitFn = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Default)]
struct Inner {
    state: SearchState,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl Inner {
    /// Invalidates and aborts any armed timer.
    fn disarm(&mut self) {
        self.generation += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Trailing-edge debounce between a search box and its commit callback.
///
/// Timers run on the Tokio runtime, so [`input`](Self::input) must be called
/// from within one. Dropping the controller cancels any pending commit.
pub struct SearchController {
    delay: Duration,
    inner: Arc<Mutex<Inner>>,
    on_commit: CommitFn,
}

impl SearchController {
    /// Creates a controller that calls `on_commit` with each committed term.
    pub fn new<F>(delay: Duration, on_commit: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self {
            delay,
            inner: Arc::new(Mutex::new(Inner::default())),
            on_commit: Arc::new(on_commit),
        }
    }

    /// Creates a controller with the default 300ms delay.
    pub fn with_default_delay<F>(on_commit: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self::new(DEFAULT_DEBOUNCE, on_commit)
    }

    /// The debounce delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a change to the search box.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while a timer needs arming.
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        let mut inner = self.inner.lock();
        inner.state.raw_input = text;
        inner.disarm();

        if inner.state.raw_input == inner.state.committed_term {
            if inner.state.is_pending {
                debug!("search input reverted to committed term, commit cancelled");
            }
            inner.state.is_pending = false;
            return;
        }

        inner.state.is_pending = true;
        let generation = inner.generation;
        let shared = Arc::clone(&self.inner);
        let on_commit = Arc::clone(&self.on_commit);
        let delay = self.delay;

        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let term = {
                let mut inner = shared.lock();
                if inner.generation != generation {
                    return;
                }
                inner.state.committed_term = inner.state.raw_input.clone();
                inner.state.is_pending = false;
                inner.timer = None;
                inner.state.committed_term.clone()
            };

            debug!(term = %term, "search term committed");
            on_commit(term);
        }));
    }

    /// Clears the search box. Follows the normal input rules, so a non-empty
    /// committed term is replaced by `""` after the delay.
    pub fn clear(&self) {
        self.input(String::new());
    }

    /// Puts the committed term back into the box, dropping any pending
    /// commit without firing the callback.
    pub fn reset_to_committed(&self) {
        let mut inner = self.inner.lock();
        inner.disarm();
        inner.state.raw_input = inner.state.committed_term.clone();
        inner.state.is_pending = false;
    }

    /// Cancels a pending commit, leaving the raw input as typed.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        if inner.state.is_pending {
            debug!("pending search commit cancelled");
        }
        inner.disarm();
        inner.state.is_pending = false;
    }

    /// A snapshot of the search box.
    pub fn state(&self) -> SearchState {
        self.inner.lock().state.clone()
    }

    /// The committed term.
    pub fn committed_term(&self) -> String {
        self.inner.lock().state.committed_term.clone()
    }

    /// True while a commit is pending.
    pub fn is_pending(&self) -> bool {
        self.inner.lock().state.is_pending
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.inner.lock().disarm();
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("delay", &self.delay)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
        let commits = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&commits);
        (commits, move |term| sink.lock().push(term))
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_input_is_synchronous() {
        let (commits, on_commit) = recorder();
        let search = SearchController::with_default_delay(on_commit);

        search.input("ja");
        let state = search.state();
        assert_eq!(state.raw_input, "ja");
        assert_eq!(state.committed_term, "");
        assert!(state.is_pending);
        assert!(commits.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_after_quiet_period() {
        let (commits, on_commit) = recorder();
        let search = SearchController::with_default_delay(on_commit);

        search.input("jane");
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(commits.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*commits.lock(), vec!["jane".to_string()]);
        assert!(!search.is_pending());
        assert_eq!(search.committed_term(), "jane");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_to_committed_drops_commit() {
        let (commits, on_commit) = recorder();
        let search = SearchController::with_default_delay(on_commit);

        search.input("jan");
        search.reset_to_committed();
        assert_eq!(search.state(), SearchState::default());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(commits.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_commit() {
        let (commits, on_commit) = recorder();
        let search = SearchController::with_default_delay(on_commit);

        search.input("jane");
        drop(search);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(commits.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_raw_input() {
        let (commits, on_commit) = recorder();
        let search = SearchController::new(Duration::from_millis(50), on_commit);

        search.input("ibu");
        search.cancel();
        let state = search.state();
        assert_eq!(state.raw_input, "ibu");
        assert!(!state.is_pending);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(commits.lock().is_empty());
    }
}
