//! Debounced movie search.
//!
//! Text-change events arm a timer; only the query still current when the
//! timer fires reaches the API. Every scheduled search carries the
//! generation it was started for and its outcome is dropped once a newer
//! event has bumped the generation.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use movieapp_api::tmdb::{ApiError, MovieApi, MovieSummary, SearchMovieParams};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Delay between the last text change and the search request.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Where the debouncer currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing scheduled or running.
    #[default]
    Idle,
    /// Timer armed for `query`.
    Pending {
        /// Trimmed text the timer will search for.
        query: String,
    },
    /// Request for `query` in progress.
    InFlight {
        /// Trimmed text being searched.
        query: String,
    },
}

/// Observable search state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Raw text as last entered.
    pub query: String,
    /// Timer and request status.
    pub phase: SearchPhase,
    /// Results of the last successful search.
    pub results: Vec<MovieSummary>,
    /// Error of the last search, if it failed.
    pub error: Option<ApiError>,
    /// Whether a search has completed since the text was last cleared.
    pub has_searched: bool,
}

impl SearchState {
    /// Whether a request is running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::InFlight { .. })
    }

    /// Message to show for the last error.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(ApiError::user_message)
    }

    /// Whether a completed search came back empty.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.has_searched && self.error.is_none() && self.results.is_empty()
    }
}

#[derive(Debug, Default)]
struct Control {
    generation: u64,
    task: Option<JoinHandle<()>>,
    closed: bool,
}

#[derive(Debug)]
struct Shared {
    control: Mutex<Control>,
    state: watch::Sender<SearchState>,
}

impl Shared {
    fn control(&self) -> std::sync::MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `update` only if `generation` is still current.
    fn update_if_current<F>(&self, generation: u64, update: F) -> bool
    where
        F: FnOnce(&mut SearchState),
    {
        let control = self.control();
        if control.closed || control.generation != generation {
            return false;
        }
        self.state.send_modify(update);
        true
    }
}

/// Turns a stream of text edits into few search calls.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct SearchDebouncer<A> {
    api: Arc<A>,
    delay: Duration,
    shared: Arc<Shared>,
}

impl<A> SearchDebouncer<A>
where
    A: MovieApi + Send + Sync + 'static,
{
    /// Creates a debouncer with the default delay.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self::with_delay(api, DEFAULT_DEBOUNCE)
    }

    /// Creates a debouncer with a custom delay.
    #[must_use]
    pub fn with_delay(api: Arc<A>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            api,
            delay,
            shared: Arc::new(Shared {
                control: Mutex::new(Control::default()),
                state,
            }),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    /// Handles a text change: cancels earlier work, then either clears
    /// everything (blank text) or arms the timer.
    pub fn on_query_changed(&self, text: &str) {
        let mut control = self.shared.control();
        if control.closed {
            return;
        }
        let generation = cancel_current(&mut control);

        let query = text.trim();
        if query.is_empty() {
            self.shared.state.send_modify(|state| {
                *state = SearchState {
                    query: String::from(text),
                    ..SearchState::default()
                };
            });
            return;
        }

        let query = String::from(query);
        self.shared.state.send_modify(|state| {
            state.query = String::from(text);
            state.phase = SearchPhase::Pending {
                query: query.clone(),
            };
        });
        tracing::trace!(%query, generation, "search scheduled");
        control.task = Some(tokio::spawn(run_search(
            Arc::clone(&self.shared),
            Arc::clone(&self.api),
            generation,
            query,
            Some(self.delay),
        )));
    }

    /// Searches the current text right away, skipping the timer.
    ///
    /// The state is in flight as soon as this returns. Does nothing if the
    /// text is blank.
    pub fn submit(&self) {
        let mut control = self.shared.control();
        if control.closed {
            return;
        }
        let query = self.shared.state.borrow().query.trim().to_owned();
        if query.is_empty() {
            return;
        }
        let generation = cancel_current(&mut control);
        self.shared.state.send_modify(|state| {
            state.phase = SearchPhase::InFlight {
                query: query.clone(),
            };
            state.error = None;
        });
        control.task = Some(tokio::spawn(run_search(
            Arc::clone(&self.shared),
            Arc::clone(&self.api),
            generation,
            query,
            None,
        )));
    }

    /// Cancels pending and running work; the state is frozen afterwards.
    pub fn shutdown(&self) {
        let mut control = self.shared.control();
        cancel_current(&mut control);
        control.closed = true;
    }
}

impl<A> Drop for SearchDebouncer<A> {
    fn drop(&mut self) {
        let mut control = self.shared.control();
        cancel_current(&mut control);
        control.closed = true;
    }
}

/// Aborts the running task and returns the new generation.
fn cancel_current(control: &mut Control) -> u64 {
    if let Some(task) = control.task.take() {
        task.abort();
    }
    control.generation = control.generation.wrapping_add(1);
    control.generation
}

async fn run_search<A>(
    shared: Arc<Shared>,
    api: Arc<A>,
    generation: u64,
    query: String,
    delay: Option<Duration>,
) where
    A: MovieApi + Send + Sync,
{
    // A submitted search is already marked in flight.
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
        let started = shared.update_if_current(generation, |state| {
            state.phase = SearchPhase::InFlight {
                query: query.clone(),
            };
            state.error = None;
        });
        if !started {
            return;
        }
    }

    let result = api.search_movies(&SearchMovieParams::new(query.as_str())).await;
    let applied = shared.update_if_current(generation, |state| {
        state.phase = SearchPhase::Idle;
        state.has_searched = true;
        match result {
            Ok(page) => {
                tracing::debug!(%query, count = page.results.len(), "search completed");
                state.results = page.results;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(%query, error = %e, "search failed");
                state.error = Some(e);
            }
        }
    });
    if !applied {
        tracing::trace!(%query, generation, "stale search result dropped");
    }
}
