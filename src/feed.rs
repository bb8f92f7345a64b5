//! Paginated headline feed.
//!
//! [`Feed`] owns the accumulated article list for one [`Selection`] and
//! exposes the two operations a reader needs: [`Feed::reset`] when the
//! selection changes (or to retry), and [`Feed::fetch_next_page`] to load more.
//!
//! # State Machine
//!
//! ```text
//!          reset()            ok
//!   Idle ──────────▶ Loading ───────▶ Ready ──▶ (fetch_next_page)* ──▶ Exhausted
//!                       │
//!                       │ err
//!                       ▼
//!                     Failed ── reset() ──▶ Loading
//! ```
//!
//! # Policies
//!
//! - A failed first page blocks the view: there is nothing to show, so the
//!   classified error is stored and the list stays empty.
//! - A failed later page only logs and reports the error; the list already
//!   loaded stays visible.
//! - Every reset bumps a generation counter. Responses that arrive for an
//!   older generation are dropped, so the last selection always wins.
//! - At most one next-page request is in flight. The flag is checked and set
//!   under the state lock before any request is issued.
//! - Once the accumulated length reaches the last reported total, no more
//!   requests are made.
//!
//! The state lock is a plain `std::sync::Mutex` and is never held across an
//! `.await`.

use crate::api::HeadlineSource;
use crate::error::FetchError;
use crate::models::{Article, FetchParams, Selection};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Default number of articles per page.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// What a call to [`Feed::reset`] ended up doing.
#[derive(Debug)]
pub enum ResetOutcome {
    /// The first page was applied; carries the number of articles.
    Loaded(usize),
    /// The first page failed; its message is now the feed's error.
    Failed(FetchError),
    /// A newer reset started before this one finished. Nothing was applied.
    Superseded,
}

/// Why [`Feed::fetch_next_page`] declined to issue a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The first page for the current selection has not arrived yet.
    Loading,
    /// Another next-page request is already in flight.
    InFlight,
    /// The first page failed; only a reset can recover.
    Blocked,
    /// Everything the upstream reported has been loaded.
    Exhausted,
}

/// What a call to [`Feed::fetch_next_page`] ended up doing.
#[derive(Debug)]
pub enum NextPageOutcome {
    /// The page was appended; carries the number of new articles.
    Appended(usize),
    /// No request was made.
    Skipped(SkipReason),
    /// The request failed. Visible state is unchanged.
    Failed(FetchError),
    /// The selection changed while the request was in flight.
    Superseded,
}

/// Owned view of the feed handed to whatever renders it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub selection: Selection,
    pub articles: Vec<Article>,
    pub loading: bool,
    pub error: Option<String>,
    pub current_page: u32,
    pub total_results: usize,
    pub has_more: bool,
}

#[derive(Debug, Default)]
struct FeedState {
    selection: Selection,
    generation: u64,
    articles: Vec<Article>,
    current_page: u32,
    total_results: usize,
    loading: bool,
    next_in_flight: bool,
    error: Option<String>,
}

impl FeedState {
    fn has_more(&self) -> bool {
        self.articles.len() < self.total_results
    }
}

/// Accumulating, paginated view over a [`HeadlineSource`].
///
/// The page size is fixed for the lifetime of the feed. Country and category
/// arrive together as a [`Selection`] on every [`Feed::reset`].
#[derive(Debug)]
pub struct Feed<S> {
    source: S,
    page_size: u32,
    state: Mutex<FeedState>,
}

impl<S: HeadlineSource> Feed<S> {
    /// Create an idle feed. Nothing is fetched until [`Feed::reset`].
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            state: Mutex::new(FeedState::default()),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        // State is only ever assigned whole fields, so a poisoned lock still
        // holds a consistent value.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Discard everything and load page 1 for `selection`.
    ///
    /// Also serves as the retry action after a failed first page.
    #[instrument(
        level = "info",
        skip_all,
        fields(country = %selection.country, category = %selection.category)
    )]
    pub async fn reset(&self, selection: Selection) -> ResetOutcome {
        let (generation, params) = {
            let mut state = self.lock();
            state.generation += 1;
            state.selection = selection;
            state.articles.clear();
            state.current_page = 1;
            state.total_results = 0;
            state.loading = true;
            state.next_in_flight = false;
            state.error = None;
            (
                state.generation,
                FetchParams::new(&state.selection, 1, self.page_size),
            )
        };
        debug!(generation, "Loading first page");

        let result = self.source.fetch_page(&params).await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                generation,
                current = state.generation,
                "Discarding first page for a superseded selection"
            );
            return ResetOutcome::Superseded;
        }

        state.loading = false;
        match result {
            Ok(page) => {
                let count = page.articles.len();
                state.articles = page.articles;
                state.total_results = page.total_results;
                info!(
                    count,
                    total_results = state.total_results,
                    "Loaded first page"
                );
                ResetOutcome::Loaded(count)
            }
            Err(e) => {
                warn!(error = %e, "First page failed");
                state.error = Some(e.to_string());
                ResetOutcome::Failed(e)
            }
        }
    }

    /// Load the page after the current one and append it.
    ///
    /// A no-op while the first page is loading, while another next-page
    /// request is in flight, after a failed first page, or once the total has
    /// been reached.
    #[instrument(level = "info", skip_all)]
    pub async fn fetch_next_page(&self) -> NextPageOutcome {
        let (generation, params) = {
            let mut state = self.lock();
            let skip = if state.loading {
                Some(SkipReason::Loading)
            } else if state.next_in_flight {
                Some(SkipReason::InFlight)
            } else if state.error.is_some() {
                Some(SkipReason::Blocked)
            } else if !state.has_more() {
                Some(SkipReason::Exhausted)
            } else {
                None
            };
            if let Some(reason) = skip {
                debug!(?reason, "Not fetching next page");
                return NextPageOutcome::Skipped(reason);
            }

            state.next_in_flight = true;
            (
                state.generation,
                FetchParams::new(&state.selection, state.current_page + 1, self.page_size),
            )
        };
        debug!(page = params.page, "Loading next page");

        let result = self.source.fetch_page(&params).await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                page = params.page,
                "Discarding next page for a superseded selection"
            );
            return NextPageOutcome::Superseded;
        }

        state.next_in_flight = false;
        match result {
            Ok(page) => {
                let count = page.articles.len();
                state.articles.extend(page.articles);
                state.current_page = params.page;
                state.total_results = page.total_results;
                info!(
                    page = params.page,
                    count,
                    accumulated = state.articles.len(),
                    total_results = state.total_results,
                    "Appended page"
                );
                NextPageOutcome::Appended(count)
            }
            Err(e) => {
                warn!(page = params.page, error = %e, "Next page failed; keeping loaded articles");
                NextPageOutcome::Failed(e)
            }
        }
    }

    /// Whether the upstream reported more articles than are loaded.
    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().articles.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.lock().current_page
    }

    pub fn selection(&self) -> Selection {
        self.lock().selection.clone()
    }

    /// Copy of the full feed state.
    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.lock();
        FeedSnapshot {
            selection: state.selection.clone(),
            articles: state.articles.clone(),
            loading: state.loading,
            error: state.error.clone(),
            current_page: state.current_page,
            total_results: state.total_results,
            has_more: state.has_more(),
        }
    }
}
