//! Incremental suggestion fetcher
//!
//! Turns query edits into a debounced, most-recent-wins stream of
//! autocomplete results:
//!
//! ```text
//! Idle ──(len ≥ 2)──▶ PendingDebounce ──(quiet period)──▶ Fetching
//!   ▲                      ▲                                 │
//!   │                      └──────(query changed)────────────┤
//!   └──────(len < 2)───────────────────────────── ShowingResults | Failed
//! ```
//!
//! Each scheduled fetch carries a [`Ticket`]; completions whose ticket is
//! no longer current are dropped, since responses can arrive in any order.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::task::{debounce, RequestFence, TaskHandle, Ticket};
use crate::api::{ApiError, MovieSource, client::MIN_SUGGEST_LEN};
use crate::config::DEFAULT_DEBOUNCE_MS;
use crate::models::Movie;

/// Lifecycle of the current query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Query too short; nothing scheduled
    #[default]
    Idle,
    /// Waiting out the debounce period
    PendingDebounce,
    /// Request in flight
    Fetching,
    /// Last fetch succeeded
    ShowingResults,
    /// Last fetch failed; previous suggestions kept
    Failed,
}

/// Message posted by a background fetch
#[derive(Debug)]
pub enum SuggestionUpdate {
    /// The debounce period elapsed and the request was sent
    Started { ticket: Ticket },
    /// The request completed
    Finished {
        ticket: Ticket,
        query: String,
        result: Result<Vec<Movie>, ApiError>,
    },
}

impl SuggestionUpdate {
    pub fn ticket(&self) -> Ticket {
        match self {
            SuggestionUpdate::Started { ticket } => *ticket,
            SuggestionUpdate::Finished { ticket, .. } => *ticket,
        }
    }
}

/// What the view should show in the suggestion panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelContent {
    /// Query too short; panel hidden
    Hidden,
    Loading,
    NoResults,
    Results,
}

/// Debounced, fenced autocomplete state for one search box
pub struct SuggestionFetcher {
    source: Arc<dyn MovieSource>,
    delay: Duration,
    query: String,
    suggestions: Vec<Movie>,
    loading: bool,
    phase: FetchPhase,
    fence: RequestFence,
    pending: Option<TaskHandle>,
    tx: mpsc::UnboundedSender<SuggestionUpdate>,
    rx: mpsc::UnboundedReceiver<SuggestionUpdate>,
}

impl std::fmt::Debug for SuggestionFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionFetcher")
            .field("query", &self.query)
            .field("suggestions", &self.suggestions.len())
            .field("loading", &self.loading)
            .field("phase", &self.phase)
            .finish()
    }
}

impl SuggestionFetcher {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        Self::with_delay(source, Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }

    pub fn with_delay(source: Arc<dyn MovieSource>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            delay,
            query: String::new(),
            suggestions: Vec::new(),
            loading: false,
            phase: FetchPhase::Idle,
            fence: RequestFence::new(),
            pending: None,
            tx,
            rx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Movie] {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Whether the current query is long enough to look up
    pub fn query_is_searchable(&self) -> bool {
        self.query.chars().count() >= MIN_SUGGEST_LEN
    }

    /// Panel state derived from the loading flag, results and query length
    pub fn panel_content(&self) -> PanelContent {
        if !self.query_is_searchable() {
            PanelContent::Hidden
        } else if self.loading {
            PanelContent::Loading
        } else if self.suggestions.is_empty() {
            PanelContent::NoResults
        } else {
            PanelContent::Results
        }
    }

    /// Feed a new query value.
    ///
    /// Below the minimum length the suggestions are cleared immediately.
    /// Otherwise any pending timer is cancelled and a new fetch is scheduled
    /// after the debounce period.
    pub fn set_query(&mut self, query: &str) {
        if query == self.query {
            return;
        }
        self.query = query.to_string();
        self.cancel_pending();

        if !self.query_is_searchable() {
            self.fence.invalidate();
            self.suggestions.clear();
            self.loading = false;
            self.phase = FetchPhase::Idle;
            return;
        }

        let ticket = self.fence.issue();
        let source = self.source.clone();
        let tx = self.tx.clone();
        let query = self.query.clone();

        self.pending = Some(debounce(self.delay, async move {
            let _ = tx.send(SuggestionUpdate::Started { ticket });
            debug!(ticket = ticket.id(), %query, "fetching suggestions");
            let result = source.autocomplete(&query).await;
            let _ = tx.send(SuggestionUpdate::Finished {
                ticket,
                query,
                result,
            });
        }));
        self.phase = FetchPhase::PendingDebounce;
    }

    /// Clear the query and everything derived from it
    pub fn clear(&mut self) {
        self.set_query("");
    }

    /// Apply one update. Returns false if it was stale and dropped.
    pub fn apply(&mut self, update: SuggestionUpdate) -> bool {
        if !self.fence.is_current(update.ticket()) {
            debug!(ticket = update.ticket().id(), "discarding stale suggestion update");
            return false;
        }

        match update {
            SuggestionUpdate::Started { .. } => {
                self.loading = true;
                self.phase = FetchPhase::Fetching;
            }
            SuggestionUpdate::Finished { query, result, .. } => {
                self.loading = false;
                match result {
                    Ok(movies) => {
                        debug!(%query, count = movies.len(), "suggestions updated");
                        self.suggestions = movies;
                        self.phase = FetchPhase::ShowingResults;
                    }
                    Err(e) => {
                        warn!(%query, error = %e, cause = %e.cause, "suggestion fetch failed");
                        self.phase = FetchPhase::Failed;
                    }
                }
            }
        }
        true
    }

    /// Apply every update already queued. Returns true if anything changed.
    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Ok(update) = self.rx.try_recv() {
            changed |= self.apply(update);
        }
        changed
    }

    /// Wait for the next queued update and apply it
    pub async fn next_update(&mut self) -> bool {
        match self.rx.recv().await {
            Some(update) => self.apply(update),
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn fence_current(&self) -> Ticket {
        self.fence.current()
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}

impl Drop for SuggestionFetcher {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
