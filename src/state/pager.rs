//! Paginated result browser for the Search and Trending views

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::list::ListState;
use super::task::{RequestFence, TaskHandle, Ticket};
use crate::api::{ApiError, MovieSource};
use crate::models::{Movie, SearchPage, SearchType, TimeWindow};

pub const SEARCH_FAILED: &str = "Failed to search movies";
pub const TRENDING_FAILED: &str = "Failed to load trending movies";

/// What the browser is listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseMode {
    Search {
        query: String,
        search_type: SearchType,
    },
    Trending(TimeWindow),
}

impl Default for BrowseMode {
    fn default() -> Self {
        BrowseMode::Search {
            query: String::new(),
            search_type: SearchType::Movie,
        }
    }
}

/// A finished page fetch
#[derive(Debug)]
pub struct PageUpdate {
    pub ticket: Ticket,
    pub page: u32,
    pub result: Result<SearchPage, ApiError>,
}

/// Results for one `(query, search type, mode)` context, one page at a time
pub struct ResultBrowser {
    source: Arc<dyn MovieSource>,
    mode: BrowseMode,
    page: u32,
    total_pages: u32,
    results: Vec<Movie>,
    pub list: ListState,
    loading: bool,
    error: Option<String>,
    fence: RequestFence,
    pending: Option<TaskHandle>,
    tx: mpsc::UnboundedSender<PageUpdate>,
    rx: mpsc::UnboundedReceiver<PageUpdate>,
}

impl std::fmt::Debug for ResultBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultBrowser")
            .field("mode", &self.mode)
            .field("page", &self.page)
            .field("total_pages", &self.total_pages)
            .field("results", &self.results.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}

impl ResultBrowser {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            mode: BrowseMode::default(),
            page: 1,
            total_pages: 0,
            results: Vec::new(),
            list: ListState::default(),
            loading: false,
            error: None,
            fence: RequestFence::new(),
            pending: None,
            tx,
            rx,
        }
    }

    pub fn mode(&self) -> &BrowseMode {
        &self.mode
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&Movie> {
        self.results.get(self.list.selected)
    }

    /// Pagination controls are shown only for movie searches
    pub fn paginated(&self) -> bool {
        matches!(
            self.mode,
            BrowseMode::Search {
                search_type: SearchType::Movie,
                ..
            }
        )
    }

    pub fn title(&self) -> String {
        match &self.mode {
            BrowseMode::Trending(_) => "Trending Movies".to_string(),
            BrowseMode::Search { query, .. } if query.is_empty() => "Search movies".to_string(),
            BrowseMode::Search {
                query,
                search_type: SearchType::Person,
            } => format!("Movies featuring \"{}\"", query),
            BrowseMode::Search { query, .. } => format!("Search results for \"{}\"", query),
        }
    }

    /// Switch to a new context. A different context starts again at page 1;
    /// the same context is left as is. Returns true if a fetch was started.
    pub fn set_context(&mut self, mode: BrowseMode) -> bool {
        if mode == self.mode && (self.loading || !self.results.is_empty()) {
            return false;
        }
        info!(?mode, "browse context changed");
        self.mode = mode;
        self.page = 1;
        self.total_pages = 0;
        self.fetch()
    }

    /// Flip between movie and person search, back to page 1
    pub fn toggle_search_type(&mut self) -> bool {
        match &self.mode {
            BrowseMode::Search { query, search_type } => {
                let mode = BrowseMode::Search {
                    query: query.clone(),
                    search_type: search_type.toggled(),
                };
                self.set_context(mode)
            }
            BrowseMode::Trending(_) => false,
        }
    }

    /// Next page; a no-op on the last page
    pub fn next(&mut self) -> bool {
        if !self.paginated() || self.page >= self.total_pages.max(1) {
            return false;
        }
        self.page += 1;
        self.fetch()
    }

    /// Previous page; a no-op on page 1
    pub fn previous(&mut self) -> bool {
        if !self.paginated() || self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.fetch()
    }

    /// Re-issue the request for the current page
    pub fn retry(&mut self) -> bool {
        self.fetch()
    }

    fn fetch(&mut self) -> bool {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
        self.error = None;

        let source = self.source.clone();
        let tx = self.tx.clone();
        let page = self.page;

        let handle = match &self.mode {
            BrowseMode::Search { query, .. } if query.trim().is_empty() => {
                self.fence.invalidate();
                self.results.clear();
                self.list.reset(0);
                self.loading = false;
                return false;
            }
            BrowseMode::Search { query, .. } => {
                let ticket = self.fence.issue();
                let query = query.clone();
                debug!(ticket = ticket.id(), %query, page, "fetching search page");
                TaskHandle::spawn(async move {
                    let result = source.search(&query, page).await;
                    let _ = tx.send(PageUpdate { ticket, page, result });
                })
            }
            BrowseMode::Trending(window) => {
                let ticket = self.fence.issue();
                let window = *window;
                debug!(ticket = ticket.id(), %window, "fetching trending");
                TaskHandle::spawn(async move {
                    let result = source.trending(window).await.map(|results| SearchPage {
                        results,
                        total_pages: 1,
                    });
                    let _ = tx.send(PageUpdate { ticket, page, result });
                })
            }
        };

        self.pending = Some(handle);
        self.loading = true;
        true
    }

    /// Apply one update. Returns false if it was stale and dropped.
    pub fn apply(&mut self, update: PageUpdate) -> bool {
        if !self.fence.is_current(update.ticket) {
            debug!(ticket = update.ticket.id(), page = update.page, "discarding stale page");
            return false;
        }
        self.loading = false;
        self.pending = None;

        match update.result {
            Ok(page) => {
                self.total_pages = page.total_pages;
                // The backend may report fewer pages than before
                self.page = self.page.clamp(1, self.total_pages.max(1));
                self.results = page.results;
                self.list.reset(self.results.len());
                self.error = None;
            }
            Err(e) => {
                warn!(page = update.page, error = %e, cause = %e.cause, "page fetch failed");
                self.results.clear();
                self.list.reset(0);
                self.error = Some(match self.mode {
                    BrowseMode::Trending(_) => TRENDING_FAILED,
                    BrowseMode::Search { .. } => SEARCH_FAILED,
                }
                .to_string());
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
}

impl Drop for ResultBrowser {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}
