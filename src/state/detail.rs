//! Detail view state: one movie plus its recommendations

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::list::ListState;
use super::task::{RequestFence, TaskHandle, Ticket};
use crate::api::{ApiError, MovieSource};
use crate::models::{Movie, MovieDetail};

pub const DETAIL_FAILED: &str = "Failed to load movie details";
pub const RECOMMENDATIONS_FAILED: &str = "Failed to load recommendations";

/// Application name, used as the bare window title
pub const APP_NAME: &str = "MovieMind";

/// Metadata the shell applies to the terminal window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            title: APP_NAME.to_string(),
        }
    }
}

impl PageMeta {
    pub fn for_title(title: &str) -> Self {
        Self {
            title: format!("{} - {}", title, APP_NAME),
        }
    }
}

#[derive(Debug)]
pub enum DetailUpdate {
    Detail {
        ticket: Ticket,
        result: Result<MovieDetail, ApiError>,
    },
    Recommendations {
        ticket: Ticket,
        result: Result<Vec<Movie>, ApiError>,
    },
}

impl DetailUpdate {
    fn ticket(&self) -> Ticket {
        match self {
            DetailUpdate::Detail { ticket, .. } => *ticket,
            DetailUpdate::Recommendations { ticket, .. } => *ticket,
        }
    }
}

/// Detail and recommendations for the movie on screen. Both are fetched
/// together and fenced by one ticket, but succeed or fail independently.
pub struct DetailState {
    source: Arc<dyn MovieSource>,
    movie_id: Option<u64>,
    detail: Option<MovieDetail>,
    recommendations: Vec<Movie>,
    /// Selection within the recommendations
    pub list: ListState,
    detail_loading: bool,
    recommendations_loading: bool,
    detail_error: Option<String>,
    recommendations_error: Option<String>,
    fence: RequestFence,
    tasks: Vec<TaskHandle>,
    tx: mpsc::UnboundedSender<DetailUpdate>,
    rx: mpsc::UnboundedReceiver<DetailUpdate>,
}

impl std::fmt::Debug for DetailState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailState")
            .field("movie_id", &self.movie_id)
            .field("detail_loading", &self.detail_loading)
            .field("recommendations_loading", &self.recommendations_loading)
            .field("detail_error", &self.detail_error)
            .field("recommendations_error", &self.recommendations_error)
            .finish()
    }
}

impl DetailState {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            movie_id: None,
            detail: None,
            recommendations: Vec::new(),
            list: ListState::default(),
            detail_loading: false,
            recommendations_loading: false,
            detail_error: None,
            recommendations_error: None,
            fence: RequestFence::new(),
            tasks: Vec::new(),
            tx,
            rx,
        }
    }

    pub fn movie_id(&self) -> Option<u64> {
        self.movie_id
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }

    pub fn recommendations(&self) -> &[Movie] {
        &self.recommendations
    }

    pub fn detail_loading(&self) -> bool {
        self.detail_loading
    }

    pub fn recommendations_loading(&self) -> bool {
        self.recommendations_loading
    }

    pub fn detail_error(&self) -> Option<&str> {
        self.detail_error.as_deref()
    }

    pub fn recommendations_error(&self) -> Option<&str> {
        self.recommendations_error.as_deref()
    }

    pub fn selected_recommendation(&self) -> Option<&Movie> {
        self.recommendations.get(self.list.selected)
    }

    pub fn page_meta(&self) -> PageMeta {
        match &self.detail {
            Some(detail) => PageMeta::for_title(detail.title()),
            None => PageMeta::default(),
        }
    }

    /// Start loading `id`, dropping whatever was shown before
    pub fn load(&mut self, id: u64, limit: u32) {
        self.cancel();
        info!(id, "loading movie");

        self.movie_id = Some(id);
        self.detail = None;
        self.recommendations.clear();
        self.list.reset(0);
        self.detail_error = None;
        self.recommendations_error = None;
        self.detail_loading = true;
        self.recommendations_loading = true;

        let ticket = self.fence.issue();

        let source = self.source.clone();
        let tx = self.tx.clone();
        self.tasks.push(TaskHandle::spawn(async move {
            let result = source.movie_detail(id).await;
            let _ = tx.send(DetailUpdate::Detail { ticket, result });
        }));

        let source = self.source.clone();
        let tx = self.tx.clone();
        self.tasks.push(TaskHandle::spawn(async move {
            let result = source.recommendations(id, limit).await;
            let _ = tx.send(DetailUpdate::Recommendations { ticket, result });
        }));
    }

    /// Reload the current movie
    pub fn retry(&mut self, limit: u32) {
        if let Some(id) = self.movie_id {
            self.load(id, limit);
        }
    }

    fn cancel(&mut self) {
        for task in self.tasks.drain(..) {
            task.cancel();
        }
    }

    pub fn apply(&mut self, update: DetailUpdate) -> bool {
        if !self.fence.is_current(update.ticket()) {
            debug!(ticket = update.ticket().id(), "discarding stale detail update");
            return false;
        }

        match update {
            DetailUpdate::Detail { result, .. } => {
                self.detail_loading = false;
                match result {
                    Ok(detail) => self.detail = Some(detail),
                    Err(e) => {
                        warn!(id = ?self.movie_id, error = %e, cause = %e.cause, "detail fetch failed");
                        self.detail_error = Some(DETAIL_FAILED.to_string());
                    }
                }
            }
            DetailUpdate::Recommendations { result, .. } => {
                self.recommendations_loading = false;
                match result {
                    Ok(movies) => {
                        self.list.reset(movies.len());
                        self.recommendations = movies;
                    }
                    Err(e) => {
                        warn!(id = ?self.movie_id, error = %e, cause = %e.cause, "recommendations fetch failed");
                        self.recommendations_error = Some(RECOMMENDATIONS_FAILED.to_string());
                    }
                }
            }
        }
        true
    }

    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Ok(update) = self.rx.try_recv() {
            changed |= self.apply(update);
        }
        changed
    }

    pub async fn next_update(&mut self) -> bool {
        match self.rx.recv().await {
            Some(update) => self.apply(update),
            None => false,
        }
    }
}

impl Drop for DetailState {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fake::FakeSource;
    use std::sync::atomic::Ordering;

    fn state() -> (Arc<FakeSource>, DetailState) {
        let source = Arc::new(FakeSource::default());
        let state = DetailState::new(source.clone());
        (source, state)
    }

    #[tokio::test]
    async fn test_loads_detail_and_recommendations() {
        let (source, mut d) = state();
        assert_eq!(d.page_meta(), PageMeta::default());
        assert_eq!(d.page_meta().title, "MovieMind");

        d.load(550, 10);
        assert!(d.detail_loading());
        assert!(d.recommendations_loading());

        d.next_update().await;
        d.next_update().await;

        assert_eq!(d.detail().map(|m| m.title()), Some("Movie 550"));
        assert_eq!(d.recommendations().len(), 3);
        assert_eq!(d.page_meta().title, "Movie 550 - MovieMind");
        assert_eq!(source.detail_calls(), vec![550]);
    }

    #[tokio::test]
    async fn test_recommendation_failure_does_not_block_detail() {
        let (source, mut d) = state();
        source.fail_recommendations.store(true, Ordering::SeqCst);
        d.load(603, 10);
        d.next_update().await;
        d.next_update().await;

        assert!(d.detail().is_some());
        assert_eq!(d.detail_error(), None);
        assert_eq!(d.recommendations_error(), Some(RECOMMENDATIONS_FAILED));
        assert!(!d.recommendations_loading());
    }

    #[tokio::test]
    async fn test_detail_failure_keeps_recommendations() {
        let (source, mut d) = state();
        source.fail_detail.store(true, Ordering::SeqCst);
        d.load(603, 10);
        d.next_update().await;
        d.next_update().await;

        assert_eq!(d.detail_error(), Some(DETAIL_FAILED));
        assert!(!d.detail_loading());
        assert_eq!(d.recommendations().len(), 3);
        assert_eq!(d.page_meta(), PageMeta::default());
    }

    #[tokio::test]
    async fn test_switching_movies_discards_old_results() {
        let (_, mut d) = state();
        d.load(1, 10);
        let stale = d.fence.current();
        d.load(2, 10);

        assert!(!d.apply(DetailUpdate::Detail {
            ticket: stale,
            result: Ok(MovieDetail::default()),
        }));
        d.next_update().await;
        d.next_update().await;
        assert_eq!(d.movie_id(), Some(2));
        assert_eq!(d.detail().map(|m| m.movie.id), Some(2));
    }
}
