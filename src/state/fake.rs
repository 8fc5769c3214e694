//! In-memory `MovieSource` for state tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{ApiError, Endpoint, FetchError, MovieSource};
use crate::models::{Movie, MovieDetail, SearchPage, TimeWindow};

pub fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        ..Movie::default()
    }
}

/// Answers every call from canned data and records what was asked.
///
/// Autocomplete echoes the query back as a single title so tests can tell
/// which request's response was applied.
#[derive(Default)]
pub struct FakeSource {
    pub autocomplete_calls: Mutex<Vec<String>>,
    pub search_calls: Mutex<Vec<(String, u32)>>,
    pub detail_calls: Mutex<Vec<u64>>,
    /// Per-query autocomplete latency
    pub delays: Mutex<HashMap<String, Duration>>,
    pub total_pages: u32,
    pub fail_search: AtomicBool,
    pub fail_detail: AtomicBool,
    pub fail_recommendations: AtomicBool,
    pub fail_trending: AtomicBool,
}

impl FakeSource {
    pub fn with_pages(total_pages: u32) -> Self {
        Self {
            total_pages,
            ..Self::default()
        }
    }

    pub fn delay(&self, query: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(query.to_string(), delay);
    }

    pub fn autocomplete_calls(&self) -> Vec<String> {
        self.autocomplete_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<u64> {
        self.detail_calls.lock().unwrap().clone()
    }
}

fn fail(endpoint: Endpoint) -> ApiError {
    ApiError::new(endpoint, FetchError::Status(500))
}

#[async_trait]
impl MovieSource for FakeSource {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, ApiError> {
        self.search_calls
            .lock()
            .unwrap()
            .push((query.to_string(), page));
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(fail(Endpoint::Search));
        }
        Ok(SearchPage {
            results: vec![movie(page as u64, &format!("{} p{}", query, page))],
            total_pages: self.total_pages,
        })
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        self.autocomplete_calls
            .lock()
            .unwrap()
            .push(query.to_string());
        let delay = self.delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(vec![movie(query.len() as u64, query)])
    }

    async fn movie_detail(&self, id: u64) -> Result<MovieDetail, ApiError> {
        self.detail_calls.lock().unwrap().push(id);
        if self.fail_detail.load(Ordering::SeqCst) {
            return Err(fail(Endpoint::MovieDetail));
        }
        Ok(MovieDetail {
            movie: movie(id, &format!("Movie {}", id)),
            ..MovieDetail::default()
        })
    }

    async fn recommendations(&self, id: u64, limit: u32) -> Result<Vec<Movie>, ApiError> {
        if self.fail_recommendations.load(Ordering::SeqCst) {
            return Err(fail(Endpoint::Recommendations));
        }
        Ok((1..=limit.min(3) as u64)
            .map(|i| movie(id + i, &format!("Like {} #{}", id, i)))
            .collect())
    }

    async fn hybrid_recommendations(&self, ids: &[u64], _limit: u32) -> Result<Vec<Movie>, ApiError> {
        Ok(ids.iter().map(|id| movie(id + 1000, "Hybrid")).collect())
    }

    async fn trending(&self, _window: TimeWindow) -> Result<Vec<Movie>, ApiError> {
        if self.fail_trending.load(Ordering::SeqCst) {
            return Err(fail(Endpoint::Trending));
        }
        Ok(vec![
            movie(27205, "Inception"),
            movie(155, "The Dark Knight"),
        ])
    }
}
