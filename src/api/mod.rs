//! Client for the MovieMind recommendation API
//!
//! - `client`: reqwest-backed HTTP client over the six endpoints
//! - `MovieSource`: the seam view components fetch through, so they can be
//!   driven by a fake in tests

pub mod client;

use async_trait::async_trait;

use crate::models::{Movie, MovieDetail, SearchPage, TimeWindow};

pub use client::{ApiError, Endpoint, FetchError, MovieApiClient};

/// Remote operations the view components depend on
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, ApiError>;

    async fn autocomplete(&self, query: &str) -> Result<Vec<Movie>, ApiError>;

    async fn movie_detail(&self, id: u64) -> Result<MovieDetail, ApiError>;

    async fn recommendations(&self, id: u64, limit: u32) -> Result<Vec<Movie>, ApiError>;

    async fn hybrid_recommendations(&self, ids: &[u64], limit: u32)
        -> Result<Vec<Movie>, ApiError>;

    async fn trending(&self, window: TimeWindow) -> Result<Vec<Movie>, ApiError>;
}
