//! HTTP client for the MovieMind backend
//!
//! Every endpoint is a plain GET returning JSON. Any non-2xx status is a
//! failure; error bodies are never parsed.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::MovieSource;
use crate::models::{Movie, MovieDetail, MovieList, SearchPage, TimeWindow};

/// Minimum query length the autocomplete endpoint is called for
pub const MIN_SUGGEST_LEN: usize = 2;

/// Call sites, each with its own fixed failure message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    Autocomplete,
    MovieDetail,
    Recommendations,
    HybridRecommendations,
    Trending,
}

impl Endpoint {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Endpoint::Search => "Failed to search movies",
            Endpoint::Autocomplete => "Failed to get suggestions",
            Endpoint::MovieDetail => "Failed to fetch movie details",
            Endpoint::Recommendations => "Failed to get recommendations",
            Endpoint::HybridRecommendations => "Failed to get hybrid recommendations",
            Endpoint::Trending => "Failed to get trending movies",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Search => "search",
            Endpoint::Autocomplete => "autocomplete",
            Endpoint::MovieDetail => "movie",
            Endpoint::Recommendations => "recommendations",
            Endpoint::HybridRecommendations => "hybrid",
            Endpoint::Trending => "trending",
        };
        f.write_str(name)
    }
}

/// Underlying cause of a failed request, kept for diagnostics only
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// A failed call. Displays the call site's fixed message.
#[derive(Error, Debug)]
#[error("{}", .endpoint.failure_message())]
pub struct ApiError {
    pub endpoint: Endpoint,
    #[source]
    pub cause: FetchError,
}

impl ApiError {
    pub fn new(endpoint: Endpoint, cause: impl Into<FetchError>) -> Self {
        Self {
            endpoint,
            cause: cause.into(),
        }
    }
}

/// MovieMind API client
#[derive(Debug, Clone)]
pub struct MovieApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl MovieApiClient {
    /// Create a client for the given base URL (e.g. `http://localhost:5002/api`).
    /// Every request it sends gives up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let base_url: String = base_url.into();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `endpoint` (path plus query string) and decode the JSON body
    async fn get<T: DeserializeOwned>(&self, call: Endpoint, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%call, %url, "issuing request");

        let result = self.fetch(&url).await;
        if let Err(ref e) = result {
            warn!(%call, %url, error = %e, "request failed");
        }
        result.map_err(|cause| ApiError::new(call, cause))
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| FetchError::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            status => Err(FetchError::Status(status.as_u16())),
        }
    }

    /// Search movies by title, one page at a time
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchPage, ApiError> {
        let endpoint = format!(
            "/search?query={}&page={}",
            urlencoding::encode(query),
            page
        );
        self.get(Endpoint::Search, &endpoint).await
    }

    /// Title suggestions for a partial query.
    ///
    /// Queries shorter than two characters resolve to an empty list without
    /// touching the network.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        if query.chars().count() < MIN_SUGGEST_LEN {
            return Ok(Vec::new());
        }
        let endpoint = format!("/autocomplete?query={}", urlencoding::encode(query));
        let list: MovieList = self.get(Endpoint::Autocomplete, &endpoint).await?;
        Ok(list.results)
    }

    /// Full details (credits, genres, studios) for one movie
    pub async fn movie_detail(&self, id: u64) -> Result<MovieDetail, ApiError> {
        self.get(Endpoint::MovieDetail, &format!("/movie/{}", id)).await
    }

    /// Content-based recommendations seeded by one movie
    pub async fn recommendations(&self, id: u64, limit: u32) -> Result<Vec<Movie>, ApiError> {
        let endpoint = format!("/recommendations/movie/{}?limit={}", id, limit);
        let list: MovieList = self.get(Endpoint::Recommendations, &endpoint).await?;
        Ok(list.results)
    }

    /// Recommendations seeded by several movies at once
    pub async fn hybrid_recommendations(
        &self,
        ids: &[u64],
        limit: u32,
    ) -> Result<Vec<Movie>, ApiError> {
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let endpoint = format!("/recommendations/hybrid?movie_ids={}&limit={}", joined, limit);
        let list: MovieList = self.get(Endpoint::HybridRecommendations, &endpoint).await?;
        Ok(list.results)
    }

    /// Trending movies for the given window
    pub async fn trending(&self, window: TimeWindow) -> Result<Vec<Movie>, ApiError> {
        let endpoint = format!("/trending?time_window={}", window.as_str());
        let list: MovieList = self.get(Endpoint::Trending, &endpoint).await?;
        Ok(list.results)
    }
}

#[async_trait]
impl MovieSource for MovieApiClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, ApiError> {
        MovieApiClient::search(self, query, page).await
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        MovieApiClient::autocomplete(self, query).await
    }

    async fn movie_detail(&self, id: u64) -> Result<MovieDetail, ApiError> {
        MovieApiClient::movie_detail(self, id).await
    }

    async fn recommendations(&self, id: u64, limit: u32) -> Result<Vec<Movie>, ApiError> {
        MovieApiClient::recommendations(self, id, limit).await
    }

    async fn hybrid_recommendations(
        &self,
        ids: &[u64],
        limit: u32,
    ) -> Result<Vec<Movie>, ApiError> {
        MovieApiClient::hybrid_recommendations(self, ids, limit).await
    }

    async fn trending(&self, window: TimeWindow) -> Result<Vec<Movie>, ApiError> {
        MovieApiClient::trending(self, window).await
    }
}
