//! MovieMind - terminal client for a movie recommendation API
//!
//! # Modules
//!
//! - `models` - Movie records, detail records and request parameters
//! - `api` - HTTP client and the `MovieSource` seam
//! - `state` - View components: suggestion fetcher, result browser, detail
//! - `ui` - ratatui rendering
//! - `app` - Routing, navigation and input dispatch
//! - `cli` / `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod state;
pub mod ui;

// Re-export commonly used types
pub use models::{Movie, MovieDetail, SearchPage, SearchType, TimeWindow};

pub use api::{ApiError, MovieApiClient, MovieSource};
pub use app::{App, Route};
pub use config::Config;
