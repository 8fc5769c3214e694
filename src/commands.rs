//! CLI Command Handlers
//!
//! Each handler takes its CLI args, the shared context and Output, and
//! returns an ExitCode. API failures map to `ExitCode::NetworkError` with
//! the endpoint's fixed message.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::api::{ApiError, MovieApiClient};
use crate::cli::{
    ConfigCmd, ExitCode, HybridCmd, InfoCmd, Output, RecommendCmd, SearchCmd, SuggestCmd,
    TrendingCmd,
};
use crate::config::Config;
use crate::models::{Movie, MovieDetail};
use crate::ui::detail::CAST_LIMIT;

/// Resolved settings shared by every command
pub struct Context {
    pub config: Config,
    /// Where `config --set-api-base` writes
    pub config_path: Option<PathBuf>,
    /// `--api-base` flag, if given
    pub api_base_override: Option<String>,
}

impl Context {
    /// HTTP client for the resolved base URL. On failure the error is
    /// already reported and the exit code is returned instead.
    pub fn client(&self, output: &Output) -> Result<MovieApiClient, ExitCode> {
        self.config
            .client(self.api_base_override.as_deref())
            .map_err(|e| {
                output.error(format!("Failed to create HTTP client: {}", e), ExitCode::Error)
            })
    }
}

fn api_failure(output: &Output, e: ApiError) -> ExitCode {
    output.error(e.to_string(), ExitCode::NetworkError)
}

fn printed(output: &Output, result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Search Command
// =============================================================================

/// One page of search results
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<Movie>,
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.results.is_empty() {
            writeln!(f, "No results for \"{}\"", self.query)?;
        }
        for movie in &self.results {
            writeln!(f, "{:>8}  {}", movie.id, movie)?;
        }
        write!(f, "Page {} of {}", self.page, self.total_pages.max(1))
    }
}

pub async fn search_cmd(cmd: SearchCmd, ctx: &Context, output: &Output) -> ExitCode {
    let client = match ctx.client(output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    output.info(format!("Searching for: {}", cmd.query));

    match client.search(&cmd.query, cmd.page).await {
        Ok(mut page) => {
            page.results.truncate(cmd.limit);
            let report = SearchReport {
                query: cmd.query,
                page: cmd.page,
                total_pages: page.total_pages,
                results: page.results,
            };
            printed(output, output.print(&report))
        }
        Err(e) => api_failure(output, e),
    }
}

// =============================================================================
// Suggest Command
// =============================================================================

pub async fn suggest_cmd(cmd: SuggestCmd, ctx: &Context, output: &Output) -> ExitCode {
    let client = match ctx.client(output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    match client.autocomplete(&cmd.query).await {
        Ok(movies) => printed(output, output.print_list(&movies)),
        Err(e) => api_failure(output, e),
    }
}

// =============================================================================
// Info Command
// =============================================================================

/// Multi-line text rendering of a movie's details
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DetailReport(pub MovieDetail);

impl fmt::Display for DetailReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = &self.0;
        writeln!(f, "{}", detail)?;
        if let Some(tagline) = detail.tagline.as_ref().filter(|t| !t.is_empty()) {
            writeln!(f, "  \"{}\"", tagline)?;
        }
        let genres = detail.genre_names();
        if !genres.is_empty() {
            writeln!(f, "Genres:   {}", genres.join(", "))?;
        }
        if let Some(director) = detail.director() {
            writeln!(f, "Director: {}", director.name)?;
        }
        if let Some(studio) = detail.studio() {
            writeln!(f, "Studio:   {}", studio)?;
        }
        if let Some(overview) = detail.movie.overview.as_ref().filter(|o| !o.is_empty()) {
            writeln!(f)?;
            writeln!(f, "{}", overview)?;
        }
        let cast = detail.top_cast(CAST_LIMIT);
        if !cast.is_empty() {
            writeln!(f, "\nCast:")?;
        }
        for member in cast {
            write!(f, "  {}", member.name)?;
            if let Some(character) = member.character.as_ref().filter(|c| !c.is_empty()) {
                write!(f, " as {}", character)?;
            }
            match member.profile_url() {
                Some(url) => writeln!(f, "  {}", url)?,
                None => writeln!(f)?,
            }
        }
        if let Some(url) = detail.backdrop_url() {
            write!(f, "\nBackdrop: {}", url)?;
        }
        Ok(())
    }
}

pub async fn info_cmd(cmd: InfoCmd, ctx: &Context, output: &Output) -> ExitCode {
    let client = match ctx.client(output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    output.info(format!("Getting info for: {}", cmd.id));

    match client.movie_detail(cmd.id).await {
        Ok(detail) => printed(output, output.print(&DetailReport(detail))),
        Err(e) => api_failure(output, e),
    }
}

// =============================================================================
// Recommendation Commands
// =============================================================================

pub async fn recommend_cmd(cmd: RecommendCmd, ctx: &Context, output: &Output) -> ExitCode {
    let limit = cmd.limit.unwrap_or_else(|| ctx.config.recommendation_limit());
    let client = match ctx.client(output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    output.info(format!("Movies like {}:", cmd.id));

    match client.recommendations(cmd.id, limit).await {
        Ok(movies) => printed(output, output.print_list(&movies)),
        Err(e) => api_failure(output, e),
    }
}

pub async fn hybrid_cmd(cmd: HybridCmd, ctx: &Context, output: &Output) -> ExitCode {
    if cmd.ids.is_empty() {
        return output.error("At least one movie ID is required", ExitCode::InvalidArgs);
    }
    let limit = cmd.limit.unwrap_or_else(|| ctx.config.recommendation_limit());
    let client = match ctx.client(output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    match client.hybrid_recommendations(&cmd.ids, limit).await {
        Ok(movies) => printed(output, output.print_list(&movies)),
        Err(e) => api_failure(output, e),
    }
}

// =============================================================================
// Trending Command
// =============================================================================

pub async fn trending_cmd(cmd: TrendingCmd, ctx: &Context, output: &Output) -> ExitCode {
    let window = cmd
        .window
        .map(Into::into)
        .unwrap_or_else(|| ctx.config.trending_window());
    let client = match ctx.client(output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    output.info(format!("Fetching trending ({})...", window));

    match client.trending(window).await {
        Ok(mut movies) => {
            movies.truncate(cmd.limit);
            printed(output, output.print_list(&movies))
        }
        Err(e) => api_failure(output, e),
    }
}

// =============================================================================
// Config Command
// =============================================================================

/// Effective settings after flag, env and file resolution
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub path: Option<String>,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub debounce_ms: u64,
    pub recommendation_limit: u32,
    pub trending_window: String,
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "config file:          {}",
            self.path.as_deref().unwrap_or("(none)")
        )?;
        writeln!(f, "api_base:             {}", self.api_base)?;
        writeln!(f, "request_timeout_secs: {}", self.request_timeout_secs)?;
        writeln!(f, "debounce_ms:          {}", self.debounce_ms)?;
        writeln!(f, "recommendation_limit: {}", self.recommendation_limit)?;
        write!(f, "trending_window:      {}", self.trending_window)
    }
}

pub fn config_cmd(cmd: ConfigCmd, ctx: &Context, output: &Output) -> ExitCode {
    let mut config = ctx.config.clone();

    if let Some(base) = cmd.set_api_base {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return output.error(
                format!("Invalid base URL (expected http:// or https://): {}", base),
                ExitCode::InvalidArgs,
            );
        }
        let Some(path) = ctx.config_path.as_ref() else {
            return output.error("Could not determine config path", ExitCode::Error);
        };
        config.api_base = Some(base);
        if let Err(e) = config.save_to(path) {
            return output.error(format!("Failed to save config: {}", e), ExitCode::Error);
        }
        output.info(format!("Saved {}", path.display()));
    }

    let report = ConfigReport {
        path: ctx.config_path.as_ref().map(|p| p.display().to_string()),
        api_base: ctx
            .api_base_override
            .clone()
            .unwrap_or_else(|| config.api_base()),
        request_timeout_secs: config.request_timeout().as_secs(),
        debounce_ms: config.debounce().as_millis() as u64,
        recommendation_limit: config.recommendation_limit(),
        trending_window: config.trending_window().to_string(),
    };
    printed(output, output.print(&report))
}
