//! CLI - Command Line Interface for MovieMind
//!
//! Every lookup the TUI does is also available as a subcommand, with
//! JSON output for scripting.
//!
//! # Examples
//!
//! ```bash
//! moviemind search "blade runner" --page 2
//! moviemind suggest mat
//! moviemind info 550
//! moviemind recommend 550 --limit 5
//! moviemind hybrid 550,603,13
//! moviemind trending --window day --json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::TimeWindow;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Backend unreachable or returned an error
    NetworkError = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// MovieMind - movie search and recommendations in your terminal
///
/// Run without arguments to launch the interactive TUI.
#[derive(Parser, Debug)]
#[command(
    name = "moviemind",
    version,
    about = "Movie search, trending and recommendations",
    long_about = "Search movies as you type, browse what's trending, and get \
                  recommendations from a MovieMind backend.\n\n\
                  Run without arguments to launch the interactive TUI.",
    after_help = "EXAMPLES:\n\
                  moviemind                          Launch interactive TUI\n\
                  moviemind search \"heat\"            Search movies\n\
                  moviemind recommend 550 -l 5       Movies like Fight Club\n\
                  moviemind trending --json          Trending as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:5002/api
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search movies by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Title suggestions for a partial query
    Suggest(SuggestCmd),

    /// Full details for one movie
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Movies similar to one movie
    #[command(visible_alias = "rec")]
    Recommend(RecommendCmd),

    /// Movies similar to several movies at once
    Hybrid(HybridCmd),

    /// Trending movies
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Show or update the configuration
    Config(ConfigCmd),
}

/// Search movies by title, one page at a time
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query
    #[arg(required = true)]
    pub query: String,

    /// Result page (1-based)
    #[arg(long, short = 'p', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Maximum number of results to print
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Autocomplete suggestions
#[derive(Args, Debug)]
pub struct SuggestCmd {
    /// Partial title; fewer than two characters yields no suggestions
    pub query: String,
}

#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB movie ID
    #[arg(required = true)]
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct RecommendCmd {
    /// TMDB movie ID to base recommendations on
    #[arg(required = true)]
    pub id: u64,

    /// Number of recommendations (defaults to the configured limit)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct HybridCmd {
    /// Comma-separated TMDB movie IDs
    #[arg(required = true, value_delimiter = ',', num_args = 1..)]
    pub ids: Vec<u64>,

    /// Number of recommendations (defaults to the configured limit)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Time window (defaults to the configured window)
    #[arg(long, short = 'w', value_enum)]
    pub window: Option<TrendingWindow>,

    /// Maximum number of results to print
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Time window for trending movies
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingWindow {
    Day,
    Week,
}

impl From<TrendingWindow> for TimeWindow {
    fn from(window: TrendingWindow) -> Self {
        match window {
            TrendingWindow::Day => TimeWindow::Day,
            TrendingWindow::Week => TimeWindow::Week,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConfigCmd {
    /// Save a new backend base URL to the config file
    #[arg(long)]
    pub set_api_base: Option<String>,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print one value: JSON envelope, or its Display form
    pub fn print<T: Serialize + Display>(&self, data: &T) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::success(data))?);
        } else {
            println!("{}", data);
        }
        Ok(())
    }

    /// Print a list: JSON envelope, or one Display line per item
    pub fn print_list<T: Serialize + Display>(&self, items: &[T]) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::success(items))?);
        } else if items.is_empty() {
            self.info("No results");
        } else {
            for item in items {
                println!("{}", item);
            }
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet and JSON modes)
    pub fn info(&self, msg: impl Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
    }

    #[test]
    fn test_json_output_error_shape() {
        let out = JsonOutput::<()>::error_msg("Failed to search movies", ExitCode::NetworkError);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "Failed to search movies", "exit_code": 3})
        );
    }

    #[test]
    fn test_json_output_success_omits_exit_code() {
        let json = serde_json::to_value(JsonOutput::success(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"data": [1, 2]}));
    }
}
