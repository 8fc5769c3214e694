//! MovieMind - movie search and recommendations in your terminal
//!
//! Type to get title suggestions, page through search results, browse
//! what's trending and open any movie for details and recommendations.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! moviemind
//!
//! # CLI mode (for scripting)
//! moviemind search "blade runner"
//! moviemind recommend 550 --json
//! ```

use std::fs::File;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moviemind::app::App;
use moviemind::cli::{Cli, Command, ExitCode, Output};
use moviemind::commands::{self, Context};
use moviemind::config::Config;
use moviemind::state::PageMeta;
use moviemind::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

const DEFAULT_LOG_FILTER: &str = "moviemind=info";

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(Config::path);
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.is_cli_mode() {
        init_logging(None);
        run_cli(cli, config, config_path).await.into()
    } else {
        init_logging(log_file());
        match run_tui(config, cli.api_base).await {
            Ok(()) => ExitCode::Success.into(),
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::Error.into()
            }
        }
    }
}

// =============================================================================
// Logging
// =============================================================================

/// `<cache>/moviemind/moviemind.log`, created on demand
fn log_file() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("moviemind");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("moviemind.log"))
}

/// CLI mode logs to stderr. The TUI owns the screen, so it logs to a file
/// or not at all.
fn init_logging(file: Option<PathBuf>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match file {
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        Some(path) => {
            let Ok(file) = File::options().create(true).append(true).open(&path) else {
                return;
            };
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
    }
}

// =============================================================================
// CLI Mode
// =============================================================================

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: Config, config_path: Option<PathBuf>) -> ExitCode {
    let output = Output::new(&cli);
    let ctx = Context {
        config,
        config_path,
        api_base_override: cli.api_base,
    };

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &ctx, &output).await,
        Some(Command::Suggest(cmd)) => commands::suggest_cmd(cmd, &ctx, &output).await,
        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &ctx, &output).await,
        Some(Command::Recommend(cmd)) => commands::recommend_cmd(cmd, &ctx, &output).await,
        Some(Command::Hybrid(cmd)) => commands::hybrid_cmd(cmd, &ctx, &output).await,
        Some(Command::Trending(cmd)) => commands::trending_cmd(cmd, &ctx, &output).await,
        Some(Command::Config(cmd)) => commands::config_cmd(cmd, &ctx, &output),
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config, api_base: Option<String>) -> Result<()> {
    let client = config.client(api_base.as_deref())?;
    tracing::info!(api_base = client.base_url(), "starting tui");

    let mut terminal = init_terminal()?;

    let mut app = App::new(Arc::new(client), config);
    app.start();

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, applies finished fetches, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let mut title: Option<PageMeta> = None;

    while app.running {
        app.drain();

        let meta = app.page_meta();
        if title.as_ref() != Some(&meta) {
            execute!(terminal.backend_mut(), SetTitle(&meta.title))?;
            title = Some(meta);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        // Polling blocks this thread; yield so fetch tasks keep running
        let ready = tokio::task::block_in_place(|| event::poll(TICK_RATE))?;
        if ready {
            match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                }
                _ => {}
            }
        }
    }

    Ok(())
}
