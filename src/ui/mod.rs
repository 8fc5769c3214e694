//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first, with mouse support for the search
//! dropdown.

pub mod autocomplete;
pub mod browser;
pub mod detail;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, InputMode, Route};
use crate::models::TimeWindow;
use browser::MovieListView;

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    // Header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let input_area = render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    // Dropdown last so it overlays the content
    autocomplete::render_panel(frame, input_area, &mut app.search_box);
}

/// Logo plus search input. Returns the input's area.
fn render_header(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(15), Constraint::Min(1)])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("Movie", Theme::title()),
        Span::styled("Mind", Theme::secondary().add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, chunks[0]);

    autocomplete::render_input(
        frame,
        chunks[1],
        &app.search_box,
        app.input_mode == InputMode::Editing,
    );
    chunks[1]
}

fn render_content(frame: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.input_mode == InputMode::Normal;
    match app.route {
        Route::Home => render_home(frame, area, app, focused),
        Route::Search { .. } | Route::Trending => {
            browser::render_results(frame, area, &mut app.browser, focused)
        }
        Route::Movie(_) => detail::render_detail(frame, area, &mut app.detail, focused),
    }
}

fn render_home(frame: &mut Frame, area: Rect, app: &mut App, focused: bool) {
    let title = match app.config.trending_window() {
        TimeWindow::Day => "TRENDING TODAY",
        TimeWindow::Week => "TRENDING THIS WEEK",
    };
    let home = &mut app.home;
    let view = MovieListView {
        title,
        movies: home.results(),
        loading: home.is_loading(),
        error: home.error(),
        empty_message: "Nothing trending right now",
        focused,
    };
    let mut list = home.list.clone();
    view.render(frame, area, &mut list);
    home.list = list;
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let view = match app.route {
        Route::Home => "HOME",
        Route::Search { .. } => "SEARCH",
        Route::Trending => "TRENDING",
        Route::Movie(_) => "DETAIL",
    };

    let help = match (&app.input_mode, &app.route) {
        (InputMode::Editing, _) => " ↑↓:suggestions  ↵:select/search  ESC:close ",
        (_, Route::Search { .. }) => " ←→:page  P:people  ↵:open  r:retry  ESC:back  q:quit ",
        (_, Route::Movie(_)) => " ↑↓:recommendations  ↵:open  r:retry  ESC:back  q:quit ",
        _ => " /:search  t:trending  ↵:open  r:retry  q:quit ",
    };

    let line = Line::from(vec![
        mode,
        Span::styled(format!(" {} ", view), Theme::dimmed()),
        Span::raw("│"),
        Span::styled(help, Theme::dimmed()),
    ]);
    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}
