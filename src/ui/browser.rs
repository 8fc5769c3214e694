//! Movie list views
//!
//! Renders a titled list of movies with loading, error and empty states,
//! plus the pagination footer for search results.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::models::Movie;
use crate::state::{ListState, ResultBrowser};
use crate::ui::Theme;

/// Everything a list panel needs to draw itself
pub struct MovieListView<'a> {
    pub title: &'a str,
    pub movies: &'a [Movie],
    pub loading: bool,
    pub error: Option<&'a str>,
    pub empty_message: &'a str,
    pub focused: bool,
}

impl MovieListView<'_> {
    /// Render into `area`, scrolling `list` so the selection stays visible
    pub fn render(&self, frame: &mut Frame, area: Rect, list: &mut ListState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                Theme::border_focused()
            } else {
                Theme::border()
            })
            .title(Span::styled(format!(" {} ", self.title), Theme::title()));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.loading {
            let loading = Paragraph::new("⟳ Loading...")
                .style(Theme::loading())
                .alignment(Alignment::Center);
            frame.render_widget(loading, inner);
            return;
        }

        if let Some(error) = self.error {
            let error = Paragraph::new(vec![
                Line::from(Span::styled(format!("✗ {}", error), Theme::error())),
                Line::from(Span::styled("press r to retry", Theme::dimmed())),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(error, inner);
            return;
        }

        if self.movies.is_empty() {
            let empty = Paragraph::new(self.empty_message)
                .style(Theme::dimmed())
                .alignment(Alignment::Center);
            frame.render_widget(empty, inner);
            return;
        }

        let visible = inner.height as usize;
        list.scroll_into_view(visible);

        let items: Vec<ListItem> = self
            .movies
            .iter()
            .enumerate()
            .skip(list.offset)
            .take(visible)
            .map(|(i, movie)| render_item(movie, i == list.selected && self.focused))
            .collect();

        frame.render_widget(List::new(items).style(Theme::text()), inner);
    }
}

/// One row: `▸ Title (Year)  ★ 8.4`
pub fn render_item(movie: &Movie, selected: bool) -> ListItem<'static> {
    let marker = if selected { "▸ " } else { "  " };
    let year = movie
        .display_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();

    let mut spans = vec![
        Span::styled(marker, Theme::accent()),
        Span::styled(
            movie.title.clone(),
            if selected {
                Theme::highlighted()
            } else {
                Theme::text()
            },
        ),
        Span::styled(year, Theme::year()),
    ];
    if movie.rating() > 0.0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("★ {:.1}", movie.rating()),
            Theme::rating(movie.rating()),
        ));
    }

    ListItem::new(Line::from(spans))
}

/// `◀ p  Page 2 of 7  n ▶`, with arrows only where a move is possible
pub fn pagination_line(page: u32, total_pages: u32) -> Line<'static> {
    let total = total_pages.max(1);
    let prev = if page > 1 {
        Span::styled("◀ p", Theme::keybind())
    } else {
        Span::styled("   ", Theme::dimmed())
    };
    let next = if page < total {
        Span::styled("n ▶", Theme::keybind())
    } else {
        Span::styled("   ", Theme::dimmed())
    };
    Line::from(vec![
        prev,
        Span::styled(format!("  Page {} of {}  ", page, total), Theme::text()),
        next,
    ])
}

/// Search or trending results, with the pagination footer when applicable
pub fn render_results(frame: &mut Frame, area: Rect, browser: &mut ResultBrowser, focused: bool) {
    let show_pages = browser.paginated() && browser.total_pages() > 1 && !browser.is_loading();

    let (list_area, footer) = if show_pages {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let title = browser.title();
    let view = MovieListView {
        title: &title,
        movies: browser.results(),
        loading: browser.is_loading(),
        error: browser.error(),
        empty_message: "No movies found",
        focused,
    };
    // The view borrows the results; the selection is a separate field
    let mut list = browser.list.clone();
    view.render(frame, list_area, &mut list);
    browser.list = list;

    if let Some(footer) = footer {
        let line = pagination_line(browser.page(), browser.total_pages());
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), footer);
    }
}
