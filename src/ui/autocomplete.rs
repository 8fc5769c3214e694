//! Search input with its suggestion dropdown
//!
//! The dropdown is drawn after the main content so it overlays it. Both
//! rectangles are recorded on the `SearchBox` for mouse hit testing.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
};

use crate::state::{PanelContent, SearchBox};
use crate::ui::Theme;

/// Autocomplete returns at most this many rows
pub const MAX_ROWS: u16 = 10;

/// Draw the input box
pub fn render_input(frame: &mut Frame, area: Rect, search: &SearchBox, focused: bool) {
    let query = search.query();

    let text = if focused {
        let split = query
            .char_indices()
            .nth(search.cursor())
            .map(|(i, _)| i)
            .unwrap_or(query.len());
        let (before, after) = query.split_at(split);
        format!("⌕ {}│{}", before, after)
    } else if query.is_empty() {
        "⌕ Search for movies...".to_string()
    } else {
        format!("⌕ {}", query)
    };

    let input = Paragraph::new(text)
        .style(if focused {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if focused {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(input, area);
}

/// Rectangle the dropdown occupies under `input`, clipped to `screen`
pub fn panel_area(input: Rect, screen: Rect, rows: u16) -> Rect {
    let y = input.y.saturating_add(input.height);
    let available = screen.bottom().saturating_sub(y);
    Rect {
        x: input.x,
        y,
        width: input.width,
        height: (rows + 2).min(available),
    }
}

/// Draw the dropdown (if visible) and record hit-test bounds
pub fn render_panel(frame: &mut Frame, input: Rect, search: &mut SearchBox) {
    if !search.panel_visible() {
        search.set_bounds(input, Rect::default());
        return;
    }

    let fetcher = search.fetcher();
    let items: Vec<ListItem> = match fetcher.panel_content() {
        PanelContent::Hidden => Vec::new(),
        PanelContent::Loading => vec![ListItem::new(Span::styled(
            " ⟳ Searching...",
            Theme::loading(),
        ))],
        PanelContent::NoResults => vec![ListItem::new(Span::styled(
            " No movies found",
            Theme::dimmed(),
        ))],
        PanelContent::Results => search
            .visible_suggestions()
            .iter()
            .take(MAX_ROWS as usize)
            .enumerate()
            .map(|(i, movie)| {
                let style = if search.highlight() == Some(i) {
                    Theme::highlighted()
                } else {
                    Theme::text()
                };
                ListItem::new(Span::styled(format!(" {}", movie), style))
            })
            .collect(),
    };

    let area = panel_area(input, frame.area(), items.len() as u16);
    frame.render_widget(Clear, area);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_focused())
            .style(Style::default().bg(Theme::PANEL)),
    );
    frame.render_widget(list, area);

    search.set_bounds(input, area);
}
