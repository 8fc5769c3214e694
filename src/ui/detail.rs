//! Detail view: movie info on the left, recommendations on the right

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::models::MovieDetail;
use crate::state::DetailState;
use crate::ui::browser::MovieListView;
use crate::ui::Theme;

/// Number of cast members listed
pub const CAST_LIMIT: usize = 12;

pub fn render_detail(frame: &mut Frame, area: Rect, detail: &mut DetailState, focused: bool) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    render_info(frame, chunks[0], detail);

    let view = MovieListView {
        title: "YOU MIGHT ALSO LIKE",
        movies: detail.recommendations(),
        loading: detail.recommendations_loading(),
        error: detail.recommendations_error(),
        empty_message: "No recommendations",
        focused,
    };
    let mut list = detail.list.clone();
    view.render(frame, chunks[1], &mut list);
    detail.list = list;
}

fn render_info(frame: &mut Frame, area: Rect, detail: &DetailState) {
    let title = detail
        .detail()
        .map(|d| d.title().to_string())
        .unwrap_or_else(|| "DETAIL".to_string());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(format!(" {} ", title), Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let body = if detail.detail_loading() {
        Paragraph::new("⟳ Loading...")
            .style(Theme::loading())
            .alignment(Alignment::Center)
    } else if let Some(error) = detail.detail_error() {
        Paragraph::new(vec![
            Line::from(Span::styled(format!("✗ {}", error), Theme::error())),
            Line::from(Span::styled("press r to retry", Theme::dimmed())),
        ])
        .alignment(Alignment::Center)
    } else if let Some(movie) = detail.detail() {
        Paragraph::new(info_lines(movie)).wrap(Wrap { trim: false })
    } else {
        Paragraph::new("")
    };
    frame.render_widget(body, inner);
}

/// Text of the info panel
pub fn info_lines(detail: &MovieDetail) -> Vec<Line<'static>> {
    let movie = &detail.movie;
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(movie.title.clone(), Theme::title())));
    if let Some(tagline) = detail.tagline.as_ref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(Span::styled(
            tagline.clone(),
            Theme::dimmed().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));

    // Year · runtime · rating
    let mut facts = Vec::new();
    if let Some(year) = movie.display_year() {
        facts.push(Span::styled(year.to_string(), Theme::text()));
    }
    if let Some(runtime) = detail.runtime_str() {
        facts.push(Span::styled(runtime, Theme::text()));
    }
    if movie.rating() > 0.0 {
        facts.push(Span::styled(
            format!("★ {:.1}", movie.rating()),
            Theme::rating(movie.rating()),
        ));
    }
    let mut fact_line = Vec::new();
    for (i, span) in facts.into_iter().enumerate() {
        if i > 0 {
            fact_line.push(Span::styled(" · ", Theme::dimmed()));
        }
        fact_line.push(span);
    }
    if !fact_line.is_empty() {
        lines.push(Line::from(fact_line));
    }

    let genres = detail.genre_names();
    if !genres.is_empty() {
        lines.push(Line::from(Span::styled(genres.join(", "), Theme::genre())));
    }
    lines.push(Line::from(""));

    if let Some(director) = detail.director() {
        lines.push(labelled("Director", director.name.clone()));
    }
    if let Some(studio) = detail.studio() {
        lines.push(labelled("Studio", studio.to_string()));
    }

    if let Some(overview) = movie.overview.as_ref().filter(|o| !o.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(overview.clone(), Theme::text())));
    }

    let cast = detail.top_cast(CAST_LIMIT);
    if !cast.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Cast", Theme::secondary())));
        for member in cast {
            let mut spans = vec![Span::styled(format!("  {}", member.name), Theme::text())];
            if let Some(character) = member.character.as_ref().filter(|c| !c.is_empty()) {
                spans.push(Span::styled(format!(" as {}", character), Theme::dimmed()));
            }
            lines.push(Line::from(spans));
        }
    }

    if let Some(url) = detail.backdrop_url() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(url, Theme::dimmed())));
    }

    lines
}

fn labelled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Theme::dimmed()),
        Span::styled(value, Theme::text()),
    ])
}
