//! Search box: text editing plus the suggestion panel

use ratatui::layout::{Position, Rect};

use super::suggest::SuggestionFetcher;
use crate::models::Movie;

/// What Enter in the search box resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    /// Open the detail view for a suggestion
    Select(Movie),
    /// Run a full search for the query
    Submit(String),
}

/// Where a mouse click landed relative to the search component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Outside,
    Input,
    Suggestion(usize),
}

/// Query editor with cursor, owning the suggestion fetcher and panel state
#[derive(Debug)]
pub struct SearchBox {
    query: String,
    /// Cursor position in chars
    cursor: usize,
    fetcher: SuggestionFetcher,
    open: bool,
    highlight: Option<usize>,
    input_area: Rect,
    panel_area: Rect,
    /// Suggestion rows that fit in the last drawn panel; `None` before the
    /// panel has been drawn
    rows_shown: Option<usize>,
}

impl SearchBox {
    pub fn new(fetcher: SuggestionFetcher) -> Self {
        Self {
            query: String::new(),
            cursor: 0,
            fetcher,
            open: false,
            highlight: None,
            input_area: Rect::default(),
            panel_area: Rect::default(),
            rows_shown: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn fetcher(&self) -> &SuggestionFetcher {
        &self.fetcher
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Panel is drawn only while open and the query is long enough
    pub fn panel_visible(&self) -> bool {
        self.open && self.fetcher.query_is_searchable()
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    fn byte_index(&self, char_idx: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    fn edited(&mut self) {
        self.open = true;
        self.highlight = None;
        self.fetcher.set_query(&self.query);
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.query.insert(at, c);
        self.cursor += 1;
        self.edited();
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.query.remove(at);
            self.edited();
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.query.remove(at);
            self.edited();
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Clear the query; pending and in-flight suggestions are dropped
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.highlight = None;
        self.fetcher.clear();
    }

    // -------------------------------------------------------------------------
    // Panel
    // -------------------------------------------------------------------------

    /// Reopen the panel when the input gains focus
    pub fn focus(&mut self) {
        self.open = true;
    }

    /// Close the panel, leaving the query as typed
    pub fn close(&mut self) {
        self.open = false;
        self.highlight = None;
    }

    pub fn highlight_next(&mut self) {
        let len = self.selectable_len();
        if len == 0 {
            return;
        }
        self.highlight = Some(match self.highlight {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn highlight_prev(&mut self) {
        self.highlight = match self.highlight {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Suggestions currently shown, empty when the panel is hidden
    pub fn visible_suggestions(&self) -> &[Movie] {
        if self.panel_visible() && !self.fetcher.is_loading() {
            self.fetcher.suggestions()
        } else {
            &[]
        }
    }

    /// Suggestions the user can actually see, bounded by the drawn rows
    fn selectable_len(&self) -> usize {
        let len = self.visible_suggestions().len();
        self.rows_shown.map_or(len, |rows| rows.min(len))
    }

    /// Pick a suggestion: closes the panel and clears the query
    pub fn select(&mut self, index: usize) -> Option<Movie> {
        let movie = self.visible_suggestions().get(index).cloned()?;
        self.clear();
        self.close();
        Some(movie)
    }

    /// Submit the query as typed. Closes the panel; the text stays.
    pub fn submit(&mut self) -> Option<String> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.close();
        Some(query)
    }

    /// Enter: the highlighted suggestion if any, otherwise submit
    pub fn enter(&mut self) -> Option<SearchAction> {
        if let Some(idx) = self.highlight {
            if let Some(movie) = self.select(idx) {
                return Some(SearchAction::Select(movie));
            }
        }
        self.submit().map(SearchAction::Submit)
    }

    /// Apply finished suggestion fetches. Returns true if anything changed.
    pub fn drain(&mut self) -> bool {
        let changed = self.fetcher.drain();
        if changed {
            self.drop_unreachable_highlight();
        }
        changed
    }

    fn drop_unreachable_highlight(&mut self) {
        let len = self.selectable_len();
        if self.highlight.is_some_and(|i| i >= len) {
            self.highlight = None;
        }
    }

    /// Wait for the next fetch update (used where no event loop runs)
    pub async fn next_update(&mut self) -> bool {
        self.fetcher.next_update().await
    }

    // -------------------------------------------------------------------------
    // Hit testing
    // -------------------------------------------------------------------------

    /// Record where the input and panel were drawn this frame.
    /// `panel` is the bordered list block; rows start one line in. A panel
    /// clipped by the screen edge shows fewer rows than there are
    /// suggestions, and only those rows can be clicked or highlighted.
    pub fn set_bounds(&mut self, input: Rect, panel: Rect) {
        self.input_area = input;
        self.panel_area = panel;
        self.rows_shown = if panel.height == 0 {
            None
        } else {
            Some(panel.height.saturating_sub(2) as usize)
        };
        self.drop_unreachable_highlight();
    }

    pub fn hit_test(&self, column: u16, row: u16) -> ClickTarget {
        let pos = Position::new(column, row);
        if self.input_area.contains(pos) {
            return ClickTarget::Input;
        }
        if self.panel_visible() && self.panel_area.contains(pos) {
            let first_row = self.panel_area.y.saturating_add(1);
            if row >= first_row {
                let idx = (row - first_row) as usize;
                if idx < self.selectable_len() {
                    return ClickTarget::Suggestion(idx);
                }
            }
            return ClickTarget::Input;
        }
        ClickTarget::Outside
    }
}
