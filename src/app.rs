//! App state and core application logic
//!
//! Owns the view components, the navigation stack and input routing.
//! Components fetch in the background; `drain` applies their results.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::info;

use crate::api::MovieSource;
use crate::config::Config;
use crate::models::{Movie, SearchType};
use crate::state::{
    BrowseMode, ClickTarget, DetailState, PageMeta, ResultBrowser, SearchAction, SearchBox,
    SuggestionFetcher,
};

// =============================================================================
// Routes
// =============================================================================

/// Where the app is. Each route carries what is needed to re-enter it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Search box with trending movies below
    #[default]
    Home,
    /// Full search results
    Search {
        query: String,
        search_type: SearchType,
    },
    /// Trending list
    Trending,
    /// Detail view for one movie
    Movie(u64),
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Current route
    pub route: Route,
    /// Navigation history stack
    pub nav_stack: Vec<Route>,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    pub config: Config,

    pub search_box: SearchBox,
    /// Trending feed on the home view
    pub home: ResultBrowser,
    /// Search and trending results
    pub browser: ResultBrowser,
    pub detail: DetailState,
}

impl App {
    pub fn new(source: Arc<dyn MovieSource>, config: Config) -> Self {
        let fetcher = SuggestionFetcher::with_delay(source.clone(), config.debounce());
        Self {
            route: Route::Home,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,
            search_box: SearchBox::new(fetcher),
            home: ResultBrowser::new(source.clone()),
            browser: ResultBrowser::new(source.clone()),
            detail: DetailState::new(source),
            config,
        }
    }

    /// Kick off the initial home feed
    pub fn start(&mut self) {
        self.home
            .set_context(BrowseMode::Trending(self.config.trending_window()));
    }

    /// Navigate to a new route, pushing current to stack
    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            info!(from = ?self.route, to = ?route, "navigate");
            let prev = std::mem::replace(&mut self.route, route);
            self.nav_stack.push(prev);
        }
        self.input_mode = InputMode::Normal;
        self.enter();
    }

    /// Go back to previous route
    pub fn back(&mut self) -> bool {
        if self.input_mode == InputMode::Editing {
            self.leave_editing();
            return true;
        }

        match self.nav_stack.pop() {
            Some(prev) => {
                info!(to = ?prev, "back");
                self.route = prev;
                self.enter();
                true
            }
            None => false,
        }
    }

    /// Load whatever the current route shows
    fn enter(&mut self) {
        match self.route.clone() {
            Route::Home => {
                if self.home.error().is_some() {
                    self.home.retry();
                }
            }
            Route::Search { query, search_type } => {
                self.browser
                    .set_context(BrowseMode::Search { query, search_type });
            }
            Route::Trending => {
                self.browser
                    .set_context(BrowseMode::Trending(self.config.trending_window()));
            }
            Route::Movie(id) => {
                if self.detail.movie_id() != Some(id) || self.detail.detail_error().is_some() {
                    self.detail.load(id, self.config.recommendation_limit());
                }
            }
        }
    }

    pub fn open_movie(&mut self, movie: &Movie) {
        self.navigate(Route::Movie(movie.id));
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        self.input_mode = InputMode::Editing;
        self.search_box.focus();
    }

    fn leave_editing(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_box.close();
    }

    /// Search type to use for a new submission
    fn current_search_type(&self) -> SearchType {
        match &self.route {
            Route::Search { search_type, .. } => *search_type,
            _ => SearchType::Movie,
        }
    }

    /// Window title for the current route
    pub fn page_meta(&self) -> PageMeta {
        match self.route {
            Route::Movie(_) => self.detail.page_meta(),
            _ => PageMeta::default(),
        }
    }

    /// Apply every finished background fetch. Returns true if a redraw is due.
    pub fn drain(&mut self) -> bool {
        let mut changed = self.search_box.drain();
        changed |= self.home.drain();
        changed |= self.browser.drain();
        changed |= self.detail.drain();
        changed
    }

    /// Movie under the cursor in the current view
    pub fn selected_movie(&self) -> Option<&Movie> {
        match self.route {
            Route::Home => self.home.selected(),
            Route::Search { .. } | Route::Trending => self.browser.selected(),
            Route::Movie(_) => self.detail.selected_recommendation(),
        }
    }

    fn apply_search_action(&mut self, action: SearchAction) {
        match action {
            SearchAction::Select(movie) => self.open_movie(&movie),
            SearchAction::Submit(query) => {
                let search_type = self.current_search_type();
                self.navigate(Route::Search { query, search_type });
            }
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.leave_editing();
                true
            }
            KeyCode::Enter => {
                if let Some(action) = self.search_box.enter() {
                    self.apply_search_action(action);
                }
                true
            }
            KeyCode::Up => {
                self.search_box.highlight_prev();
                true
            }
            KeyCode::Down => {
                self.search_box.highlight_next();
                true
            }
            KeyCode::Char(c) => {
                self.search_box.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.search_box.backspace();
                true
            }
            KeyCode::Delete => {
                self.search_box.delete();
                true
            }
            KeyCode::Left => {
                self.search_box.cursor_left();
                true
            }
            KeyCode::Right => {
                self.search_box.cursor_right();
                true
            }
            KeyCode::Home => {
                self.search_box.cursor_home();
                true
            }
            KeyCode::End => {
                self.search_box.cursor_end();
                true
            }
            _ => false,
        }
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.focus_search();
                return true;
            }
            KeyCode::Char('t') => {
                self.navigate(Route::Trending);
                return true;
            }
            KeyCode::Char('h') => {
                self.navigate(Route::Home);
                return true;
            }
            KeyCode::Esc => {
                return self.back();
            }
            KeyCode::Char('r') => {
                self.retry();
                return true;
            }
            KeyCode::Enter => {
                if let Some(movie) = self.selected_movie().cloned() {
                    self.open_movie(&movie);
                }
                return true;
            }
            _ => {}
        }

        match self.route {
            Route::Search { .. } => self.handle_search_key(key),
            _ => self.handle_list_key(key),
        }
    }

    /// Up/down within whichever list the current route shows
    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        let list = match self.route {
            Route::Home => &mut self.home.list,
            Route::Search { .. } | Route::Trending => &mut self.browser.list,
            Route::Movie(_) => &mut self.detail.list,
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => list.up(),
            KeyCode::Down | KeyCode::Char('j') => list.down(),
            KeyCode::Home => list.first(),
            KeyCode::End => list.last(),
            _ => return false,
        }
        true
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Right | KeyCode::Char('n') => {
                self.browser.next();
                true
            }
            KeyCode::Left | KeyCode::Char('p') => {
                self.browser.previous();
                true
            }
            KeyCode::Char('P') => {
                self.toggle_search_type();
                true
            }
            _ => self.handle_list_key(key),
        }
    }

    /// Switch between movie and person search, replacing the current route
    fn toggle_search_type(&mut self) {
        if let Route::Search { query, search_type } = &self.route {
            let toggled = Route::Search {
                query: query.clone(),
                search_type: search_type.toggled(),
            };
            self.route = toggled;
            self.browser.toggle_search_type();
        }
    }

    fn retry(&mut self) {
        match self.route {
            Route::Home => {
                self.home.retry();
            }
            Route::Search { .. } | Route::Trending => {
                self.browser.retry();
            }
            Route::Movie(_) => self.detail.retry(self.config.recommendation_limit()),
        }
    }

    // -------------------------------------------------------------------------
    // Mouse Event Handling
    // -------------------------------------------------------------------------

    /// Handle a mouse event, returns true if it changed anything
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }

        match self.search_box.hit_test(mouse.column, mouse.row) {
            ClickTarget::Suggestion(idx) => {
                if let Some(movie) = self.search_box.select(idx) {
                    self.open_movie(&movie);
                }
                true
            }
            ClickTarget::Input => {
                self.focus_search();
                true
            }
            ClickTarget::Outside => {
                if self.input_mode == InputMode::Editing || self.search_box.is_open() {
                    self.leave_editing();
                    true
                } else {
                    false
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fake::FakeSource;
    use ratatui::layout::Rect;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn app() -> (Arc<FakeSource>, App) {
        let source = Arc::new(FakeSource::with_pages(3));
        let app = App::new(source.clone(), Config::default());
        (source, app)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_app_navigation() {
        let (_, mut app) = app();
        assert_eq!(app.route, Route::Home);

        app.navigate(Route::Trending);
        app.navigate(Route::Movie(550));
        assert_eq!(app.nav_stack.len(), 2);

        assert!(app.back());
        assert_eq!(app.route, Route::Trending);

        assert!(app.back());
        assert_eq!(app.route, Route::Home);

        // Can't go back from home
        assert!(!app.back());
    }

    #[tokio::test]
    async fn test_app_navigate_same_route() {
        let (_, mut app) = app();
        app.navigate(Route::Trending);
        app.navigate(Route::Trending);
        assert_eq!(app.nav_stack.len(), 1);
    }

    #[tokio::test]
    async fn test_home_enter_opens_detail() {
        let (source, mut app) = app();
        app.start();
        app.home.next_update().await;
        assert_eq!(app.home.results().len(), 2);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.route, Route::Movie(155));

        app.detail.next_update().await;
        app.detail.next_update().await;
        assert_eq!(source.detail_calls(), vec![155]);
        assert_eq!(app.page_meta().title, "Movie 155 - MovieMind");

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.route, Route::Home);
        assert_eq!(app.page_meta().title, "MovieMind");
    }

    // -------------------------------------------------------------------------
    // Keys
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_app_quit_key() {
        let (_, mut app) = app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_app_quit_ctrl_c() {
        let (_, mut app) = app();
        app.focus_search();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_app_editing_mode() {
        let (_, mut app) = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);

        // 'q' is text while editing
        type_str(&mut app, "quest");
        assert_eq!(app.search_box.query(), "quest");
        assert!(app.running);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.search_box.is_open());
        assert_eq!(app.search_box.query(), "quest");
    }

    #[tokio::test]
    async fn test_submit_navigates_to_search() {
        let (source, mut app) = app();
        app.focus_search();
        type_str(&mut app, "heat");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(
            app.route,
            Route::Search {
                query: "heat".into(),
                search_type: SearchType::Movie
            }
        );
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.search_box.is_open());

        app.browser.next_update().await;
        assert_eq!(source.search_calls(), vec![("heat".to_string(), 1)]);

        app.handle_key(key(KeyCode::Char('n')));
        app.browser.next_update().await;
        assert_eq!(app.browser.page(), 2);

        app.handle_key(key(KeyCode::Char('P')));
        assert_eq!(app.browser.page(), 1);
        assert_eq!(
            app.route,
            Route::Search {
                query: "heat".into(),
                search_type: SearchType::Person
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_suggestion_opens_detail() {
        let (source, mut app) = app();
        app.focus_search();
        type_str(&mut app, "bat");

        tokio::time::sleep(Duration::from_millis(400)).await;
        app.drain();
        assert_eq!(source.autocomplete_calls(), vec!["bat".to_string()]);
        assert_eq!(app.search_box.visible_suggestions().len(), 1);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.route, Route::Movie(3));
        assert_eq!(app.search_box.query(), "");
        assert!(!app.search_box.is_open());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    // -------------------------------------------------------------------------
    // Mouse
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_click_suggestion_and_outside() {
        let (_, mut app) = app();
        app.focus_search();
        type_str(&mut app, "alien");
        tokio::time::sleep(Duration::from_millis(400)).await;
        app.drain();
        app.search_box
            .set_bounds(Rect::new(0, 0, 60, 3), Rect::new(0, 3, 60, 3));

        // Outside closes without touching the query
        assert!(app.handle_mouse(click(70, 20)));
        assert!(!app.search_box.is_open());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.search_box.query(), "alien");

        // Clicking the input reopens
        assert!(app.handle_mouse(click(5, 1)));
        assert!(app.search_box.panel_visible());

        assert!(app.handle_mouse(click(5, 4)));
        assert_eq!(app.route, Route::Movie(5));
        assert_eq!(app.search_box.query(), "");
    }

    #[tokio::test]
    async fn test_click_outside_when_idle_is_ignored() {
        let (_, mut app) = app();
        assert!(!app.handle_mouse(click(10, 10)));
    }
}
