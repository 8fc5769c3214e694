//! View state components
//!
//! Each component owns its request fence and a completion channel. Remote
//! calls run as tokio tasks; the event loop drains the channels between
//! frames, so state is only ever mutated on the UI task.

pub mod detail;
pub mod list;
pub mod pager;
pub mod search_box;
pub mod suggest;
pub mod task;

#[cfg(test)]
pub(crate) mod fake;

pub use detail::{DetailState, PageMeta};
pub use list::ListState;
pub use pager::{BrowseMode, ResultBrowser};
pub use search_box::{ClickTarget, SearchAction, SearchBox};
pub use suggest::{FetchPhase, PanelContent, SuggestionFetcher};
pub use task::{debounce, RequestFence, TaskHandle, Ticket};
