//! Terminal UI for cinefind.
//!
//! Uses `ratatui` + `crossterm` for rendering. All state transitions live in
//! [`state::AppState`]; the event loop only performs the network calls the
//! state asks for and feeds the answers back.

mod browser;
/// Search, pagination, favorites and details state.
pub mod state;
mod ui;

pub use browser::run_browser;
pub use ui::detail_fields;
