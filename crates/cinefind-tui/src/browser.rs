//! Movie browser TUI main loop.
#![allow(clippy::future_not_send)]

use std::io;

use anyhow::{Context, Result};
use cinefind_api::omdb::LocalOmdbApi;
use cinefind_store::KeyValueStore;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{AppState, DetailsRequest, InputMode, Mode, SearchRequest};
use super::ui;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    /// Nothing beyond the state change already made.
    None,
    /// Leave the browser.
    Quit,
    /// Run a search.
    Search(SearchRequest),
    /// Run a details lookup.
    Details(DetailsRequest),
    /// Open a URL in the system browser.
    OpenUrl(String),
}

impl From<Option<SearchRequest>> for Action {
    fn from(request: Option<SearchRequest>) -> Self {
        request.map_or(Self::None, Self::Search)
    }
}

/// Runs the movie browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A: LocalOmdbApi, S: KeyValueStore>(
    api: &A,
    state: &mut AppState<S>,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, api, state).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A: LocalOmdbApi, S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: &A,
    state: &mut AppState<S>,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let action = handle_key(state, key.code, key.modifiers);
            if action == Action::Quit {
                return Ok(());
            }

            // Show the loading state before blocking on the request.
            terminal
                .draw(|frame| ui::draw(frame, state))
                .context("failed to draw TUI")?;
            perform(api, state, action).await;
        }
    }
}

/// Runs the side effect an action asks for and feeds the outcome back.
async fn perform<A: LocalOmdbApi, S: KeyValueStore>(
    api: &A,
    state: &mut AppState<S>,
    action: Action,
) {
    match action {
        Action::None | Action::Quit => {}
        Action::Search(request) => {
            let outcome = api.search_movies(&request.params()).await;
            state.finish_search(request, outcome);
        }
        Action::Details(request) => {
            let outcome = api.movie_details(&request.imdb_id).await;
            state.finish_details(&request, outcome);
        }
        Action::OpenUrl(url) => {
            if let Err(e) = open::that(&url) {
                tracing::warn!(%url, error = %e, "Failed to open browser");
            }
        }
    }
}

/// Dispatches a key press according to the input mode and overlay.
fn handle_key<S: KeyValueStore>(
    state: &mut AppState<S>,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> Action {
    if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if state.input_mode == InputMode::Query {
        return handle_query_input(state, key);
    }
    if state.details_view().is_some() {
        return handle_details_input(state, key);
    }
    handle_normal_input(state, key)
}

/// Handles key input while typing a query.
fn handle_query_input<S: KeyValueStore>(state: &mut AppState<S>, key: KeyCode) -> Action {
    match key {
        KeyCode::Esc => state.cancel_input(),
        KeyCode::Enter => return state.submit_input().into(),
        KeyCode::Backspace => state.input_pop(),
        KeyCode::Char(c) => state.input_push(c),
        _ => {}
    }
    Action::None
}

/// Handles key input while the details overlay is open.
fn handle_details_input<S: KeyValueStore>(state: &mut AppState<S>, key: KeyCode) -> Action {
    match key {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Esc | KeyCode::Backspace => state.close_details(),
        KeyCode::Char('f') => state.toggle_details_favorite(),
        KeyCode::Char('o') => {
            if let Some(view) = state.details_view() {
                return Action::OpenUrl(view.movie.imdb_url());
            }
        }
        _ => {}
    }
    Action::None
}

/// Handles key input in normal mode.
fn handle_normal_input<S: KeyValueStore>(state: &mut AppState<S>, key: KeyCode) -> Action {
    match key {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('/') => state.begin_input(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Right | KeyCode::Char('l') => return state.next_page().into(),
        KeyCode::Left | KeyCode::Char('h') => return state.prev_page().into(),
        KeyCode::Char('r') => return state.retry().into(),
        KeyCode::Enter => {
            if let Some(request) = state.open_selected_details() {
                return Action::Details(request);
            }
        }
        KeyCode::Char('f') => state.toggle_selected_favorite(),
        KeyCode::Char('F') => state.show_favorites(),
        KeyCode::Char('o') => {
            if let Some(movie) = state.selected_movie() {
                return Action::OpenUrl(movie.imdb_url());
            }
        }
        KeyCode::Esc => state.dismiss_notice(),
        KeyCode::Char(c @ '1'..='5') if state.mode() == Mode::Idle => {
            let index = c.to_digit(10).and_then(|d| usize::try_from(d).ok());
            if let Some(index) = index {
                return state.search_suggestion(index.saturating_sub(1)).into();
            }
        }
        _ => {}
    }
    Action::None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::panic)]

    use cinefind_api::omdb::OmdbClient;
    use cinefind_store::{FavoritesStore, MemoryKvStore};
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::state::{DetailsStatus, NoticeKind};

    fn make_state() -> AppState<MemoryKvStore> {
        AppState::new(FavoritesStore::load(MemoryKvStore::new()))
    }

    fn press(state: &mut AppState<MemoryKvStore>, key: KeyCode) -> Action {
        handle_key(state, key, KeyModifiers::NONE)
    }

    fn type_query(state: &mut AppState<MemoryKvStore>, text: &str) -> Action {
        press(state, KeyCode::Char('/'));
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
        press(state, KeyCode::Enter)
    }

    fn test_client(server: &MockServer) -> OmdbClient {
        OmdbClient::builder()
            .base_url(url::Url::parse(&server.uri()).unwrap())
            .api_key("test-key")
            .user_agent("cinefind-test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_quit_keys() {
        // Arrange
        let mut state = make_state();

        // Act & Assert
        assert_eq!(press(&mut state, KeyCode::Char('q')), Action::Quit);
        assert_eq!(
            handle_key(&mut state, KeyCode::Char('c'), KeyModifiers::CONTROL),
            Action::Quit
        );
    }

    #[test]
    fn test_typing_q_in_query_mode_does_not_quit() {
        // Arrange
        let mut state = make_state();
        press(&mut state, KeyCode::Char('/'));

        // Act
        let action = press(&mut state, KeyCode::Char('q'));

        // Assert
        assert_eq!(action, Action::None);
        assert_eq!(state.input, "q");
    }

    #[test]
    fn test_submit_query_returns_search() {
        // Arrange
        let mut state = make_state();

        // Act
        let action = type_query(&mut state, "batman");

        // Assert
        let Action::Search(request) = action else {
            panic!("expected search action, got {action:?}");
        };
        assert_eq!(request.query, "batman");
        assert_eq!(request.page, 1);
        assert_eq!(state.mode(), Mode::Loading);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_escape_cancels_query_input() {
        // Arrange
        let mut state = make_state();
        press(&mut state, KeyCode::Char('/'));
        press(&mut state, KeyCode::Char('x'));

        // Act
        let action = press(&mut state, KeyCode::Esc);

        // Assert
        assert_eq!(action, Action::None);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.mode(), Mode::Idle);
    }

    #[test]
    fn test_suggestion_digit_only_when_idle() {
        // Arrange
        let mut state = make_state();

        // Act
        let action = press(&mut state, KeyCode::Char('2'));

        // Assert
        let Action::Search(request) = action else {
            panic!("expected search action, got {action:?}");
        };
        assert_eq!(request.query, "The Matrix");

        // Once loading, digits do nothing.
        assert_eq!(press(&mut state, KeyCode::Char('3')), Action::None);
    }

    #[test]
    fn test_paging_keys_without_results_do_nothing() {
        // Arrange
        let mut state = make_state();

        // Act & Assert
        assert_eq!(press(&mut state, KeyCode::Char('l')), Action::None);
        assert_eq!(press(&mut state, KeyCode::Char('h')), Action::None);
        assert_eq!(press(&mut state, KeyCode::Char('r')), Action::None);
    }

    #[test]
    fn test_show_favorites_key() {
        // Arrange
        let mut state = make_state();

        // Act
        let action = press(&mut state, KeyCode::Char('F'));

        // Assert
        assert_eq!(action, Action::None);
        assert_eq!(state.mode(), Mode::Favorites);
        assert_eq!(press(&mut state, KeyCode::Enter), Action::None);
    }

    #[tokio::test]
    async fn test_search_then_details_flow() {
        // Arrange
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("s", "batman"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/omdb/search_batman.json"
            )))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("i", "tt0372784"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/omdb/details_tt0133093.json"
            )))
            .mount(&mock_server)
            .await;
        let client = test_client(&mock_server);
        let mut state = make_state();

        // Act
        let action = type_query(&mut state, "batman");
        perform(&client, &mut state, action).await;
        let action = press(&mut state, KeyCode::Enter);
        perform(&client, &mut state, action).await;

        // Assert
        assert_eq!(state.mode(), Mode::Results);
        assert_eq!(state.total_pages(), 12);
        assert!(state.show_pagination());
        let notice = state.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.message, "Found 120 results for \"batman\"");

        let view = state.details_view().unwrap();
        assert_eq!(view.movie.imdb_id, "tt0372784");
        assert!(matches!(view.status, DetailsStatus::Loaded(_)));
    }

    #[tokio::test]
    async fn test_favorite_from_details_overlay() {
        // Arrange
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/omdb/search_batman.json"
            )))
            .mount(&mock_server)
            .await;
        let client = test_client(&mock_server);
        let mut state = make_state();
        let action = type_query(&mut state, "batman");
        perform(&client, &mut state, action).await;
        press(&mut state, KeyCode::Down);

        // Details lookup is not performed; the overlay stays in Loading.
        let _ = press(&mut state, KeyCode::Enter);

        // Act
        press(&mut state, KeyCode::Char('f'));
        let open = press(&mut state, KeyCode::Char('o'));
        press(&mut state, KeyCode::Esc);

        // Assert
        let second = state.visible_movies()[1].clone();
        assert!(state.is_favorite(&second.imdb_id));
        assert_eq!(open, Action::OpenUrl(second.imdb_url()));
        assert!(state.details_view().is_none());
        assert_eq!(state.mode(), Mode::Results);
    }

    #[tokio::test]
    async fn test_transport_failure_then_retry() {
        // Arrange
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/omdb/search_batman.json"
            )))
            .mount(&mock_server)
            .await;
        let client = test_client(&mock_server);
        let mut state = make_state();

        // Act
        let action = type_query(&mut state, "batman");
        perform(&client, &mut state, action).await;
        let failed_mode = state.mode();
        let action = press(&mut state, KeyCode::Char('r'));
        perform(&client, &mut state, action).await;

        // Assert
        assert_eq!(failed_mode, Mode::Error);
        assert_eq!(state.mode(), Mode::Results);
        assert_eq!(state.query(), "batman");
    }
}
