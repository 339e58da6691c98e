//! Application state: search, pagination, favorites view and details overlay.
//!
//! The state never performs I/O on the network. Operations that need a
//! request return a token ([`SearchRequest`] / [`DetailsRequest`]); the caller
//! runs the request and hands the outcome back through `finish_*`. Each token
//! carries a generation number, and answers whose generation is no longer
//! current are dropped on arrival.

use anyhow::Result;
use cinefind_api::omdb::{
    DetailsResult, MovieDetails, MovieSummary, OmdbResponse, SearchParams, SearchResult,
};
use cinefind_store::{FavoritesStore, KeyValueStore};

/// Queries offered before the first search.
pub const SUGGESTIONS: [&str; 5] = [
    "Avengers",
    "The Matrix",
    "Inception",
    "Interstellar",
    "The Dark Knight",
];

/// Shown for any search that could not complete.
pub const SEARCH_FAILED_MESSAGE: &str =
    "Search failed. Check the OMDb API key and your network connection.";

/// Shown for a details lookup that failed without vendor text.
pub const DETAILS_FAILED_MESSAGE: &str = "Failed to fetch movie details";

/// Main display mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No search yet and not showing favorites.
    Idle,
    /// A search request is in flight.
    Loading,
    /// Last search returned hits.
    Results,
    /// Last search succeeded with no hits.
    Empty,
    /// Favorites list is displayed.
    Favorites,
    /// Last search failed.
    Error,
}

/// Why the last search ended in [`Mode::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    /// OMDb answered but reported no match.
    NoResults,
    /// The request did not complete.
    Transport,
}

/// Input mode for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Query text input mode.
    Query,
}

/// Banner severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational.
    Success,
    /// Something failed.
    Error,
}

/// Transient banner shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl Notice {
    fn success(title: &str, message: String) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: String::from(title),
            message,
        }
    }

    fn error(title: &str, message: String) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: String::from(title),
            message,
        }
    }
}

/// A search the caller should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed query.
    pub query: String,
    /// 1-based page.
    pub page: u32,
    generation: u64,
}

impl SearchRequest {
    /// OMDb parameters for this request.
    #[must_use]
    pub fn params(&self) -> SearchParams {
        SearchParams::new(self.query.clone()).page(self.page)
    }
}

/// A details lookup the caller should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsRequest {
    /// IMDb ID to look up.
    pub imdb_id: String,
    generation: u64,
}

/// Fetch status of the details overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsStatus {
    /// Lookup in flight.
    Loading,
    /// Lookup finished.
    Loaded(Box<MovieDetails>),
    /// Lookup failed with this message.
    Failed(String),
}

/// The open details overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsView {
    /// Summary the overlay was opened from.
    pub movie: MovieSummary,
    /// Fetch status.
    pub status: DetailsStatus,
}

impl DetailsView {
    /// Loaded details, if any.
    #[must_use]
    pub fn details(&self) -> Option<&MovieDetails> {
        match &self.status {
            DetailsStatus::Loaded(details) => Some(details),
            DetailsStatus::Loading | DetailsStatus::Failed(_) => None,
        }
    }
}

/// State owned by the browser.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct AppState<S> {
    mode: Mode,
    search_failure: Option<SearchFailure>,
    /// Last submitted query. Kept on failure so paging can retry it.
    query: String,
    page: u32,
    total_results: u64,
    total_pages: u32,
    results: Vec<MovieSummary>,
    favorites: FavoritesStore<S>,
    details: Option<DetailsView>,
    notice: Option<Notice>,
    /// Query being typed.
    pub input: String,
    /// Current input mode.
    pub input_mode: InputMode,
    cursor: usize,
    search_generation: u64,
    details_generation: u64,
}

impl<S: KeyValueStore> AppState<S> {
    /// Creates the initial state around a loaded favorites store.
    #[must_use]
    pub const fn new(favorites: FavoritesStore<S>) -> Self {
        Self {
            mode: Mode::Idle,
            search_failure: None,
            query: String::new(),
            page: 1,
            total_results: 0,
            total_pages: 0,
            results: Vec::new(),
            favorites,
            details: None,
            notice: None,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor: 0,
            search_generation: 0,
            details_generation: 0,
        }
    }

    // --- Accessors ---

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Cause of the current `Error` mode, if any.
    #[must_use]
    pub const fn search_failure(&self) -> Option<SearchFailure> {
        match self.mode {
            Mode::Error => self.search_failure,
            Mode::Idle | Mode::Loading | Mode::Results | Mode::Empty | Mode::Favorites => None,
        }
    }

    /// Last submitted query (empty in favorites view).
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total hits reported by the vendor for the last search.
    #[must_use]
    pub const fn total_results(&self) -> u64 {
        self.total_results
    }

    /// Total pages for the last search.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Whether a search is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.mode == Mode::Loading
    }

    /// Whether the favorites list is displayed.
    #[must_use]
    pub fn is_favorites_view(&self) -> bool {
        self.mode == Mode::Favorites
    }

    /// Number of favorites, for the header badge.
    #[must_use]
    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }

    /// Whether a movie is a favorite.
    #[must_use]
    pub fn is_favorite(&self, imdb_id: &str) -> bool {
        self.favorites.contains(imdb_id)
    }

    /// Favorites store.
    #[must_use]
    pub const fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    /// Movies currently listed: favorites in favorites view, search hits otherwise.
    #[must_use]
    pub fn visible_movies(&self) -> &[MovieSummary] {
        if self.is_favorites_view() {
            self.favorites.list()
        } else {
            &self.results
        }
    }

    /// Whether the pagination control should be shown.
    #[must_use]
    pub fn show_pagination(&self) -> bool {
        self.mode == Mode::Results && self.total_pages > 1
    }

    /// Cursor position in the visible list.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Movie under the cursor.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&MovieSummary> {
        self.visible_movies().get(self.cursor)
    }

    /// Open details overlay.
    #[must_use]
    pub const fn details_view(&self) -> Option<&DetailsView> {
        self.details.as_ref()
    }

    /// Latest banner.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Hides the banner.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // --- Search ---

    /// Starts a search.
    ///
    /// Returns `None` (and changes nothing) for a blank query, page 0, or
    /// while another search is in flight.
    pub fn begin_search(&mut self, query: &str, page: u32) -> Option<SearchRequest> {
        let query = query.trim();
        if query.is_empty() || page == 0 || self.is_loading() {
            return None;
        }

        self.search_generation = self.search_generation.wrapping_add(1);
        self.mode = Mode::Loading;
        self.search_failure = None;
        self.notice = None;

        tracing::debug!(query, page, "Search started");
        Some(SearchRequest {
            query: String::from(query),
            page,
            generation: self.search_generation,
        })
    }

    /// Applies the outcome of a search.
    ///
    /// Returns `false` if the request was stale and the outcome was dropped.
    pub fn finish_search(
        &mut self,
        request: SearchRequest,
        outcome: Result<SearchResult>,
    ) -> bool {
        if request.generation != self.search_generation || !self.is_loading() {
            tracing::debug!(
                query = %request.query,
                page = request.page,
                "Dropped stale search result"
            );
            return false;
        }

        self.query = request.query;
        self.page = request.page;
        self.cursor = 0;

        match outcome {
            Ok(OmdbResponse::Success(page)) => {
                self.total_results = page.total_results_count();
                self.total_pages = page.total_pages();
                self.results = page.movies;
                if self.results.is_empty() {
                    self.mode = Mode::Empty;
                } else {
                    self.mode = Mode::Results;
                    if self.page == 1 {
                        self.notice = Some(Notice::success(
                            "Search completed",
                            format!("Found {} results for \"{}\"", self.total_results, self.query),
                        ));
                    }
                }
                tracing::info!(
                    query = %self.query,
                    page = self.page,
                    total_results = self.total_results,
                    total_pages = self.total_pages,
                    "Search completed"
                );
            }
            Ok(OmdbResponse::Failure { error }) => {
                let message = error
                    .unwrap_or_else(|| format!("No movies found for \"{}\"", self.query));
                tracing::info!(query = %self.query, %message, "Search returned no results");
                self.reset_results();
                self.mode = Mode::Error;
                self.search_failure = Some(SearchFailure::NoResults);
                self.notice = Some(Notice::error("No results found", message));
            }
            Err(e) => {
                tracing::error!(query = %self.query, error = format!("{e:#}"), "Search failed");
                self.reset_results();
                self.mode = Mode::Error;
                self.search_failure = Some(SearchFailure::Transport);
                self.notice = Some(Notice::error(
                    "Search failed",
                    String::from(SEARCH_FAILED_MESSAGE),
                ));
            }
        }
        true
    }

    /// Reissues the remembered query for another page.
    ///
    /// Valid from `Results` for a different page within range, and from
    /// `Error` for any page so a failed request can be retried.
    pub fn change_page(&mut self, page: u32) -> Option<SearchRequest> {
        let allowed = match self.mode {
            Mode::Results => page != self.page && (1..=self.total_pages).contains(&page),
            Mode::Error => !self.query.is_empty(),
            Mode::Idle | Mode::Loading | Mode::Empty | Mode::Favorites => false,
        };
        if !allowed {
            return None;
        }

        let query = self.query.clone();
        self.begin_search(&query, page)
    }

    /// Moves to the next page.
    pub fn next_page(&mut self) -> Option<SearchRequest> {
        self.change_page(self.page.saturating_add(1))
    }

    /// Moves to the previous page.
    pub fn prev_page(&mut self) -> Option<SearchRequest> {
        self.change_page(self.page.saturating_sub(1))
    }

    /// Retries the last failed search on the same page.
    pub fn retry(&mut self) -> Option<SearchRequest> {
        if self.mode != Mode::Error {
            return None;
        }
        self.change_page(self.page)
    }

    /// Searches one of the [`SUGGESTIONS`].
    pub fn search_suggestion(&mut self, index: usize) -> Option<SearchRequest> {
        let suggestion = SUGGESTIONS.get(index)?;
        self.input = String::from(*suggestion);
        self.begin_search(suggestion, 1)
    }

    fn reset_results(&mut self) {
        self.results.clear();
        self.total_results = 0;
        self.total_pages = 0;
    }

    // --- Favorites ---

    /// Switches to the favorites list, clearing all search state.
    ///
    /// An in-flight search is abandoned.
    pub fn show_favorites(&mut self) {
        self.search_generation = self.search_generation.wrapping_add(1);
        self.mode = Mode::Favorites;
        self.search_failure = None;
        self.query.clear();
        self.page = 1;
        self.reset_results();
        self.cursor = 0;
    }

    /// Toggles a movie's favorite status. Does not change the mode.
    ///
    /// Returns whether the movie is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites list cannot be persisted.
    pub fn toggle_favorite(&mut self, movie: &MovieSummary) -> Result<bool> {
        let added = self.favorites.toggle(movie)?;
        tracing::info!(imdb_id = %movie.imdb_id, added, "Favorite toggled");
        self.clamp_cursor();
        Ok(added)
    }

    /// Toggles the favorite status of the movie under the cursor.
    ///
    /// Persistence failures become an error banner.
    pub fn toggle_selected_favorite(&mut self) {
        if let Some(movie) = self.selected_movie().cloned() {
            self.toggle_favorite_or_notify(&movie);
        }
    }

    /// Toggles the favorite status of the movie shown in the details overlay.
    pub fn toggle_details_favorite(&mut self) {
        if let Some(movie) = self.details.as_ref().map(|view| view.movie.clone()) {
            self.toggle_favorite_or_notify(&movie);
        }
    }

    fn toggle_favorite_or_notify(&mut self, movie: &MovieSummary) {
        if let Err(e) = self.toggle_favorite(movie) {
            tracing::error!(error = format!("{e:#}"), "Failed to update favorites");
            self.notice = Some(Notice::error(
                "Favorites",
                String::from("Could not save favorites"),
            ));
        }
    }

    // --- Details ---

    /// Opens the details overlay for a movie.
    pub fn open_details(&mut self, movie: MovieSummary) -> DetailsRequest {
        self.details_generation = self.details_generation.wrapping_add(1);
        let request = DetailsRequest {
            imdb_id: movie.imdb_id.clone(),
            generation: self.details_generation,
        };
        self.details = Some(DetailsView {
            movie,
            status: DetailsStatus::Loading,
        });
        request
    }

    /// Opens the details overlay for the movie under the cursor.
    pub fn open_selected_details(&mut self) -> Option<DetailsRequest> {
        let movie = self.selected_movie()?.clone();
        Some(self.open_details(movie))
    }

    /// Applies the outcome of a details lookup.
    ///
    /// Returns `false` if the overlay was closed or reopened meanwhile and the
    /// outcome was dropped.
    pub fn finish_details(
        &mut self,
        request: &DetailsRequest,
        outcome: Result<DetailsResult>,
    ) -> bool {
        if request.generation != self.details_generation {
            tracing::debug!(imdb_id = %request.imdb_id, "Dropped stale details result");
            return false;
        }
        let Some(view) = self.details.as_mut() else {
            return false;
        };

        view.status = match outcome {
            Ok(OmdbResponse::Success(details)) => DetailsStatus::Loaded(Box::new(details)),
            Ok(OmdbResponse::Failure { error }) => {
                let message = error.unwrap_or_else(|| String::from(DETAILS_FAILED_MESSAGE));
                self.notice = Some(Notice::error("Error", message.clone()));
                DetailsStatus::Failed(message)
            }
            Err(e) => {
                tracing::error!(
                    imdb_id = %request.imdb_id,
                    error = format!("{e:#}"),
                    "Details lookup failed"
                );
                let message = String::from(DETAILS_FAILED_MESSAGE);
                self.notice = Some(Notice::error("Error", message.clone()));
                DetailsStatus::Failed(message)
            }
        };
        true
    }

    /// Closes the details overlay. A lookup still in flight is discarded on arrival.
    pub fn close_details(&mut self) {
        self.details = None;
        self.details_generation = self.details_generation.wrapping_add(1);
    }

    // --- Cursor & input ---

    /// Moves the cursor up.
    pub const fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor down.
    pub fn move_down(&mut self) {
        if self.cursor.saturating_add(1) < self.visible_movies().len() {
            self.cursor = self.cursor.saturating_add(1);
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_movies().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    /// Enters query input mode.
    pub const fn begin_input(&mut self) {
        self.input_mode = InputMode::Query;
    }

    /// Leaves query input mode without searching.
    pub const fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Appends a character to the query being typed.
    pub fn input_push(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Removes the last character of the query being typed.
    pub fn input_pop(&mut self) {
        self.input.pop();
    }

    /// Submits the typed query as a page-1 search.
    ///
    /// Blank input keeps input mode active and starts nothing.
    pub fn submit_input(&mut self) -> Option<SearchRequest> {
        let input = self.input.clone();
        let request = self.begin_search(&input, 1)?;
        self.input_mode = InputMode::Normal;
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use anyhow::anyhow;
    use cinefind_api::omdb::{MediaType, SearchPage};
    use cinefind_store::{FAVORITES_KEY, MemoryKvStore};

    use super::*;

    fn movie(id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            imdb_id: String::from(id),
            title: String::from(title),
            year: String::from("2005"),
            media_type: MediaType::Movie,
            poster: None,
        }
    }

    fn page_of(count: usize, total: &str) -> SearchResult {
        let movies = (0..count)
            .map(|i| movie(&format!("tt{i:07}"), &format!("Movie {i}")))
            .collect();
        OmdbResponse::Success(SearchPage {
            movies,
            total_results: String::from(total),
        })
    }

    fn make_state() -> AppState<MemoryKvStore> {
        AppState::new(FavoritesStore::load(MemoryKvStore::new()))
    }

    fn searched_state(total: &str) -> AppState<MemoryKvStore> {
        let mut state = make_state();
        let request = state.begin_search("Batman", 1).unwrap();
        state.finish_search(request, Ok(page_of(10, total)));
        state
    }

    #[test]
    fn test_initial_state() {
        // Arrange & Act
        let state = make_state();

        // Assert
        assert_eq!(state.mode(), Mode::Idle);
        assert_eq!(state.page(), 1);
        assert_eq!(state.total_pages(), 0);
        assert!(state.visible_movies().is_empty());
        assert!(state.details_view().is_none());
    }

    #[test]
    fn test_search_success_enters_results() {
        // Arrange
        let mut state = make_state();

        // Act
        let request = state.begin_search("Batman", 1).unwrap();
        assert!(state.is_loading());
        let applied = state.finish_search(request, Ok(page_of(10, "120")));

        // Assert
        assert!(applied);
        assert_eq!(state.mode(), Mode::Results);
        assert_eq!(state.total_results(), 120);
        assert_eq!(state.total_pages(), 12);
        assert_eq!(state.query(), "Batman");
        assert!(state.show_pagination());
        let notice = state.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.message, "Found 120 results for \"Batman\"");
    }

    #[test]
    fn test_search_success_notice_only_on_first_page() {
        // Arrange
        let mut state = searched_state("120");
        state.dismiss_notice();

        // Act
        let request = state.change_page(2).unwrap();
        state.finish_search(request, Ok(page_of(10, "120")));

        // Assert
        assert_eq!(state.page(), 2);
        assert!(state.notice().is_none());
    }

    #[test]
    fn test_search_vendor_failure_shows_vendor_text() {
        // Arrange
        let mut state = make_state();
        let request = state.begin_search("zzzxxxqqq", 1).unwrap();

        // Act
        state.finish_search(
            request,
            Ok(OmdbResponse::Failure {
                error: Some(String::from("Movie not found!")),
            }),
        );

        // Assert
        assert_eq!(state.mode(), Mode::Error);
        assert!(state.visible_movies().is_empty());
        assert_eq!(state.total_pages(), 0);
        let notice = state.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Movie not found!");
    }

    #[test]
    fn test_search_vendor_failure_without_text_uses_fallback() {
        // Arrange
        let mut state = make_state();
        let request = state.begin_search("zzz", 1).unwrap();

        // Act
        state.finish_search(request, Ok(OmdbResponse::Failure { error: None }));

        // Assert
        assert_eq!(state.notice().unwrap().message, "No movies found for \"zzz\"");
    }

    #[test]
    fn test_search_transport_failure_uses_generic_message() {
        // Arrange
        let mut state = searched_state("120");
        let request = state.change_page(2).unwrap();

        // Act
        state.finish_search(request, Err(anyhow!("connection refused")));

        // Assert
        assert_eq!(state.mode(), Mode::Error);
        assert_eq!(state.query(), "Batman");
        assert_eq!(state.total_results(), 0);
        assert_eq!(state.notice().unwrap().message, SEARCH_FAILED_MESSAGE);
    }

    #[test]
    fn test_search_failure_kind_tracks_cause() {
        // Arrange
        let mut state = make_state();
        let request = state.begin_search("zzz", 1).unwrap();
        state.finish_search(request, Ok(OmdbResponse::Failure { error: None }));
        let not_found = state.search_failure();

        // Act
        let request = state.begin_search("Batman", 1).unwrap();
        let while_loading = state.search_failure();
        state.finish_search(request, Err(anyhow!("connection refused")));

        // Assert
        assert_eq!(not_found, Some(SearchFailure::NoResults));
        assert_eq!(while_loading, None);
        assert_eq!(state.search_failure(), Some(SearchFailure::Transport));
        state.show_favorites();
        assert_eq!(state.search_failure(), None);
    }

    #[test]
    fn test_search_success_with_no_movies_is_empty() {
        // Arrange
        let mut state = make_state();
        let request = state.begin_search("Batman", 1).unwrap();

        // Act
        state.finish_search(request, Ok(page_of(0, "0")));

        // Assert
        assert_eq!(state.mode(), Mode::Empty);
        assert_eq!(state.total_pages(), 0);
        assert!(!state.show_pagination());
    }

    #[test]
    fn test_blank_query_is_rejected() {
        // Arrange
        let mut state = make_state();

        // Act & Assert
        assert!(state.begin_search("", 1).is_none());
        assert!(state.begin_search("   \t", 1).is_none());
        assert_eq!(state.mode(), Mode::Idle);
    }

    #[test]
    fn test_query_is_trimmed() {
        // Arrange
        let mut state = make_state();

        // Act
        let request = state.begin_search("  Batman  ", 1).unwrap();

        // Assert
        assert_eq!(request.query, "Batman");
        assert_eq!(request.params().query, "Batman");
    }

    #[test]
    fn test_search_rejected_while_loading() {
        // Arrange
        let mut state = make_state();
        state.begin_search("Batman", 1).unwrap();

        // Act & Assert
        assert!(state.begin_search("Superman", 1).is_none());
    }

    #[test]
    fn test_change_page_bounds() {
        // Arrange
        let mut state = searched_state("25");

        // Act & Assert
        assert_eq!(state.total_pages(), 3);
        assert!(state.change_page(0).is_none());
        assert!(state.change_page(1).is_none());
        assert!(state.change_page(4).is_none());
        let request = state.change_page(3).unwrap();
        assert_eq!(request.page, 3);
        assert_eq!(request.query, "Batman");
    }

    #[test]
    fn test_change_page_requires_results() {
        // Arrange
        let mut state = make_state();

        // Act & Assert
        assert!(state.change_page(2).is_none());
        state.show_favorites();
        assert!(state.change_page(2).is_none());
    }

    #[test]
    fn test_retry_after_failed_page() {
        // Arrange
        let mut state = searched_state("120");
        let request = state.next_page().unwrap();
        state.finish_search(request, Err(anyhow!("timeout")));

        // Act
        let retry = state.retry().unwrap();

        // Assert
        assert_eq!(retry.query, "Batman");
        assert_eq!(retry.page, 2);
    }

    #[test]
    fn test_prev_page_from_first_page_is_noop() {
        // Arrange
        let mut state = searched_state("120");

        // Act & Assert
        assert!(state.prev_page().is_none());
    }

    #[test]
    fn test_show_favorites_clears_search_state() {
        // Arrange
        let mut state = searched_state("120");

        // Act
        state.show_favorites();

        // Assert
        assert!(state.is_favorites_view());
        assert_eq!(state.query(), "");
        assert_eq!(state.page(), 1);
        assert_eq!(state.total_results(), 0);
        assert_eq!(state.total_pages(), 0);
        assert!(!state.show_pagination());
    }

    #[test]
    fn test_search_leaves_favorites_view() {
        // Arrange
        let mut state = make_state();
        state.show_favorites();

        // Act
        state.begin_search("Batman", 1).unwrap();

        // Assert
        assert!(!state.is_favorites_view());
        assert!(state.is_loading());
    }

    #[test]
    fn test_show_favorites_drops_in_flight_search() {
        // Arrange
        let mut state = make_state();
        let request = state.begin_search("Batman", 1).unwrap();

        // Act
        state.show_favorites();
        let applied = state.finish_search(request, Ok(page_of(10, "120")));

        // Assert
        assert!(!applied);
        assert!(state.is_favorites_view());
        assert_eq!(state.total_pages(), 0);
    }

    #[test]
    fn test_toggle_favorite_updates_favorites_view() {
        // Arrange
        let mut state = searched_state("120");
        let first = state.visible_movies()[0].clone();
        state.toggle_favorite(&first).unwrap();
        state.show_favorites();
        assert_eq!(state.visible_movies().len(), 1);

        // Act
        let added = state.toggle_favorite(&first).unwrap();

        // Assert
        assert!(!added);
        assert!(state.is_favorites_view());
        assert!(state.visible_movies().is_empty());
        assert_eq!(state.favorites_count(), 0);
    }

    #[test]
    fn test_toggle_favorite_keeps_mode_and_persists() {
        // Arrange
        let mut state = searched_state("120");
        state.move_down();

        // Act
        state.toggle_selected_favorite();

        // Assert
        assert_eq!(state.mode(), Mode::Results);
        assert!(state.is_favorite("tt0000001"));
        let stored = state
            .favorites()
            .backend()
            .get(FAVORITES_KEY)
            .unwrap()
            .unwrap();
        assert!(stored.contains("tt0000001"));
    }

    #[test]
    fn test_details_lifecycle() {
        // Arrange
        let mut state = searched_state("120");
        let request = state.open_selected_details().unwrap();
        assert_eq!(
            state.details_view().unwrap().status,
            DetailsStatus::Loading
        );
        let details_json = r#"{"Response":"True","imdbID":"tt0000000","Title":"Movie 0",
            "Year":"2005","Type":"movie","Plot":"N/A"}"#;

        // Act
        let applied = state.finish_details(&request, DetailsResult::from_json(details_json));

        // Assert
        assert!(applied);
        let details = state.details_view().unwrap().details().unwrap();
        assert_eq!(details.title, "Movie 0");
        assert_eq!(details.plot, None);
    }

    #[test]
    fn test_closed_details_drop_late_result() {
        // Arrange
        let mut state = searched_state("120");
        let request = state.open_selected_details().unwrap();

        // Act
        state.close_details();
        let applied = state.finish_details(&request, Ok(OmdbResponse::Failure { error: None }));

        // Assert
        assert!(!applied);
        assert!(state.details_view().is_none());
        assert!(state.notice().is_some_and(|n| n.kind == NoticeKind::Success));
    }

    #[test]
    fn test_reopened_details_drop_previous_result() {
        // Arrange
        let mut state = searched_state("120");
        let first = state.open_details(movie("tt1", "First"));
        let second = state.open_details(movie("tt2", "Second"));

        // Act
        let first_applied = state.finish_details(&first, Ok(OmdbResponse::Failure { error: None }));

        // Assert
        assert!(!first_applied);
        assert_eq!(state.details_view().unwrap().movie.imdb_id, "tt2");
        assert_eq!(second.imdb_id, "tt2");
    }

    #[test]
    fn test_details_failure_sets_notice() {
        // Arrange
        let mut state = make_state();
        let request = state.open_details(movie("tt404", "Missing"));

        // Act
        state.finish_details(
            &request,
            Ok(OmdbResponse::Failure {
                error: Some(String::from("Incorrect IMDb ID.")),
            }),
        );

        // Assert
        assert_eq!(
            state.details_view().unwrap().status,
            DetailsStatus::Failed(String::from("Incorrect IMDb ID."))
        );
        assert_eq!(state.notice().unwrap().message, "Incorrect IMDb ID.");
    }

    #[test]
    fn test_details_independent_of_mode() {
        // Arrange
        let mut state = make_state();
        state.open_details(movie("tt1", "A"));

        // Act
        state.show_favorites();

        // Assert
        assert!(state.details_view().is_some());
    }

    #[test]
    fn test_cursor_movement_is_bounded() {
        // Arrange
        let mut state = searched_state("120");

        // Act & Assert
        state.move_up();
        assert_eq!(state.cursor(), 0);
        for _ in 0..20 {
            state.move_down();
        }
        assert_eq!(state.cursor(), 9);
    }

    #[test]
    fn test_submit_input() {
        // Arrange
        let mut state = make_state();
        state.begin_input();
        for c in "Inception".chars() {
            state.input_push(c);
        }
        state.input_pop();

        // Act
        let request = state.submit_input().unwrap();

        // Assert
        assert_eq!(request.query, "Inceptio");
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_submit_blank_input_stays_in_input_mode() {
        // Arrange
        let mut state = make_state();
        state.begin_input();
        state.input_push(' ');

        // Act
        let request = state.submit_input();

        // Assert
        assert!(request.is_none());
        assert_eq!(state.input_mode, InputMode::Query);
    }

    #[test]
    fn test_search_suggestion() {
        // Arrange
        let mut state = make_state();

        // Act
        let request = state.search_suggestion(1).unwrap();

        // Assert
        assert_eq!(request.query, "The Matrix");
        assert_eq!(state.input, "The Matrix");
        assert!(state.search_suggestion(99).is_none());
    }

    #[test]
    fn test_toggle_details_favorite() {
        // Arrange
        let mut state = searched_state("120");
        state.move_down();
        let _ = state.open_selected_details().unwrap();

        // Act
        state.toggle_details_favorite();

        // Assert
        assert!(state.is_favorite("tt0000001"));
        assert_eq!(state.favorites_count(), 1);
        assert_eq!(state.mode(), Mode::Results);

        // Act
        state.toggle_details_favorite();

        // Assert
        assert!(!state.is_favorite("tt0000001"));
    }
}
