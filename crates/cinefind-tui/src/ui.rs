//! TUI rendering logic for the movie browser.

use cinefind_api::omdb::{MovieDetails, MovieSummary};
use cinefind_store::KeyValueStore;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::state::{
    AppState, DetailsStatus, DetailsView, InputMode, Mode, NoticeKind, SEARCH_FAILED_MESSAGE,
    SUGGESTIONS, SearchFailure,
};

/// Formats a number with thousands separators (e.g. 169940 -> "169,940").
#[allow(clippy::arithmetic_side_effects)]
fn fmt_num(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw<S: KeyValueStore>(frame: &mut Frame, state: &AppState<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // main content
            Constraint::Length(4), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_main(frame, chunks[1], state);
    draw_footer(frame, chunks[2], state);

    if let Some(view) = state.details_view() {
        let area = frame.area();
        draw_details(frame, area, view, state.is_favorite(&view.movie.imdb_id));
    }
}

/// Draws the search input and the favorites badge.
#[allow(clippy::indexing_slicing)]
fn draw_header<S: KeyValueStore>(frame: &mut Frame, area: Rect, state: &AppState<S>) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let input_style = if state.input_mode == InputMode::Query {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(state.input.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(input, header_chunks[0]);

    let badge_style = if state.is_favorites_view() {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let badge = Paragraph::new(format!("\u{2665} Favorites {}", state.favorites_count()))
        .style(badge_style)
        .block(Block::default().borders(Borders::ALL).title(" cinefind "));
    frame.render_widget(badge, header_chunks[1]);
}

/// Draws the result list or the placeholder for the current mode.
fn draw_main<S: KeyValueStore>(frame: &mut Frame, area: Rect, state: &AppState<S>) {
    let title = if state.is_favorites_view() {
        String::from(" Your Favorites ")
    } else if state.total_results() > 0 {
        format!(" Search Results ({} results) ", fmt_num(state.total_results()))
    } else {
        String::from(" Search Results ")
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let placeholder = match state.mode() {
        Mode::Idle => Some(suggestion_lines()),
        Mode::Loading => Some(vec![Line::from("Searching...")]),
        Mode::Error if state.search_failure() == Some(SearchFailure::Transport) => Some(vec![
            Line::from(Span::styled(
                "Search failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(SEARCH_FAILED_MESSAGE),
            Line::from("Press r to retry."),
        ]),
        Mode::Empty | Mode::Error => Some(vec![
            Line::from(Span::styled(
                "No movies found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Try searching with different keywords or check your spelling."),
        ]),
        Mode::Favorites if state.visible_movies().is_empty() => Some(vec![Line::from(
            "No favorites yet. Start adding movies to your collection!",
        )]),
        Mode::Favorites | Mode::Results => None,
    };

    if let Some(lines) = placeholder {
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let items: Vec<ListItem> = state
        .visible_movies()
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            movie_item(
                movie,
                i == state.cursor(),
                state.is_favorite(&movie.imdb_id),
            )
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// One row of the result list.
fn movie_item(movie: &MovieSummary, selected: bool, favorite: bool) -> ListItem<'_> {
    let marker = if selected { "\u{25b8} " } else { "  " };
    let heart = if favorite { "\u{2665} " } else { "  " };

    let style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    ListItem::new(Line::from(vec![
        Span::raw(marker),
        Span::styled(heart, Style::default().fg(Color::Magenta)),
        Span::styled(format!("{} ({})", movie.title, movie.year), style),
        Span::styled(
            format!("  {}", movie.media_type),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

/// Suggestion line shown before the first search.
fn suggestion_lines() -> Vec<Line<'static>> {
    let mut spans = vec![Span::raw("Try searching for: ")];
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        spans.push(Span::styled(
            format!("[{}] {suggestion}  ", i.saturating_add(1)),
            Style::default().fg(Color::Cyan),
        ));
    }
    vec![
        Line::from("Search through millions of movies and manage your personal favorites."),
        Line::default(),
        Line::from(spans),
    ]
}

/// Draws pagination, the latest notice and key hints.
#[allow(clippy::indexing_slicing)]
fn draw_footer<S: KeyValueStore>(frame: &mut Frame, area: Rect, state: &AppState<S>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let mut status: Vec<Span> = Vec::new();
    if state.show_pagination() {
        status.push(Span::styled(
            format!(
                "\u{25c0} h  Page {} / {}  l \u{25b6}   ",
                state.page(),
                state.total_pages()
            ),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(notice) = state.notice() {
        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        status.push(Span::styled(
            format!("{}: {}", notice.title, notice.message),
            Style::default().fg(color),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(status)).block(Block::default().borders(Borders::TOP)),
        rows[0],
    );

    let help_text = if state.input_mode == InputMode::Query {
        "Type a title | Enter: search | Esc: cancel"
    } else if state.details_view().is_some() {
        "Esc: close  f: favorite  o: open IMDb  q: quit"
    } else {
        concat!(
            "/: search  \u{2191}\u{2193}/j/k: move  Enter: details  f: favorite  ",
            "F: favorites  h/l: page  r: retry  o: IMDb  q: quit"
        )
    };
    frame.render_widget(Paragraph::new(help_text), rows[1]);
}

/// Labelled detail fields that carry data. Fields OMDb reported as absent are omitted.
pub fn detail_fields(details: &MovieDetails) -> Vec<(&'static str, String)> {
    let mut fields: Vec<(&'static str, String)> = Vec::new();

    if let Some(rating) = details.rating() {
        let votes = details
            .votes()
            .map_or_else(String::new, |v| format!(" ({} votes)", fmt_num(v)));
        fields.push(("Rating", format!("{rating:.1}/10{votes}")));
    }

    let text_fields = [
        ("Runtime", &details.runtime),
        ("Rated", &details.rated),
        ("Released", &details.released),
    ];
    for (label, value) in text_fields {
        if let Some(v) = value {
            fields.push((label, v.clone()));
        }
    }

    let genres = details.genres();
    if !genres.is_empty() {
        fields.push(("Genre", genres.join(" \u{b7} ")));
    }

    let text_fields = [
        ("Plot", &details.plot),
        ("Director", &details.director),
        ("Writer", &details.writer),
        ("Cast", &details.actors),
        ("Language", &details.language),
        ("Country", &details.country),
        ("Awards", &details.awards),
        ("Box Office", &details.box_office),
    ];
    for (label, value) in text_fields {
        if let Some(v) = value {
            fields.push((label, v.clone()));
        }
    }

    fields
}

/// Text of the details overlay.
pub fn detail_lines(view: &DetailsView, favorite: bool) -> Vec<Line<'static>> {
    let heart = if favorite { " \u{2665}" } else { "" };
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} ({}){heart}", view.movie.title, view.movie.year),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    match &view.status {
        DetailsStatus::Loading => lines.push(Line::from("Loading details...")),
        DetailsStatus::Failed(message) => lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))),
        DetailsStatus::Loaded(details) => {
            for (label, value) in detail_fields(details) {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{label}: "),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value),
                ]));
            }
        }
    }

    lines
}

/// Draws the details overlay centered over `area`.
fn draw_details(frame: &mut Frame, area: Rect, view: &DetailsView, favorite: bool) {
    let popup = centered_rect(80, 80, area);
    let paragraph = Paragraph::new(detail_lines(view, favorite))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", view.movie.imdb_id)),
        );

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

/// Rectangle of `percent_x` by `percent_y` centered in `area`.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
