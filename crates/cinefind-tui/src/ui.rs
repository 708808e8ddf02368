//! TUI rendering logic for the movie browser.

use cinefind_api::tmdb::Movie;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::session::{BrowserSession, FetchStatus, InputMode};
use crate::trending::TrendingEntry;

/// Spinner frames cycled while a request is in flight.
const SPINNER: [&str; 10] = [
    "\u{280b}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283c}", "\u{2834}", "\u{2826}", "\u{2827}",
    "\u{2807}", "\u{280f}",
];

/// Shown when a successful request matched nothing.
const NO_MOVIES: &str = "No movies found.";

/// Shown for absent ratings, years and languages.
const NOT_AVAILABLE: &str = "N/A";

/// Draws the browser UI. `tick` advances the loading spinner.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, session: &BrowserSession, tick: usize) {
    let trending_height = if session.trending().is_empty() { 0 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // header
            Constraint::Length(trending_height), // trending strip
            Constraint::Min(5),                  // results
            Constraint::Length(3),               // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], session);
    if !session.trending().is_empty() {
        draw_trending(frame, chunks[1], session.trending());
    }
    draw_results(frame, chunks[2], session, tick);
    draw_footer(frame, chunks[3], session.input_mode);
}

/// Draws the search box and the application title.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, session: &BrowserSession) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let search_style = if session.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let search_text = if session.search_term().is_empty() && session.input_mode == InputMode::Normal
    {
        Line::from(Span::styled(
            "Search through thousands of movies",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(session.search_term().to_owned())
    };

    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, header_chunks[0]);

    let title = Paragraph::new("Find movies you'll enjoy without the hassle")
        .block(Block::default().borders(Borders::ALL).title(" cinefind "));
    frame.render_widget(title, header_chunks[1]);
}

/// Draws the trending strip as ranked titles on one line.
fn draw_trending(frame: &mut Frame, area: Rect, entries: &[TrendingEntry]) {
    let mut spans = Vec::with_capacity(entries.len().saturating_mul(2));
    for entry in entries {
        spans.push(Span::styled(
            format!("{}. ", entry.rank),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("{}   ", entry.title)));
    }

    let strip = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Trending Movies "),
    );
    frame.render_widget(strip, area);
}

/// Draws the results pane for the current fetch status.
#[allow(clippy::arithmetic_side_effects)]
fn draw_results(frame: &mut Frame, area: Rect, session: &BrowserSession, tick: usize) {
    let term = session.active_term().trim();
    let title = if term.is_empty() {
        String::from(" All Movies ")
    } else {
        format!(" Results: {term} ")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    match session.status() {
        FetchStatus::Idle => frame.render_widget(Paragraph::new("").block(block), area),
        FetchStatus::Loading => {
            let spinner = SPINNER.get(tick % SPINNER.len()).copied().unwrap_or_default();
            let loading = Paragraph::new(format!("{spinner} Loading..."))
                .style(Style::default().fg(Color::Cyan))
                .block(block);
            frame.render_widget(loading, area);
        }
        FetchStatus::Error(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(error, area);
        }
        FetchStatus::Loaded(movies) if movies.is_empty() => {
            frame.render_widget(Paragraph::new(NO_MOVIES).block(block), area);
        }
        FetchStatus::Loaded(movies) => {
            let items: Vec<ListItem> = movies.iter().map(movie_card).collect();
            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
            let mut list_state = ListState::default().with_selected(Some(session.cursor()));
            frame.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

/// Renders one movie as a two-line list item.
///
/// The first line is the title; the second carries rating, original
/// language, release year and the poster path when present.
#[must_use]
pub fn movie_card(movie: &Movie) -> ListItem<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut meta = vec![
        Span::styled("  \u{2605} ", Style::default().fg(Color::Yellow)),
        Span::raw(rating_label(movie.vote_average)),
        Span::styled(" \u{2022} ", dim),
        Span::raw(
            movie
                .original_language
                .clone()
                .unwrap_or_else(|| String::from(NOT_AVAILABLE)),
        ),
        Span::styled(" \u{2022} ", dim),
        Span::raw(year_label(movie)),
    ];
    if let Some(poster) = movie.poster_path.as_deref().filter(|p| !p.is_empty()) {
        meta.push(Span::styled(format!("  {poster}"), dim));
    }

    ListItem::new(vec![
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
    ])
}

/// One-decimal rating, or `N/A` when absent or zero.
fn rating_label(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v > 0.0 => format!("{v:.1}"),
        _ => String::from(NOT_AVAILABLE),
    }
}

/// Release year, or `N/A` when absent or malformed.
fn year_label(movie: &Movie) -> String {
    movie
        .release_year()
        .map_or_else(|| String::from(NOT_AVAILABLE), |y| y.to_string())
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, mode: InputMode) {
    let help_text = match mode {
        InputMode::Editing => Line::from("Type to search | Esc: clear | Enter: done"),
        InputMode::Normal => Line::from(vec![Span::raw(
            "\u{2191}\u{2193}/j/k: move  /: search  o: open  q: quit",
        )]),
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::fetch::GENERIC_FETCH_ERROR;
    use crate::fetch::tests::movie;
    use crate::input::InputEdit;
    use crate::session::BrowserSettings;

    fn render(session: &BrowserSession) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, session, 0)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn loaded_session(movies: Vec<Movie>) -> BrowserSession {
        let mut session = BrowserSession::new(BrowserSettings::default());
        let request = session.begin_search(String::new());
        session.complete_search(request.seq, Ok(movies));
        session
    }

    #[test]
    fn test_rating_label() {
        // Arrange & Act & Assert
        assert_eq!(rating_label(Some(7.3)), "7.3");
        assert_eq!(rating_label(Some(8.0)), "8.0");
        assert_eq!(rating_label(Some(0.0)), "N/A");
        assert_eq!(rating_label(None), "N/A");
    }

    #[test]
    fn test_year_label() {
        // Arrange
        let mut m = movie(1, "x");

        // Act & Assert
        assert_eq!(year_label(&m), "N/A");
        m.release_date = Some(String::from("2005-06-10"));
        assert_eq!(year_label(&m), "2005");
    }

    #[test]
    fn test_draw_loaded_movies() {
        // Arrange
        let mut batman = movie(272, "Batman Begins");
        batman.vote_average = Some(7.7);
        batman.release_date = Some(String::from("2005-06-10"));
        let session = loaded_session(vec![batman, movie(268, "Batman")]);

        // Act
        let text = render(&session);

        // Assert
        assert!(text.contains("All Movies"));
        assert!(text.contains("Batman Begins"));
        assert!(text.contains("7.7"));
        assert!(text.contains("2005"));
        assert!(!text.contains("Trending Movies"));
    }

    #[test]
    fn test_draw_empty_results() {
        // Arrange
        let session = loaded_session(Vec::new());

        // Act
        let text = render(&session);

        // Assert
        assert!(text.contains(NO_MOVIES));
    }

    #[test]
    fn test_draw_error() {
        // Arrange
        let mut session = BrowserSession::new(BrowserSettings::default());
        let request = session.begin_search(String::new());
        session.complete_search(request.seq, Err(anyhow::anyhow!("boom")));

        // Act
        let text = render(&session);

        // Assert
        assert!(text.contains(GENERIC_FETCH_ERROR));
        assert!(!text.contains("boom"));
    }

    #[test]
    fn test_draw_loading_spinner() {
        // Arrange
        let mut session = BrowserSession::new(BrowserSettings::default());
        session.begin_search(String::from("dune"));

        // Act
        let text = render(&session);

        // Assert
        assert!(text.contains("Loading..."));
        assert!(text.contains("Results: dune"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_title_ignores_unsettled_edit() {
        // Arrange
        let mut session = loaded_session(vec![movie(1, "Popular Movie")]);

        // Act
        session.apply_edit(InputEdit::Insert('x'));
        let text = render(&session);

        // Assert
        assert!(text.contains("All Movies"));
        assert!(text.contains("Popular Movie"));
        assert!(!text.contains("Results: x"));
    }

    #[test]
    fn test_draw_trending_strip_when_loaded() {
        // Arrange
        let mut session = loaded_session(Vec::new());
        session.set_trending(vec![TrendingEntry {
            id: 1_184_918,
            title: String::from("The Wild Robot"),
            poster_url: String::from("https://image.tmdb.org/t/p/w200/a.jpg"),
            rank: 1,
        }]);

        // Act
        let text = render(&session);

        // Assert
        assert!(text.contains("Trending Movies"));
        assert!(text.contains("1. The Wild Robot"));
    }
}
