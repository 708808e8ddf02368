//! Movie search and browse orchestration with a terminal UI.
//!
//! The search term is debounced, then resolved to either a title search or
//! the popular-movies listing. Results and a trending strip are rendered with
//! `ratatui` + `crossterm`.

mod browser;
/// Trailing-edge debounce utility.
pub mod debounce;
/// Search-or-discover and trending fetches.
pub mod fetch;
/// Key mapping for the search box and results list.
pub mod input;
/// Browser session state.
pub mod session;
/// Trending strip transform.
pub mod trending;
mod ui;

pub use browser::{TMDB_MOVIE_PAGE_URL, movie_page_url, run_browser};
pub use fetch::{FetchSettings, GENERIC_FETCH_ERROR, MovieQuery, TrendingSettings};
pub use session::{BrowserSession, BrowserSettings, FetchStatus};
pub use trending::{ImageSettings, TrendingEntry};
pub use ui::movie_card;
