//! Browser session state: search term, debounced fetches and results.

use std::time::Duration;

use anyhow::Result;
use cinefind_api::tmdb::{Movie, TmdbApi, fetch_kind};
use tokio::time::Instant;
use tracing::instrument;

use crate::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use crate::fetch::{
    FetchSettings, GENERIC_FETCH_ERROR, MovieQuery, TrendingSettings, fetch_movies,
};
use crate::input::InputEdit;
use crate::trending::TrendingEntry;

/// Status of the results list.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchStatus {
    /// No request issued yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request failed; holds the user-facing message.
    Error(String),
    /// The latest request succeeded. An empty list means no movies matched.
    Loaded(Vec<Movie>),
}

impl FetchStatus {
    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// User-facing error message, if the latest request failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Loaded movies; empty in every other state.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        match self {
            Self::Loaded(movies) => movies,
            _ => &[],
        }
    }
}

/// Input mode for the TUI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Results navigation.
    #[default]
    Normal,
    /// Typing into the search box.
    Editing,
}

/// Settings injected into a session at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    /// Results requests.
    pub fetch: FetchSettings,
    /// Trending strip.
    pub trending: TrendingSettings,
    /// Settle window of the search term.
    pub debounce: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            trending: TrendingSettings::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// A results request issued by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Sequence number; only the latest one is applied on completion.
    pub seq: u64,
    /// Endpoint and term.
    pub query: MovieQuery,
}

/// State of one browsing session.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserSession {
    /// Current search box contents.
    search_term: String,
    /// Last term that was fetched.
    debounced_term: Option<String>,
    /// Pending search term changes.
    debouncer: Debouncer<String>,
    /// Results list status.
    status: FetchStatus,
    /// Trending strip, empty until loaded or on failure.
    trending: Vec<TrendingEntry>,
    /// Sequence number of the latest issued request.
    latest_seq: u64,
    /// Cursor position in the results list.
    cursor: usize,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Injected settings.
    settings: BrowserSettings,
}

impl BrowserSession {
    /// Creates an idle session with an empty search term.
    #[must_use]
    pub fn new(settings: BrowserSettings) -> Self {
        Self {
            search_term: String::new(),
            debounced_term: None,
            debouncer: Debouncer::new(settings.debounce),
            status: FetchStatus::Idle,
            trending: Vec::new(),
            latest_seq: 0,
            cursor: 0,
            input_mode: InputMode::Normal,
            settings,
        }
    }

    /// Returns the search box contents.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Returns the term of the latest issued request, empty before the
    /// first one.
    #[must_use]
    pub fn active_term(&self) -> &str {
        self.debounced_term.as_deref().unwrap_or_default()
    }

    /// Returns the results list status.
    #[must_use]
    pub const fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Returns the trending strip.
    #[must_use]
    pub fn trending(&self) -> &[TrendingEntry] {
        &self.trending
    }

    /// Returns the cursor position in the results list.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the injected settings.
    #[must_use]
    pub const fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    /// Applies a search box edit and re-arms the debounce timer if the
    /// term changed.
    pub fn apply_edit(&mut self, edit: InputEdit) {
        if edit.apply(&mut self.search_term) {
            self.debouncer.submit(self.search_term.clone());
        }
    }

    /// Replaces the search term and re-arms the debounce timer.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search_term {
            self.search_term = term;
            self.debouncer.submit(self.search_term.clone());
        }
    }

    /// Deadline of the pending search term change.
    #[must_use]
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Issues a request for the settled search term, if any.
    ///
    /// A settled term equal to the last fetched one issues nothing.
    pub fn settle_debounce(&mut self, now: Instant) -> Option<SearchRequest> {
        let term = self.debouncer.take_due(now)?;
        if self.debounced_term.as_deref() == Some(term.as_str()) {
            tracing::debug!("search term settled unchanged, skipping fetch");
            return None;
        }
        Some(self.begin_search(term))
    }

    /// Marks a request for `term` as in flight and returns it.
    ///
    /// Any earlier request still in flight becomes stale.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn begin_search(&mut self, term: String) -> SearchRequest {
        self.latest_seq += 1;
        let query = MovieQuery::from_term(&term);
        self.debounced_term = Some(term);
        self.status = FetchStatus::Loading;
        self.cursor = 0;
        tracing::debug!(seq = self.latest_seq, ?query, "search started");
        SearchRequest {
            seq: self.latest_seq,
            query,
        }
    }

    /// Applies the outcome of request `seq`.
    ///
    /// Returns `false` when the request is stale and was discarded.
    pub fn complete_search(&mut self, seq: u64, result: Result<Vec<Movie>>) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale search result");
            return false;
        }
        self.status = match result {
            Ok(movies) => {
                tracing::debug!(seq, count = movies.len(), "search finished");
                FetchStatus::Loaded(movies)
            }
            Err(err) => {
                let kind = fetch_kind(&err).map_or("other", |k| k.as_str());
                tracing::error!(kind, "Error fetching movies: {err:#}");
                FetchStatus::Error(String::from(GENERIC_FETCH_ERROR))
            }
        };
        self.cursor = 0;
        true
    }

    /// Replaces the trending strip.
    pub fn set_trending(&mut self, entries: Vec<TrendingEntry>) {
        self.trending = entries;
    }

    /// Fetches results for the current search term and applies them.
    ///
    /// Drops any pending search term change.
    #[instrument(skip_all)]
    pub async fn refresh<A>(&mut self, api: &A)
    where
        A: TmdbApi + Sync,
    {
        self.debouncer.cancel();
        let request = self.begin_search(self.search_term.clone());
        let result = fetch_movies(api, &request.query, &self.settings.fetch).await;
        self.complete_search(request.seq, result);
    }

    /// Moves the cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Moves the cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.status.movies().len() {
            self.cursor += 1;
        }
    }

    /// Returns the movie under the cursor.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.status.movies().get(self.cursor)
    }
}
