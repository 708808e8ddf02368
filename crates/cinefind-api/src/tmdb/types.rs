//! TMDB API response types and request parameters.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::FetchError;

/// Default sort key for the `discover/movie` endpoint.
pub const DEFAULT_DISCOVER_SORT: &str = "popularity.desc";

// --- Movie lists ---

/// A single movie entry from a list endpoint
/// (`search/movie`, `discover/movie`, `trending/movie/{window}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD, empty or null when unknown).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    pub popularity: Option<f64>,
    /// Vote average (0-10).
    pub vote_average: Option<f64>,
    /// Vote count.
    pub vote_count: Option<u32>,
    /// Poster image path, relative to the image host.
    pub poster_path: Option<String>,
    /// Backdrop image path, relative to the image host.
    pub backdrop_path: Option<String>,
}

impl Movie {
    /// Returns the release year, if the release date is a valid `YYYY-MM-DD`.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}

/// A page of movies from any list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieList {
    /// Current page number, when reported.
    pub page: Option<u32>,
    /// Total number of results, when reported.
    pub total_results: Option<u32>,
    /// Movies in response order.
    pub results: Vec<Movie>,
}

/// Parses a list endpoint body, checking that `results` is an array.
///
/// # Errors
///
/// Returns [`FetchError::Shape`] if the body is not a JSON object, has no
/// `results` array, or contains an entry that is not a movie object.
pub fn parse_movie_list(body: &str) -> Result<MovieList, FetchError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Shape(format!("response body is not JSON: {e}")))?;
    let Value::Object(mut object) = value else {
        return Err(FetchError::Shape(String::from(
            "response body is not a JSON object",
        )));
    };

    let items = match object.remove("results") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(FetchError::Shape(String::from(
                "`results` field is not an array",
            )));
        }
        None => return Err(FetchError::Shape(String::from("`results` field is missing"))),
    };

    let results = items
        .into_iter()
        .map(serde_json::from_value::<Movie>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| FetchError::Shape(format!("invalid movie entry: {e}")))?;

    let read_u32 = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };

    Ok(MovieList {
        page: read_u32("page"),
        total_results: read_u32("total_results"),
        results,
    })
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    pub success: bool,
}

// --- Request Parameters ---

/// Time window of the `trending/movie/{window}` endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Trending over the last day.
    Day,
    /// Trending over the last week.
    #[default]
    Week,
}

impl TimeWindow {
    /// Path segment used by the endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language; omitted from the request when `None`.
    pub language: Option<String>,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: None,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Parameters for `discover/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverParams {
    /// Sort key (default: `popularity.desc`); omitted when `None`.
    pub sort_by: Option<String>,
    /// Response language; omitted when `None`.
    pub language: Option<String>,
}

impl Default for DiscoverParams {
    fn default() -> Self {
        Self {
            sort_by: Some(String::from(DEFAULT_DISCOVER_SORT)),
            language: None,
        }
    }
}

impl DiscoverParams {
    /// Sets the sort key, or drops it with `None`.
    #[must_use]
    pub fn sort_by(mut self, sort_by: Option<String>) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Parameters for `trending/movie/{window}` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendingParams {
    /// Time window (default: week).
    pub window: TimeWindow,
    /// Response language; omitted when `None`.
    pub language: Option<String>,
}
