//! Search-or-discover and trending fetch operations.

use anyhow::Result;
use cinefind_api::tmdb::{
    DEFAULT_DISCOVER_SORT, DiscoverParams, Movie, SearchMovieParams, TimeWindow, TmdbApi,
    TrendingParams, fetch_kind,
};
use tracing::instrument;

use crate::trending::{DEFAULT_TRENDING_LIMIT, ImageSettings, TrendingEntry, trending_entries};

/// The only failure text shown to the user for the results list.
pub const GENERIC_FETCH_ERROR: &str = "Error fetching movies. Please try again later.";

/// Request for the results list, derived from the debounced search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    /// Popular catalog listing (`discover/movie`), used for an empty term.
    Discover,
    /// Title search (`search/movie`).
    Search(String),
}

impl MovieQuery {
    /// Whitespace-only terms count as empty.
    #[must_use]
    pub fn from_term(term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() {
            Self::Discover
        } else {
            Self::Search(String::from(term))
        }
    }
}

/// Settings shared by every results request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Response language; omitted when `None`.
    pub language: Option<String>,
    /// `sort_by` of the discovery listing; omitted when `None`.
    pub discover_sort_by: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            language: None,
            discover_sort_by: Some(String::from(DEFAULT_DISCOVER_SORT)),
        }
    }
}

/// Settings of the trending strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingSettings {
    /// Trending time window.
    pub window: TimeWindow,
    /// Maximum number of entries.
    pub limit: usize,
    /// Response language; omitted when `None`.
    pub language: Option<String>,
    /// Poster URL construction.
    pub images: ImageSettings,
}

impl Default for TrendingSettings {
    fn default() -> Self {
        Self {
            window: TimeWindow::Week,
            limit: DEFAULT_TRENDING_LIMIT,
            language: None,
            images: ImageSettings::default(),
        }
    }
}

/// Fetches the results list for `query`.
///
/// The `results` array is returned as received.
///
/// # Errors
///
/// Returns the client error (see `cinefind_api::tmdb::FetchError`) unchanged.
#[instrument(skip_all)]
pub async fn fetch_movies<A>(
    api: &A,
    query: &MovieQuery,
    settings: &FetchSettings,
) -> Result<Vec<Movie>>
where
    A: TmdbApi + Sync,
{
    let list = match query {
        MovieQuery::Discover => {
            let mut params = DiscoverParams::default().sort_by(settings.discover_sort_by.clone());
            if let Some(ref language) = settings.language {
                params = params.language(language);
            }
            api.discover_movies(&params).await?
        }
        MovieQuery::Search(text) => {
            let mut params = SearchMovieParams::new(text);
            if let Some(ref language) = settings.language {
                params = params.language(language);
            }
            api.search_movies(&params).await?
        }
    };

    Ok(list.results)
}

/// Fetches the trending strip.
///
/// Failures are logged and produce an empty strip.
#[instrument(skip_all)]
pub async fn fetch_trending<A>(api: &A, settings: &TrendingSettings) -> Vec<TrendingEntry>
where
    A: TmdbApi + Sync,
{
    let params = TrendingParams {
        window: settings.window,
        language: settings.language.clone(),
    };

    match api.trending_movies(&params).await {
        Ok(list) => trending_entries(&list.results, &settings.images, settings.limit),
        Err(err) => {
            let kind = fetch_kind(&err).map_or("other", |k| k.as_str());
            tracing::warn!(kind, "Failed to fetch trending movies: {err:#}");
            Vec::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::Mutex;

    use anyhow::bail;
    use cinefind_api::tmdb::{FetchError, MovieList};
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    /// Scripted `TmdbApi` recording every request.
    #[derive(Debug, Default)]
    pub(crate) struct MockApi {
        pub(crate) movies: Vec<Movie>,
        pub(crate) fail: bool,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        pub(crate) fn with_movies(movies: Vec<Movie>) -> Self {
            Self {
                movies,
                ..Self::default()
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn respond(&self, call: String) -> Result<MovieList> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                bail!(FetchError::Shape(String::from("scripted failure")));
            }
            Ok(MovieList {
                page: Some(1),
                total_results: None,
                results: self.movies.clone(),
            })
        }
    }

    impl TmdbApi for MockApi {
        async fn discover_movies(&self, params: &DiscoverParams) -> Result<MovieList> {
            self.respond(format!("discover:{}", params.sort_by.as_deref().unwrap_or("-")))
        }

        async fn search_movies(&self, params: &SearchMovieParams) -> Result<MovieList> {
            self.respond(format!("search:{}", params.query))
        }

        async fn trending_movies(&self, params: &TrendingParams) -> Result<MovieList> {
            self.respond(format!("trending:{}", params.window.as_str()))
        }
    }

    pub(crate) fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: String::from(title),
            original_title: None,
            original_language: Some(String::from("en")),
            release_date: None,
            overview: None,
            popularity: None,
            vote_average: None,
            vote_count: None,
            poster_path: None,
            backdrop_path: None,
        }
    }

    #[test]
    fn test_query_from_term() {
        // Arrange & Act & Assert
        assert_eq!(MovieQuery::from_term(""), MovieQuery::Discover);
        assert_eq!(MovieQuery::from_term("   "), MovieQuery::Discover);
        assert_eq!(
            MovieQuery::from_term(" batman "),
            MovieQuery::Search(String::from("batman"))
        );
    }

    #[tokio::test]
    async fn test_fetch_movies_search_endpoint() {
        // Arrange
        let api = MockApi::with_movies(vec![movie(1, "Batman")]);

        // Act
        let movies = fetch_movies(
            &api,
            &MovieQuery::from_term("batman"),
            &FetchSettings::default(),
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(api.calls(), vec![String::from("search:batman")]);
        assert_eq!(movies, vec![movie(1, "Batman")]);
    }

    #[tokio::test]
    async fn test_fetch_movies_discover_endpoint_uses_configured_sort() {
        // Arrange
        let api = MockApi::default();
        let settings = FetchSettings {
            language: None,
            discover_sort_by: None,
        };

        // Act
        fetch_movies(&api, &MovieQuery::Discover, &FetchSettings::default())
            .await
            .unwrap();
        fetch_movies(&api, &MovieQuery::Discover, &settings)
            .await
            .unwrap();

        // Assert
        assert_eq!(
            api.calls(),
            vec![
                String::from("discover:popularity.desc"),
                String::from("discover:-")
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_trending_truncates() {
        // Arrange
        let movies = (1..=8).map(|i| movie(i, "m")).collect();
        let api = MockApi::with_movies(movies);

        // Act
        let entries = fetch_trending(&api, &TrendingSettings::default()).await;

        // Assert
        assert_eq!(api.calls(), vec![String::from("trending:week")]);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[4].rank, 5);
        assert_eq!(entries[4].id, 5);
    }

    #[tokio::test]
    async fn test_fetch_trending_failure_is_empty() {
        // Arrange
        let api = MockApi::failing();

        // Act
        let entries = fetch_trending(&api, &TrendingSettings::default()).await;

        // Assert
        assert!(entries.is_empty());
    }

    #[test]
    fn test_fetch_trending_failure_logs_warning() {
        // Arrange
        let api = MockApi::failing();
        let span = expect::span().named("fetch_trending");
        let (subscriber, handle) = subscriber::mock()
            .new_span(span.clone())
            .enter(span.clone())
            .event(expect::event().at_level(tracing::Level::WARN))
            .exit(span)
            .run_with_handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        // Act
        let entries = with_default(subscriber, || {
            runtime.block_on(fetch_trending(&api, &TrendingSettings::default()))
        });

        // Assert
        assert!(entries.is_empty());
        handle.assert_finished();
    }
}
