//! Trending strip entries derived from TMDB movies.

use cinefind_api::tmdb::Movie;

/// Default poster host and size prefix.
pub const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w200";

/// Default poster shown when a movie has none.
pub const DEFAULT_PLACEHOLDER_POSTER: &str = "/no-movie.png";

/// Default number of trending entries kept.
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

/// Poster URL construction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    /// Prefix joined with a movie's relative `poster_path`.
    pub poster_base_url: String,
    /// Used as-is when `poster_path` is absent.
    pub placeholder_poster: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            poster_base_url: String::from(DEFAULT_POSTER_BASE_URL),
            placeholder_poster: String::from(DEFAULT_PLACEHOLDER_POSTER),
        }
    }
}

impl ImageSettings {
    /// Absolute poster URL for `poster_path`, or the placeholder.
    #[must_use]
    pub fn poster_url(&self, poster_path: Option<&str>) -> String {
        poster_path.filter(|p| !p.is_empty()).map_or_else(
            || self.placeholder_poster.clone(),
            |path| format!("{}{path}", self.poster_base_url),
        )
    }
}

/// One entry of the trending strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingEntry {
    /// TMDB movie ID.
    pub id: u64,
    /// Movie title.
    pub title: String,
    /// Absolute poster URL or the placeholder.
    pub poster_url: String,
    /// 1-based position in the trending list.
    pub rank: usize,
}

/// Keeps the first `limit` movies and ranks them from 1 in input order.
#[must_use]
pub fn trending_entries(
    movies: &[Movie],
    images: &ImageSettings,
    limit: usize,
) -> Vec<TrendingEntry> {
    movies
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, movie)| TrendingEntry {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: images.poster_url(movie.poster_path.as_deref()),
            rank: index.saturating_add(1),
        })
        .collect()
}
