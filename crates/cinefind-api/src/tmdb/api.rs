//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{DiscoverParams, MovieList, SearchMovieParams, TrendingParams};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait;
/// implement `TmdbApi` to get both variants.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Lists movies from `discover/movie`.
    ///
    /// # Errors
    ///
    /// Returns an error wrapping [`super::FetchError`] if the request fails,
    /// the status is not 2xx, or the body has no `results` array.
    async fn discover_movies(&self, params: &DiscoverParams) -> Result<MovieList>;

    /// Searches movies by title with `search/movie`.
    ///
    /// # Errors
    ///
    /// Returns an error wrapping [`super::FetchError`] if the request fails,
    /// the status is not 2xx, or the body has no `results` array.
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MovieList>;

    /// Lists trending movies from `trending/movie/{window}`.
    ///
    /// # Errors
    ///
    /// Returns an error wrapping [`super::FetchError`] if the request fails,
    /// the status is not 2xx, or the body has no `results` array.
    async fn trending_movies(&self, params: &TrendingParams) -> Result<MovieList>;
}
