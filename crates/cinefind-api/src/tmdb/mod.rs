//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie list endpoints
//! (search, discover, trending).

mod api;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder, endpoint_url};
pub use error::{FetchError, FetchKind, fetch_kind};
pub use types::{
    DEFAULT_DISCOVER_SORT, DiscoverParams, Movie, MovieList, SearchMovieParams, TimeWindow,
    TrendingParams, parse_movie_list,
};
