//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::error::FetchError;
use super::types::{
    DiscoverParams, MovieList, SearchMovieParams, TmdbErrorResponse, TrendingParams,
    parse_movie_list,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client (carries the `Accept: application/json` default header).
    http_client: Client,
    /// Base URL for API requests, always ending in `/`.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (config override, wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self
            .api_token
            .filter(|t| !t.trim().is_empty())
            .context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url: with_trailing_slash(base_url),
            api_token,
        })
    }
}

/// Appends `/` to the URL path so that `Url::join` keeps the last segment.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Builds an endpoint URL from the API base, a relative path and query pairs.
///
/// Query values are percent-encoded (a space becomes `%20`).
///
/// # Errors
///
/// Returns an error if `path` cannot be joined onto `base`.
pub fn endpoint_url(base: &Url, path: &str, query: &[(&str, &str)]) -> Result<Url> {
    let mut url = base
        .join(path)
        .with_context(|| format!("failed to join URL path: {path}"))?;

    if !query.is_empty() {
        let encoded = query
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&encoded));
    }

    Ok(url)
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request with Bearer auth and decodes a movie list.
    ///
    /// No retries: every failure is returned to the caller as a [`FetchError`].
    #[instrument(skip_all, fields(path = path))]
    async fn get_movie_list(&self, path: &str, query: &[(&str, &str)]) -> Result<MovieList> {
        let url = endpoint_url(&self.base_url, path, query)?;

        tracing::debug!(url = %url, "TMDB API request");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = serde_json::from_str::<TmdbErrorResponse>(&body).map_or(body, |e| {
                format!("code={}, message={}", e.status_code, e.status_message)
            });
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = response.text().await.map_err(FetchError::Transport)?;
        let list = parse_movie_list(&body)?;

        tracing::debug!(count = list.results.len(), "TMDB API response");
        Ok(list)
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn discover_movies(&self, params: &DiscoverParams) -> Result<MovieList> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(ref sort_by) = params.sort_by {
            query.push(("sort_by", sort_by.as_str()));
        }
        if let Some(ref language) = params.language {
            query.push(("language", language.as_str()));
        }

        self.get_movie_list("discover/movie", &query).await
    }

    #[instrument(skip_all)]
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MovieList> {
        let mut query: Vec<(&str, &str)> = vec![("query", params.query.as_str())];
        if let Some(ref language) = params.language {
            query.push(("language", language.as_str()));
        }

        self.get_movie_list("search/movie", &query).await
    }

    #[instrument(skip_all)]
    async fn trending_movies(&self, params: &TrendingParams) -> Result<MovieList> {
        let path = format!("trending/movie/{}", params.window.as_str());
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(ref language) = params.language {
            query.push(("language", language.as_str()));
        }

        self.get_movie_list(&path, &query).await
    }
}
