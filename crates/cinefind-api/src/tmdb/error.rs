//! Failure classes of TMDB requests.

use std::fmt;

/// Error raised by a TMDB request.
///
/// Client methods return `anyhow::Result`; the concrete class can be
/// recovered with [`fetch_kind`].
#[derive(Debug)]
pub enum FetchError {
    /// No usable response (DNS, connect, TLS or body read failure).
    Transport(reqwest::Error),
    /// The server answered with a non-2xx status.
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// TMDB error message, or the raw body when it is not a TMDB error.
        message: String,
    },
    /// The body is not a `{ "results": [...] }` object.
    Shape(String),
}

/// Discriminant of [`FetchError`], used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// See [`FetchError::Transport`].
    Transport,
    /// See [`FetchError::HttpStatus`].
    HttpStatus,
    /// See [`FetchError::Shape`].
    Shape,
}

impl FetchError {
    /// Returns the failure class.
    #[must_use]
    pub const fn kind(&self) -> FetchKind {
        match self {
            Self::Transport(_) => FetchKind::Transport,
            Self::HttpStatus { .. } => FetchKind::HttpStatus,
            Self::Shape(_) => FetchKind::Shape,
        }
    }
}

impl FetchKind {
    /// Short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::HttpStatus => "http_status",
            Self::Shape => "shape",
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "TMDB request failed: {e}"),
            Self::HttpStatus { status, message } => {
                write!(f, "TMDB API error (HTTP {status}): {message}")
            }
            Self::Shape(detail) => write!(f, "unexpected TMDB response shape: {detail}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::HttpStatus { .. } | Self::Shape(_) => None,
        }
    }
}

/// Returns the failure class of an error produced by the TMDB client.
///
/// Returns `None` for errors that did not originate from a request
/// (e.g. URL construction).
#[must_use]
pub fn fetch_kind(err: &anyhow::Error) -> Option<FetchKind> {
    err.downcast_ref::<FetchError>().map(FetchError::kind)
}
