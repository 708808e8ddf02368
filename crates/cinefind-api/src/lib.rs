//! API client library for cinefind.
//!
//! Provides a client for the TMDB API v3 movie endpoints.

/// TMDB API client.
pub mod tmdb;
