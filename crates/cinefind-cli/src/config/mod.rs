//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB request, poster image and
//! search settings.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{resolve_config_path, resolve_log_path};
