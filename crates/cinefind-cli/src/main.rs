//! cinefind - search and browse TMDB movies from the terminal.

/// Application configuration (TOML).
mod config;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use cinefind_api::tmdb::TmdbClient;
use cinefind_tui::fetch::fetch_trending;
use cinefind_tui::{BrowserSession, FetchStatus, run_browser};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path, resolve_log_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "cinefind", about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse and search movies in an interactive TUI.
    Browse,
    /// Search movies once; without a query, lists popular movies.
    Search(SearchArgs),
    /// List this week's trending movies.
    Trending(TrendingArgs),
    /// Print a shell completion script.
    Completions(CompletionsArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "batman").
    #[arg(long)]
    query: Option<String>,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Number of movies to list (default: `search.trending_limit`).
    #[arg(long)]
    limit: Option<usize>,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Loads `config.toml` from the resolved config directory.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    TmdbClient::builder()
        .base_url(config.tmdb_base_url()?)
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    run_browser(Arc::new(client), config.browser_settings())
        .await
        .context("movie browser TUI failed")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    let mut session = BrowserSession::new(config.browser_settings());
    session.set_search_term(args.query.clone().unwrap_or_default());
    session.refresh(&client).await;

    let movies = match session.status() {
        FetchStatus::Loaded(movies) => movies,
        FetchStatus::Error(message) => bail!("{message}"),
        FetchStatus::Idle | FetchStatus::Loading => bail!("search did not complete"),
    };

    let term = session.active_term().trim();
    if term.is_empty() {
        tracing::info!("All movies ({}):", movies.len());
    } else {
        tracing::info!("Results for \"{term}\" ({}):", movies.len());
    }
    if movies.is_empty() {
        tracing::info!("No movies found.");
        return Ok(());
    }

    tracing::info!("ID\tRating\tYear\tLang\tTitle");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            movie.id,
            movie
                .vote_average
                .filter(|v| *v > 0.0)
                .map_or_else(|| String::from("N/A"), |v| format!("{v:.1}")),
            movie
                .release_year()
                .map_or_else(|| String::from("N/A"), |y| y.to_string()),
            movie.original_language.as_deref().unwrap_or("N/A"),
            movie.title,
        );
    }

    Ok(())
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build.
#[instrument(skip_all)]
async fn run_trending(args: &TrendingArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    let mut settings = config.browser_settings().trending;
    if let Some(limit) = args.limit {
        settings.limit = limit;
    }

    let entries = fetch_trending(&client, &settings).await;
    if entries.is_empty() {
        tracing::info!("No trending movies available.");
        return Ok(());
    }

    tracing::info!("Rank\tID\tTitle\tPoster");
    for entry in &entries {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            entry.rank,
            entry.id,
            entry.title,
            entry.poster_url
        );
    }

    Ok(())
}

/// Runs the `completions` subcommand.
fn run_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_owned();
    clap_complete::generate(args.shell, &mut cmd, name, &mut io::stdout());
}

/// Log destination for a command.
///
/// The TUI owns the terminal, so `browse` logs to a file next to the config.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn log_writer(command: &Commands, dir: Option<&PathBuf>) -> Result<(BoxMakeWriter, bool)> {
    if !matches!(command, Commands::Browse) {
        return Ok((BoxMakeWriter::new(io::stdout), true));
    }

    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let log_path = resolve_log_path(&config_path);
    let file = open_log_file(&log_path)?;
    Ok((BoxMakeWriter::new(Mutex::new(file)), false))
}

/// Opens `path` for appending, creating parent directories if needed.
fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Installs the global tracing subscriber.
fn init_tracing(writer: BoxMakeWriter, ansi: bool) {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (writer, ansi) = log_writer(&cli.command, cli.dir.as_ref())?;
    init_tracing(writer, ansi);

    match cli.command {
        Commands::Browse => run_browse(cli.dir.as_ref()).await,
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Trending(args) => run_trending(&args, cli.dir.as_ref()).await,
        Commands::Completions(args) => {
            run_completions(&args);
            Ok(())
        }
    }
}
