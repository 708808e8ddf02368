#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a config pointing the TMDB client at `base_url`.
fn write_config(dir: &std::path::Path, base_url: &str) {
    let config = format!("[tmdb]\nbase_url = \"{base_url}\"\n");
    std::fs::write(dir.join("config.toml"), config).unwrap();
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("trending"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--query"));
}

#[test]
fn test_search_requires_api_token() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.env_remove("TMDB_API_TOKEN")
        .arg("--dir")
        .arg(dir.path())
        .args(["search", "--query", "batman"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "TMDB_API_TOKEN environment variable is required",
        ));
}

#[test]
fn test_invalid_config_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[tmdb\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.env("TMDB_API_TOKEN", "test-token")
        .arg("--dir")
        .arg(dir.path())
        .arg("trending")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_completions_bash() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cinefind"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_against_mock_server() {
    // Arrange
    let mock_server = MockServer::start().await;
    let body = include_str!("../../../fixtures/tmdb/search_movie_batman.json");
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "batman"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &format!("{}/3/", mock_server.uri()));

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.env("TMDB_API_TOKEN", "test-token")
        .env("RUST_LOG", "info")
        .arg("--dir")
        .arg(dir.path())
        .args(["search", "--query", "batman"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Batman Begins"))
        .stdout(predicate::str::contains("(2):"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_failure_reports_generic_message() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/discover/movie"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &format!("{}/3/", mock_server.uri()));

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.env("TMDB_API_TOKEN", "test-token")
        .arg("--dir")
        .arg(dir.path())
        .arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error fetching movies. Please try again later.",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_trending_lists_ranked_entries() {
    // Arrange
    let mock_server = MockServer::start().await;
    let body = include_str!("../../../fixtures/tmdb/trending_movie_week.json");
    Mock::given(method("GET"))
        .and(path("/3/trending/movie/week"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &format!("{}/3/", mock_server.uri()));

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.env("TMDB_API_TOKEN", "test-token")
        .env("RUST_LOG", "info")
        .arg("--dir")
        .arg(dir.path())
        .args(["trending", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Wild Robot"))
        .stdout(predicate::str::contains("/no-movie.png"));
}
