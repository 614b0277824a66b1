#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::Command;
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

/// `movieapp` with a clean logging environment and `--dir` pointing at `dir`.
fn movieapp(dir: &tempfile::TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("movieapp");
    cmd.env_remove("RUST_LOG")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .arg("--dir")
        .arg(dir.path());
    cmd
}

#[test]
fn test_help_lists_commands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieapp");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("movies"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("favorites"));
}

#[test]
fn test_movies_help_lists_categories() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieapp");
    cmd.args(["movies", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("top-rated"))
        .stdout(predicate::str::contains("--with-runtime"));
}

#[test]
fn test_movies_unknown_category() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieapp");
    cmd.args(["movies", "trending"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_movies_page_zero_rejected() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieapp");
    cmd.args(["movies", "popular", "--page", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--page"));
}

#[test]
fn test_search_requires_query_or_interactive() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieapp");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_search_query_conflicts_with_interactive() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieapp");
    cmd.args(["search", "--query", "matrix", "--interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_interactive_search_rejects_page() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieapp");
    cmd.args(["search", "--interactive", "--page", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_details_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movieapp");
    cmd.arg("details")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_details_without_api_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    movieapp(&dir)
        .env_remove("TMDB_API_KEY")
        .args(["details", "--id", "603"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_KEY"));
}

#[test]
fn test_favorites_toggle_and_check() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    movieapp(&dir)
        .args(["favorites", "toggle", "--id", "603"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Movie 603 added to favorites"));

    movieapp(&dir)
        .args(["favorites", "check", "--id", "603"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Movie 603 is a favorite"));

    movieapp(&dir)
        .args(["favorites", "toggle", "--id", "603"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Movie 603 removed from favorites"));

    movieapp(&dir)
        .args(["favorites", "check", "--id", "603"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Movie 603 is not a favorite"));
    assert!(dir.path().join("movieapp.db").is_file());
}

#[test]
fn test_favorites_list_empty_needs_no_api_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    movieapp(&dir)
        .env_remove("TMDB_API_KEY")
        .args(["favorites", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No favorites yet"));
}

#[test]
fn test_config_init_then_show() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    movieapp(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(dir.path().join("config.toml").exists());
    assert!(!dir.path().join("movieapp.db").exists());

    movieapp(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debounce_ms = 500"))
        .stdout(predicate::str::contains("runtime_ttl_secs = 300"));
}

#[test]
fn test_interactive_search_ends_at_eof() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    movieapp(&dir)
        .env("TMDB_API_KEY", "test-key")
        .args(["search", "--interactive"])
        .write_stdin("   \n")
        .assert()
        .success();
}
