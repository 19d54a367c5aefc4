//! Smoke tests for command wiring, dry runs, config handling and failure output

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn microblog(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("microblog").unwrap();
    cmd.env("MICROBLOG_CONFIG", config)
        .env_remove("MICROBLOG_GITHUB_TOKEN")
        .env_remove("MICROBLOG_REPO")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

// === Help ===

#[test]
fn test_post_help() {
    let dir = TempDir::new().unwrap();
    microblog(&dir.path().join("none.toml"))
        .arg("post")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build and print the post without publishing"));
}

#[test]
fn test_config_help() {
    let dir = TempDir::new().unwrap();
    microblog(&dir.path().join("none.toml"))
        .arg("config")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Write a starter config file"));
}

// === Post (dry run) ===

#[test]
fn test_post_dry_run_prints_address_and_contents() {
    let dir = TempDir::new().unwrap();
    microblog(&dir.path().join("none.toml"))
        .args(["post", "hello world", "--at", "2024-03-07T12:00:00Z", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path: posts/2024/03/07/0ZAhLQE.md"))
        .stdout(predicate::str::contains(
            "---\ndate: 2024-03-07T12:00:00Z\n---\n\nhello world\n",
        ));
}

#[test]
fn test_post_dry_run_json() {
    let dir = TempDir::new().unwrap();
    let output = microblog(&dir.path().join("none.toml"))
        .args(["post", "hello world", "--at", "2024-03-07T12:00:00.750Z", "--dry-run", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["id"], "0ZAhLQE");
    assert_eq!(json["timestamp"], "2024-03-07T12:00:00Z");
    assert_eq!(json["published"], false);
}

#[test]
fn test_post_dry_run_reads_stdin() {
    let dir = TempDir::new().unwrap();
    microblog(&dir.path().join("none.toml"))
        .args(["post", "--at", "2024-03-07T12:00:00Z", "--dry-run"])
        .write_stdin("hello world\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("posts/2024/03/07/0ZAhLQE.md"));
}

#[test]
fn test_post_blank_body_is_rejected() {
    let dir = TempDir::new().unwrap();
    microblog(&dir.path().join("none.toml"))
        .args(["post", "   ", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Value is required!"));
}

#[test]
fn test_post_rejects_bad_timestamp() {
    let dir = TempDir::new().unwrap();
    microblog(&dir.path().join("none.toml"))
        .args(["post", "hi", "--at", "tomorrow", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RFC 3339"));
}

// === Post (publish) ===

#[test]
fn test_post_without_token_names_sources() {
    let dir = TempDir::new().unwrap();
    microblog(&dir.path().join("none.toml"))
        .args(["post", "hello", "--repo", "octocat/blog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("github.token"))
        .stderr(predicate::str::contains("MICROBLOG_GITHUB_TOKEN"));
}

#[test]
fn test_post_transport_failure_prints_retry_hint() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "[github]\ntoken = \"t0ken\"\nrepo = \"octocat/blog\"\napi_base = \"http://127.0.0.1:9\"\ntimeout_secs = 5\n",
    );

    microblog(&config)
        .args(["post", "hello world", "--at", "2024-03-07T12:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to commit post"))
        .stderr(predicate::str::contains("--at 2024-03-07T12:00:00Z"));
}

// === Config ===

#[test]
fn test_config_path_honours_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    microblog(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/config.toml");

    microblog(&path).args(["config", "init"]).assert().success();
    assert!(path.exists());

    microblog(&path)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    microblog(&path)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_redacts_token() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "[github]\ntoken = \"ghp_secret1234\"\nrepo = \"octocat/blog\"\n");

    microblog(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1234"))
        .stdout(predicate::str::contains("ghp_secret").not())
        .stdout(predicate::str::contains("octocat/blog"));
}

#[test]
fn test_config_validate_reports_missing_repo() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "[github]\ntoken = \"t0ken\"\n");

    microblog(&config)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("github.repo"));
}

#[test]
fn test_config_validate_warns_on_plain_token() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "[github]\ntoken = \"t0ken\"\nrepo = \"octocat/blog\"\n");

    microblog(&config)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plain text"))
        .stdout(predicate::str::contains("Configuration valid"));
}

// === Completions ===

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    microblog(&dir.path().join("none.toml"))
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("microblog"));
}
