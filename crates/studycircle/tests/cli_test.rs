//! Integration tests for the `studycircle` CLI binary.
//!
//! Argument parsing, help output, completions, config handling, and
//! failures that are decided before any request leaves the process.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Nothing listens on the discard port, and none of these tests should
/// reach the network anyway.
const OFFLINE_URL: &str = "http://127.0.0.1:9/api";

/// Build a command for the `studycircle` binary with env isolation.
///
/// Config and data directories point into `home`, and every
/// `STUDYCIRCLE_*` variable is cleared.
fn studycircle_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("studycircle");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("STUDYCIRCLE_PROFILE")
        .env_remove("STUDYCIRCLE_URL")
        .env_remove("STUDYCIRCLE_OUTPUT")
        .env_remove("STUDYCIRCLE_USERNAME")
        .env_remove("STUDYCIRCLE_PASSWORD");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_config(home: &TempDir, body: &str) {
    let dir = home.path().join("config").join("studycircle");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), body).unwrap();
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = studycircle_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("communities")
            .and(predicate::str::contains("catalog"))
            .and(predicate::str::contains("enrollments"))
            .and(predicate::str::contains("groups")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("studycircle"));
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home)
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_board_post_requires_title() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home)
        .args(["board", "post", "c1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--title"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_is_under_config_home() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("studycircle").and(predicate::str::contains("config.toml")));
}

#[test]
fn test_config_show_masks_password() {
    let home = TempDir::new().unwrap();
    write_config(
        &home,
        r#"
default_profile = "campus"

[profiles.campus]
url = "https://circle.example.edu/api"
username = "ada"
password = "hunter2"
"#,
    );
    studycircle_cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.campus]")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_config_use_unknown_profile() {
    let home = TempDir::new().unwrap();
    write_config(
        &home,
        r#"
[profiles.campus]
url = "https://circle.example.edu/api"
"#,
    );
    let output = studycircle_cmd(&home)
        .args(["config", "use", "nowhere"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("nowhere"), "Expected profile name in:\n{text}");
    assert!(text.contains("campus"), "Expected available profiles in:\n{text}");
}

// ── Failures before any request ─────────────────────────────────────

#[test]
fn test_no_config_fails() {
    let home = TempDir::new().unwrap();
    let output = studycircle_cmd(&home)
        .args(["communities", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("No backend configured"),
        "Expected config error in:\n{text}"
    );
}

#[test]
fn test_whoami_without_login() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home)
        .args(["--url", OFFLINE_URL, "whoami"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("logged in"));
}

#[test]
fn test_mutation_without_login_is_rejected_locally() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home)
        .args(["--url", OFFLINE_URL, "communities", "create", "Chess"])
        .assert()
        .code(3);
}

#[test]
fn test_schedule_rejects_malformed_time() {
    let home = TempDir::new().unwrap();
    studycircle_cmd(&home)
        .args([
            "--url",
            OFFLINE_URL,
            "groups",
            "schedule",
            "7",
            "--title",
            "Exam prep",
            "--at",
            "tomorrow",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("RFC 3339"));
}

#[test]
fn test_non_http_url_is_rejected() {
    let home = TempDir::new().unwrap();
    let output = studycircle_cmd(&home)
        .args(["--url", "ftp://circle.example.edu", "whoami"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
