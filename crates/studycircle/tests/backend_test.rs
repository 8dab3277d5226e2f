//! CLI runs against a mocked backend: how backend failures surface as
//! messages and exit codes.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

fn studycircle_cmd(home: &TempDir, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("studycircle");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("STUDYCIRCLE_PROFILE")
        .env_remove("STUDYCIRCLE_OUTPUT")
        .env_remove("STUDYCIRCLE_USERNAME")
        .env_remove("STUDYCIRCLE_PASSWORD")
        .env("STUDYCIRCLE_URL", format!("{}/api", server.uri()));
    cmd
}

async fn mount_json(server: &MockServer, action: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(format!("/api/Community/{action}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

// The binary blocks until it exits, so keep it off the mock server's worker.
async fn run(home: &TempDir, server: &MockServer, args: &'static [&'static str]) -> std::process::Output {
    let mut cmd = studycircle_cmd(home, server);
    cmd.args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Communities refresh ─────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_community_fetch_error_survives_membership_fetch() {
    let server = MockServer::start().await;
    mount_json(&server, "_getAllCommunities", 200, json!({ "error": "db down" })).await;
    mount_json(&server, "_getAllMemberships", 200, json!([])).await;

    let home = TempDir::new().unwrap();
    let output = run(&home, &server, &["communities", "list"]).await;

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(5), "stderr:\n{stderr}");
    assert!(stderr.contains("db down"), "stderr:\n{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_membership_fetch_error_is_reported() {
    let server = MockServer::start().await;
    mount_json(&server, "_getAllCommunities", 200, json!([])).await;
    mount_json(&server, "_getAllMemberships", 200, json!({ "error": "no index" })).await;

    let home = TempDir::new().unwrap();
    let output = run(&home, &server, &["communities", "list"]).await;

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(5), "stderr:\n{stderr}");
    assert!(stderr.contains("no index"), "stderr:\n{stderr}");
}

// ── Expired login ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_fetch_exits_with_auth_code() {
    let server = MockServer::start().await;
    mount_json(&server, "_getAllCommunities", 401, json!({ "error": "session expired" })).await;
    mount_json(&server, "_getAllMemberships", 200, json!([])).await;

    let home = TempDir::new().unwrap();
    let output = run(&home, &server, &["communities", "list"]).await;

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(3), "stderr:\n{stderr}");
    assert!(stderr.contains("session expired"), "stderr:\n{stderr}");
}
