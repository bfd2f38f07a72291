//! CLI integration tests
//!
//! Exercises the `rap2` binary without a live server.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Config file pointing at a closed local port, with a session valid until 2099
fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
url = "http://127.0.0.1:9"
timeout_secs = 2

[session]
cookies = "koa.sid=abc"
expires_at = "2099-01-01T00:00:00Z"

[session.user]
id = 3
"#,
    )
    .unwrap();
    path
}

fn rap2(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rap2");
    cmd.env_remove("RAP2_URL")
        .env_remove("RAP2_ACCOUNT")
        .env_remove("RAP2_PASSWORD")
        .env_remove("RAP2_TIMEOUT_SECS")
        .env_remove("RAP2_SESSION_TTL_HOURS")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(write_config(dir));
    cmd
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("rap2");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    let mut cmd = cargo_bin_cmd!("rap2");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("create-module"))
        .stdout(predicate::str::contains("update-properties"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_invalid_id_fails_before_network() {
    let dir = TempDir::new().unwrap();
    rap2(&dir)
        .args(["repository", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error on /repository/get"));
}

#[test]
fn test_blank_module_name_fails_before_network() {
    let dir = TempDir::new().unwrap();
    rap2(&dir)
        .args(["create-module", "--repository", "42", "--name", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name can't be empty"));
}

#[test]
fn test_login_requires_account() {
    let dir = TempDir::new().unwrap();
    rap2(&dir)
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("account and password are required"));
}

#[test]
fn test_unreachable_server_is_reported() {
    let dir = TempDir::new().unwrap();
    rap2(&dir)
        .args(["interface", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error on /interface/get"));
}

#[test]
fn test_malformed_input_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("itf.json");
    std::fs::write(&file, r#"{"moduleId": "two"}"#).unwrap();

    rap2(&dir)
        .arg("create-interface")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("moduleId"));
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[server\n").unwrap();

    let mut cmd = cargo_bin_cmd!("rap2");
    cmd.arg("--config")
        .arg(&path)
        .args(["modules", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
