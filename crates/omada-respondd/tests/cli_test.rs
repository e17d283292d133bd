//! Integration tests for the `omada-respondd` binary.
//!
//! Argument parsing, config errors, and a cycle against a controller that
//! refuses connections; nothing here needs a live Omada controller.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command with env isolation: no `RESPONDD_*` overrides and no
/// access to the user's real config directory.
fn respondd_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("omada-respondd");
    cmd.env("HOME", "/tmp/omada-respondd-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/omada-respondd-test-nonexistent")
        .env_remove("RESPONDD_CONFIG")
        .env_remove("RESPONDD_CONTROLLER_URL")
        .env_remove("RESPONDD_USERNAME")
        .env_remove("RESPONDD_PASSWORD")
        .env_remove("RESPONDD_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn config_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    respondd_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("accesspoints")
            .and(predicate::str::contains("--config"))
            .and(predicate::str::contains("--interval")),
    );
}

#[test]
fn test_version_flag() {
    respondd_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("omada-respondd"));
}

#[test]
fn test_invalid_log_format() {
    respondd_cmd()
        .args(["--log-format", "xml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("possible values"));
}

// ── Config errors ───────────────────────────────────────────────────

#[test]
fn test_missing_config_file() {
    respondd_cmd()
        .args(["--config", "/tmp/omada-respondd-test-nonexistent/config.toml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_no_config_anywhere() {
    respondd_cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("controller_url"));
}

#[test]
fn test_invalid_ssid_regex() {
    let file = config_file(
        r#"
        controller_url = "https://127.0.0.1:8043"
        username = "respondd"
        password = "pw"
        ssid_regex = "(unclosed"
        "#,
    );

    respondd_cmd()
        .arg("--config")
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ssid_regex"));
}

#[test]
fn test_missing_password() {
    let file = config_file(
        r#"
        controller_url = "https://127.0.0.1:8043"
        username = "respondd"
        "#,
    );

    respondd_cmd()
        .arg("--config")
        .arg(file.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("respondd"));
}

#[test]
fn test_print_config_masks_password() {
    let file = config_file(
        r#"
        controller_url = "https://127.0.0.1:8043"
        username = "respondd"
        password = "hunter2"
        "#,
    );

    respondd_cmd()
        .arg("--config")
        .arg(file.path())
        .arg("--print-config")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("controller_url")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

// ── Cycle ───────────────────────────────────────────────────────────

#[test]
fn test_unreachable_controller_prints_empty_snapshot() {
    let file = config_file(
        r#"
        controller_url = "http://127.0.0.1:9"
        username = "respondd"
        password = "pw"
        timeout = 2
        "#,
    );

    respondd_cmd()
        .arg("--config")
        .arg(file.path())
        .arg("--compact")
        .assert()
        .success()
        .stdout(predicate::str::diff("{\"accesspoints\":[]}\n"));
}
