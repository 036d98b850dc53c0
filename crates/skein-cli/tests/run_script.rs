// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for `skein run`. Each test runs a .sk fixture
//! through the built binary and checks the streams and exit code.

use std::path::{Path, PathBuf};
use std::process::Command;

fn skein_binary() -> PathBuf {
    // cargo test builds into target/debug or target/release
    let mut path = std::env::current_exe().unwrap();
    // Walk up from the test binary to the target dir
    path.pop(); // remove test binary name
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("skein");
    path
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Run a fixture and return (stdout, stderr, exit code).
fn run_fixture(args: &[&str], fixture_name: &str) -> (String, String, i32) {
    let out = Command::new(skein_binary())
        .args(args)
        .arg(fixture(fixture_name))
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run skein");

    (
        String::from_utf8_lossy(&out.stdout).to_string(),
        String::from_utf8_lossy(&out.stderr).to_string(),
        out.status.code().unwrap_or(-1),
    )
}

#[test]
fn run_prints_sent_lines_in_order() {
    let (stdout, stderr, code) = run_fixture(&["run"], "countdown.sk");
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(stdout, "3\n2\n1\nliftoff\n");
}

#[test]
fn bare_sk_argument_runs_the_script() {
    let (stdout, _, code) = run_fixture(&[], "countdown.sk");
    assert_eq!(code, 0);
    assert_eq!(stdout, "3\n2\n1\nliftoff\n");
}

#[test]
fn fault_goes_to_stderr_with_nonzero_exit() {
    let (stdout, stderr, code) = run_fixture(&["run"], "undefined.sk");
    assert_eq!(code, 1);
    assert_eq!(stdout, "");
    assert!(
        stderr.contains("error[UnknownValueError]: unknown value 'missing'"),
        "stderr: {}",
        stderr
    );
    assert!(stderr.contains("send missing to @OUT"), "stderr: {}", stderr);
}

#[test]
fn json_report_carries_the_fault() {
    let (stdout, _, code) = run_fixture(&["run", "--json"], "undefined.sk");
    assert_eq!(code, 1);
    assert!(stdout.contains("\"kind\": \"UnknownValueError\""));
    assert!(stdout.contains("\"line\": 2"));
    assert!(stdout.contains("\"success\": false"));
}

#[test]
fn json_report_on_success_is_empty() {
    let (stdout, _, code) = run_fixture(&["run", "--json"], "countdown.sk");
    assert_eq!(code, 0);
    assert!(stdout.contains("\"success\": true"));
    assert!(stdout.contains("\"error_count\": 0"));
}

#[test]
fn unknown_command_fails() {
    let out = Command::new(skein_binary())
        .arg("frobnicate")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run skein");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown command"));
}

#[test]
fn version_prints_the_crate_version() {
    let out = Command::new(skein_binary())
        .arg("version")
        .output()
        .expect("failed to run skein");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("skein "));
}
