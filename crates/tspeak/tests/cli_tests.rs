#![cfg(feature = "cli")]

use std::process::{Command, Output};

const TRANSPORT_ERROR: i32 = 3;
const USAGE: i32 = 64;

// Point at a closed local port so a regression that reaches the network
// fails fast instead of hitting the real service.
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn tspeak(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tspeak"))
        .arg("--log-level")
        .arg("error")
        .arg("--server")
        .arg(UNREACHABLE)
        .args(args)
        .env_remove("TSPEAK_WRITE_KEY")
        .env_remove("TSPEAK_READ_KEY")
        .env_remove("TSPEAK_CONFIG")
        .output()
        .expect("tspeak should run")
}

#[test]
fn version_prints_package_version() {
    let output = tspeak(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn field_out_of_range_exits_with_usage() {
    let output = tspeak(&["feed", "654321", "--field", "9"]);
    assert_eq!(output.status.code(), Some(USAGE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("field"));
}

#[test]
fn update_with_field_zero_exits_with_usage() {
    let output = tspeak(&["update", "123456", "--write-key", "you", "--field", "0=1"]);
    assert_eq!(output.status.code(), Some(USAGE));
}

#[test]
fn update_with_channel_zero_exits_with_usage() {
    let output = tspeak(&["update", "0", "--write-key", "you", "--status", "live"]);
    assert_eq!(output.status.code(), Some(USAGE));
}

#[test]
fn update_with_empty_write_key_is_sent() {
    let output = tspeak(&["update", "123456", "--write-key", "", "--field", "1=2"]);
    assert_eq!(output.status.code(), Some(TRANSPORT_ERROR));
}

#[test]
fn blank_user_exits_with_usage() {
    let output = tspeak(&["user", ""]);
    assert_eq!(output.status.code(), Some(USAGE));
}

#[test]
fn missing_config_file_exits_with_usage() {
    let output = tspeak(&["--config", "/nonexistent/tspeak.json", "public"]);
    assert_eq!(output.status.code(), Some(USAGE));
}

#[test]
fn unreachable_server_exits_with_transport_error() {
    let output = tspeak(&["--format", "json", "public"]);
    assert_eq!(output.status.code(), Some(TRANSPORT_ERROR));
}
