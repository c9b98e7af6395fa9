//! Integration tests for the staylock CLI.
//!
//! These tests verify that the CLI binary behaves correctly, including
//! argument parsing, help text, and version output.

use assert_cmd::Command;
use predicates::prelude::*;

fn staylock() -> Command {
    Command::cargo_bin("staylock").expect("Failed to find staylock binary")
}

/// Test that the binary runs without arguments and displays help/error.
#[test]
fn test_cli_no_arguments() {
    staylock()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

/// Test that the --version flag displays version information.
#[test]
fn test_cli_version_flag() {
    staylock()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("staylock"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that the --help flag displays help text and the subcommands.
#[test]
fn test_cli_help_flag() {
    staylock()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("without double bookings"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("--deadline-ms"));
}

/// Test that an invalid subcommand produces an error.
#[test]
fn test_cli_invalid_subcommand() {
    staylock()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

/// Test that a malformed date is rejected by argument parsing.
#[test]
fn test_cli_invalid_date() {
    staylock()
        .args(["book", "--room", "1", "--check-in", "2025-13-01", "--check-out", "2025-01-02"])
        .args(["--guest-name", "A", "--guest-email", "a@b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

/// Test that completions are generated for bash.
#[test]
fn test_cli_completions() {
    staylock()
        .args(["--quiet", "completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("staylock"));
}
