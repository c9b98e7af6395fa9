//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - JSON output parsing

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the staylock data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; staylock creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("staylock-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("staylock").expect("Failed to find staylock binary");
        for var in [
            "STAYLOCK_DATA_DIR",
            "STAYLOCK_ACTOR",
            "STAYLOCK_LOG_MODE",
            "STAYLOCK_BUSY_TIMEOUT_MS",
            "STAYLOCK_RETRY_MAX_ATTEMPTS",
            "STAYLOCK_RETRY_JITTER_RATIO",
            "STAYLOCK_DATE_BUCKET_DAYS",
            "STAYLOCK_ALLOW_IMPLICIT_VERSION",
            "STAYLOCK_OVERLAP_TRIGGER",
            "STAYLOCK_DISABLE_AUTOINIT",
            "STAYLOCK_OUTPUT_FORMAT",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get a command builder that prints JSON.
    pub fn json_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("--format").arg("json");
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write `config.yaml` into the data directory.
    pub fn write_config(&self, contents: &str) {
        std::fs::create_dir_all(&self.data_dir).expect("Failed to create data dir");
        std::fs::write(self.data_dir.join("config.yaml"), contents).expect("Failed to write config");
    }

    /// Create a room and return its JSON representation.
    pub fn create_room(&self, name: &str) -> serde_json::Value {
        let output = self
            .json_command()
            .args(["room", "create", "--name", name, "--capacity", "2"])
            .output()
            .expect("Failed to run room create");
        success_json(&output)
    }

    /// Run `book` for the given room and dates with a default guest.
    pub fn book(&self, room: i64, check_in: &str, check_out: &str) -> Output {
        self.json_command()
            .arg("book")
            .arg("--room")
            .arg(room.to_string())
            .args(["--check-in", check_in, "--check-out", check_out])
            .args(["--guest-name", "Test Guest", "--guest-email", "guest@example.com"])
            .output()
            .expect("Failed to run book command")
    }

    /// Book and return the new booking id.
    ///
    /// # Panics
    /// Panics if the booking fails.
    pub fn book_ok(&self, room: i64, check_in: &str, check_out: &str) -> i64 {
        let output = self.book(room, check_in, check_out);
        id_of(&success_json(&output))
    }

    /// Run a booking subcommand taking only an id and return its JSON.
    pub fn run_on_booking(&self, subcommand: &str, id: i64) -> Output {
        self.json_command()
            .arg(subcommand)
            .arg(id.to_string())
            .output()
            .expect("Failed to run booking command")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse stdout of a successful command as JSON.
#[allow(dead_code)]
pub fn success_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Output is not valid JSON")
}

/// Extract the `id` field of a room or booking.
#[allow(dead_code)]
pub fn id_of(value: &serde_json::Value) -> i64 {
    value["id"].as_i64().expect("JSON has no integer id")
}
