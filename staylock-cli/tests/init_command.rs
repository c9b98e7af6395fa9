//! Integration tests for the `init` command.

mod common;

use common::TestEnv;
use predicates::prelude::*;

/// Test that init creates the data directory and the database.
#[test]
fn test_init_creates_database() {
    let env = TestEnv::new();

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created data directory"))
        .stdout(predicate::str::contains("Created database"));

    assert!(env.data_dir.join("staylock.db").exists());
}

/// Test that a second init keeps the existing database.
#[test]
fn test_init_is_idempotent() {
    let env = TestEnv::new();
    env.create_room("Keep");

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("kept"));

    env.command()
        .args(["room", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep"));
}

/// Test that `--overwrite` starts from an empty database.
#[test]
fn test_init_overwrite() {
    let env = TestEnv::new();
    env.create_room("Gone");

    env.command()
        .args(["init", "--overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recreated database"));

    env.command()
        .args(["room", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gone").not());
}

/// Test that `--with-config` writes a configuration file that loads.
#[test]
fn test_init_with_config() {
    let env = TestEnv::new();

    env.command()
        .args(["init", "--with-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default configuration file"));

    let config = std::fs::read_to_string(env.data_dir.join("config.yaml")).unwrap();
    assert!(config.contains("busy_timeout_ms"));

    env.command().args(["room", "list"]).assert().success();
}

/// Test that `--dry-run` changes nothing.
#[test]
fn test_init_dry_run() {
    let env = TestEnv::new();

    env.command()
        .args(["init", "--dry-run", "--with-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry-run mode"))
        .stdout(predicate::str::contains("Create database"));

    assert!(!env.data_dir.exists());
}

/// Test that init's own `--data-dir` wins over the global one.
#[test]
fn test_init_explicit_data_dir() {
    let env = TestEnv::new();
    let other = env.path().join("elsewhere");

    env.command()
        .arg("init")
        .arg("--data-dir")
        .arg(&other)
        .assert()
        .success();

    assert!(other.join("staylock.db").exists());
}
