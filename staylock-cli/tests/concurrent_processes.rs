//! Several CLI processes racing for the same nights.
//!
//! Every process opens its own connection to the shared database file, so
//! this exercises the store's locking rather than anything in-process.

mod common;

use common::{id_of, success_json, TestEnv};
use std::process::{Command, Stdio};

const RACERS: usize = 6;

/// Test that exactly one of several simultaneous bookings wins.
#[test]
fn test_simultaneous_bookings_single_winner() {
    let env = TestEnv::new();
    let room = id_of(&env.create_room("Contested")).to_string();
    let binary = assert_cmd::cargo::cargo_bin("staylock");

    let children: Vec<_> = (0..RACERS)
        .map(|i| {
            Command::new(&binary)
                .arg("--data-dir")
                .arg(&env.data_dir)
                .args(["--format", "json", "book", "--room", &room])
                .args(["--check-in", "2025-12-24", "--check-out", "2025-12-27"])
                .arg("--guest-name")
                .arg(format!("Guest {i}"))
                .args(["--guest-email", "racer@example.com"])
                .env_remove("STAYLOCK_DATA_DIR")
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .expect("Failed to spawn staylock")
        })
        .collect();

    let codes: Vec<Option<i32>> = children
        .into_iter()
        .map(|child| child.wait_with_output().unwrap().status.code())
        .collect();

    let winners = codes.iter().filter(|code| **code == Some(0)).count();
    assert_eq!(winners, 1, "exit codes: {codes:?}");
    // Losers either saw the winner's booking or ran out of retries.
    assert!(codes
        .iter()
        .all(|code| matches!(code, Some(0) | Some(1) | Some(2))));

    let output = env
        .json_command()
        .args(["list", "--room", &room])
        .output()
        .unwrap();
    assert_eq!(success_json(&output).as_array().unwrap().len(), 1);
}

/// Test that racers for different rooms all succeed.
#[test]
fn test_simultaneous_bookings_different_rooms() {
    let env = TestEnv::new();
    let rooms: Vec<String> = (0..4)
        .map(|i| id_of(&env.create_room(&format!("Room {i}"))).to_string())
        .collect();
    let binary = assert_cmd::cargo::cargo_bin("staylock");

    let children: Vec<_> = rooms
        .iter()
        .map(|room| {
            Command::new(&binary)
                .arg("--data-dir")
                .arg(&env.data_dir)
                .args(["book", "--room", room])
                .args(["--check-in", "2025-12-24", "--check-out", "2025-12-27"])
                .args(["--guest-name", "Guest", "--guest-email", "g@example.com"])
                .env_remove("STAYLOCK_DATA_DIR")
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
                .expect("Failed to spawn staylock")
        })
        .collect();

    for child in children {
        let output = child.wait_with_output().unwrap();
        assert!(
            output.status.success(),
            "{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}
