//! Common test utilities for integration tests.
//!
//! This module provides helpers for opening databases on a shared file,
//! building stays and guests, and capturing published events.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use tempfile::TempDir;

use staylock::{
    BookingEvent, Database, DatabaseConfig, EngineContext, EventSink, GuestInfo, NewRoom, Room,
    RoomVersionGuard, StayInterval,
};

/// A database file in its own temporary directory.
///
/// Open as many connections to it as a test needs.
pub struct TestStore {
    #[allow(dead_code)]
    dir: TempDir,
    path: PathBuf,
}

#[allow(dead_code)]
impl TestStore {
    /// Creates the directory and the schema.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("staylock.db");
        Database::open(DatabaseConfig::new(&path)).expect("Failed to create database");
        Self { dir, path }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a new connection with default settings.
    pub fn open(&self) -> Database {
        Database::open(DatabaseConfig::new(&self.path)).expect("Failed to open database")
    }

    /// Opens a new connection with the given lock wait.
    pub fn open_with_wait(&self, wait: Duration) -> Database {
        let config = DatabaseConfig::new(&self.path).with_busy_timeout(wait);
        Database::open(config).expect("Failed to open database")
    }

    /// Opens a new connection without the store's overlap triggers, leaving
    /// the engine's own check as the only guard.
    pub fn open_without_triggers(&self) -> Database {
        let config = DatabaseConfig::new(&self.path).with_overlap_trigger(false);
        Database::open(config).expect("Failed to open database")
    }
}

/// A date in 2025.
#[allow(dead_code)]
pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("invalid test date")
}

/// A stay in 2025 given as (month, day) pairs.
#[allow(dead_code)]
pub fn stay(from: (u32, u32), to: (u32, u32)) -> StayInterval {
    StayInterval::new(day(from.0, from.1), day(to.0, to.1)).expect("invalid test stay")
}

/// A guest with a derived email address.
#[allow(dead_code)]
pub fn guest(name: &str) -> GuestInfo {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    GuestInfo::new(name, email).expect("invalid test guest")
}

/// Creates an active two-person room.
#[allow(dead_code)]
pub fn add_room(db: &mut Database, ctx: &EngineContext, name: &str) -> Room {
    let room = NewRoom::builder(name)
        .price(9_500)
        .capacity(2)
        .build()
        .expect("invalid test room");
    RoomVersionGuard::new(db, ctx)
        .create_room(&room)
        .expect("Failed to create room")
}

/// Context with no jitter, so timings in tests stay predictable.
#[allow(dead_code)]
pub fn quiet_context() -> EngineContext {
    EngineContext {
        retry: staylock::RetryPolicy::new(3, 0.0),
        ..EngineContext::default()
    }
}

/// Records every published event.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<BookingEvent>>,
}

#[allow(dead_code)]
impl RecordingSink {
    /// Creates a sink ready to share with a context.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns the events seen so far.
    pub fn events(&self) -> Vec<BookingEvent> {
        self.events.lock().expect("sink poisoned").clone()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &BookingEvent) {
        self.events.lock().expect("sink poisoned").push(*event);
    }
}
