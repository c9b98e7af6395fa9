//! Shared test utilities for database unit tests.

use chrono::{DateTime, TimeZone, Utc};
use tempfile::{tempdir, TempDir};

use crate::database::{Database, DatabaseConfig};
use crate::room::{NewRoom, Room};
use crate::store::RoomStore;

/// Creates a database in a fresh temporary directory.
///
/// The directory is returned so it outlives the connection.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> (TempDir, Database) {
    let dir = tempdir().unwrap();
    let config = DatabaseConfig::new(dir.path().join("test.db"));
    let db = Database::open(config).unwrap();
    (dir, db)
}

/// A fixed timestamp for rows written in tests.
#[must_use]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
}

/// Inserts an active two-person room.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn create_test_room(db: &mut Database) -> Room {
    let room = NewRoom::builder("Test Room").price(10_000).capacity(2).build().unwrap();
    db.insert_room(&room, test_now()).unwrap()
}
