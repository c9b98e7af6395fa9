//! Database schema definitions and SQL constants.
//!
//! Dates are stored as `YYYY-MM-DD` text, whose lexicographic order equals
//! date order, so interval comparisons run directly on the columns.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the rooms table.
///
/// `lock_version` is the optimistic-lock token. Only the guarded update
/// statement changes it.
pub const CREATE_ROOMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS rooms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL CHECK (length(trim(name)) > 0),
        price INTEGER NOT NULL CHECK (price >= 0),
        capacity INTEGER NOT NULL CHECK (capacity >= 1),
        status TEXT NOT NULL CHECK (status IN ('active', 'inactive')),
        lock_version INTEGER NOT NULL DEFAULT 1 CHECK (lock_version >= 1),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )";

/// SQL statement to create the bookings table.
pub const CREATE_BOOKINGS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS bookings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        room_id INTEGER NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
        check_in TEXT NOT NULL,
        check_out TEXT NOT NULL,
        guest_name TEXT NOT NULL,
        guest_email TEXT NOT NULL,
        guest_phone TEXT,
        status TEXT NOT NULL CHECK (status IN ('pending', 'confirmed', 'cancelled')),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deleted_at TEXT,
        deleted_by TEXT,
        restored_at TEXT,
        restored_by TEXT,
        CHECK (check_out > check_in)
    )";

/// Partial index over the rows that take part in the no-overlap rule.
pub const CREATE_ACTIVE_BOOKINGS_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_bookings_room_active
    ON bookings(room_id, check_in, check_out)
    WHERE status != 'cancelled' AND deleted_at IS NULL";

/// Message raised by the overlap triggers.
pub const OVERLAP_MARKER: &str = "booking_overlap";

/// Rejects inserts that would overlap an active booking of the same room.
pub const CREATE_OVERLAP_INSERT_TRIGGER: &str = r"
    CREATE TRIGGER IF NOT EXISTS trg_bookings_no_overlap_insert
    BEFORE INSERT ON bookings
    WHEN NEW.status != 'cancelled' AND NEW.deleted_at IS NULL
    BEGIN
        SELECT RAISE(ABORT, 'booking_overlap')
        WHERE EXISTS (
            SELECT 1 FROM bookings b
            WHERE b.room_id = NEW.room_id
              AND b.status != 'cancelled'
              AND b.deleted_at IS NULL
              AND b.check_in < NEW.check_out
              AND b.check_out > NEW.check_in
        );
    END";

/// Rejects updates that would make a row overlap another active booking.
pub const CREATE_OVERLAP_UPDATE_TRIGGER: &str = r"
    CREATE TRIGGER IF NOT EXISTS trg_bookings_no_overlap_update
    BEFORE UPDATE OF room_id, check_in, check_out, status, deleted_at ON bookings
    WHEN NEW.status != 'cancelled' AND NEW.deleted_at IS NULL
    BEGIN
        SELECT RAISE(ABORT, 'booking_overlap')
        WHERE EXISTS (
            SELECT 1 FROM bookings b
            WHERE b.id != NEW.id
              AND b.room_id = NEW.room_id
              AND b.status != 'cancelled'
              AND b.deleted_at IS NULL
              AND b.check_in < NEW.check_out
              AND b.check_out > NEW.check_in
        );
    END";

/// Removes both overlap triggers.
pub const DROP_OVERLAP_TRIGGERS: &str = r"
    DROP TRIGGER IF EXISTS trg_bookings_no_overlap_insert;
    DROP TRIGGER IF EXISTS trg_bookings_no_overlap_update;";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

pub(super) const ROOM_COLUMNS: &str =
    "id, name, price, capacity, status, lock_version, created_at, updated_at";

pub(super) const BOOKING_COLUMNS: &str = "id, room_id, check_in, check_out, guest_name, \
     guest_email, guest_phone, status, created_at, updated_at, deleted_at, deleted_by, \
     restored_at, restored_by";
