//! Database schema management and migrations.

use rusqlite::{Connection, TransactionBehavior};

use crate::error::{Error, Result};

use super::schema::{
    CREATE_ACTIVE_BOOKINGS_INDEX, CREATE_BOOKINGS_TABLE, CREATE_METADATA_TABLE,
    CREATE_OVERLAP_INSERT_TRIGGER, CREATE_OVERLAP_UPDATE_TRIGGER, CREATE_ROOMS_TABLE,
    CURRENT_SCHEMA_VERSION, DROP_OVERLAP_TRIGGERS, INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// Every statement is idempotent, so a second process racing to initialize
/// the same file is harmless.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use staylock::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_ROOMS_TABLE, [])?;
    conn.execute(CREATE_BOOKINGS_TABLE, [])?;
    conn.execute(CREATE_ACTIVE_BOOKINGS_INDEX, [])?;
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;
    Ok(())
}

/// Installs or removes the overlap triggers.
///
/// # Errors
///
/// Returns an error if the DDL fails.
pub fn set_overlap_triggers(conn: &Connection, enabled: bool) -> Result<()> {
    if enabled {
        conn.execute(CREATE_OVERLAP_INSERT_TRIGGER, [])?;
        conn.execute(CREATE_OVERLAP_UPDATE_TRIGGER, [])?;
    } else {
        conn.execute_batch(DROP_OVERLAP_TRIGGERS)?;
    }
    Ok(())
}

/// Gets the current schema version from the database.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than a missing
/// metadata table or row, which both mean version 0.
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<u32>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => {
            // "no such table" surfaces as a generic SQLITE_ERROR
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Checks schema compatibility, initializes a fresh database and applies
/// the overlap trigger setting.
///
/// Runs under an immediate transaction so concurrent openers serialize.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] if the stored version differs
/// from the one this build understands, or any database error.
pub fn check_schema_compatibility(conn: &mut Connection, overlap_trigger: bool) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let version = get_schema_version(&tx)?;
    if version == 0 {
        log::debug!("initializing schema version {CURRENT_SCHEMA_VERSION}");
        initialize_schema(&tx)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }
    set_overlap_triggers(&tx, overlap_trigger)?;

    tx.commit()?;
    Ok(())
}
