//! `SQLite` persistence for rooms and bookings.
//!
//! [`Database`] implements [`crate::store::RoomStore`] and
//! [`crate::store::BookingStore`]. Every write that depends on a prior read
//! either runs inside a `BEGIN IMMEDIATE` transaction or is a single
//! conditional statement.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::Utc;
//! use staylock::database::{Database, DatabaseConfig};
//! use staylock::{NewRoom, RoomStore};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/staylock.db")).unwrap();
//! let room = NewRoom::builder("Harbour View").capacity(2).build().unwrap();
//! let room = db.insert_room(&room, Utc::now()).unwrap();
//! println!("room {} at version {}", room.id(), room.version());
//! ```

mod bookings;
mod config;
mod connection;
pub mod migrations;
mod rooms;
mod rows;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
};
pub use connection::Database;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
pub use schema::CURRENT_SCHEMA_VERSION;
pub use transaction::SqliteTxn;
