#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # staylock
//!
//! A room reservation engine that stays correct under concurrent writers.
//!
//! The engine guards two invariants against racing clients:
//!
//! - No two active bookings of a room overlap (pessimistic locking inside a
//!   store transaction, plus a half-open interval check).
//! - No room update is silently lost (optimistic compare-and-swap on a
//!   monotonic `lock_version`).
//!
//! ## Core Types
//!
//! - [`StayInterval`] and [`overlaps`]: half-open date ranges
//! - [`Room`], [`RoomVersion`], [`Booking`], [`GuestInfo`]: domain records
//! - [`BookingCoordinator`], [`RoomVersionGuard`], [`RestoreCoordinator`]:
//!   the operations that mutate them
//! - [`TransactionErrorClassifier`] and [`RetryPolicy`]: transient failure
//!   handling
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use staylock::StayInterval;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
//! let a = StayInterval::new(day(1), day(5)).unwrap();
//! let b = StayInterval::new(day(5), day(10)).unwrap();
//! let c = StayInterval::new(day(4), day(6)).unwrap();
//!
//! // Same-day turnover is not an overlap.
//! assert!(!a.overlaps(&b));
//! assert!(a.overlaps(&c));
//! ```

pub mod booking;
pub mod clock;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod events;
pub mod interval;
pub mod logging;
pub mod output;
pub mod retry;
pub mod room;
pub mod store;

// Re-export key types at crate root for convenience
pub use booking::{Booking, BookingId, BookingStatus, GuestInfo, NewBooking};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use engine::{BookingCoordinator, EngineContext, RestoreCoordinator, RoomVersionGuard};
pub use error::{Error, ErrorCategory, Result, ValidationError};
pub use events::{BookingEvent, EventKind, EventSink};
pub use interval::{overlaps, DateBucket, LockScope, StayInterval};
pub use logging::{init_logger, LogLevel, Logger};
pub use retry::{Deadline, ErrorClass, RetryPolicy, TransactionErrorClassifier};
pub use room::{NewRoom, Room, RoomChanges, RoomId, RoomStatus, RoomVersion};
pub use store::{BookingStore, BookingTxn, RoomStore};
