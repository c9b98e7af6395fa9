//! Error types for the staylock library.
//!
//! Every failure the engine can report is a variant of [`Error`]. Business
//! conflicts, request errors and transient store failures stay distinct all
//! the way to the caller so that an outer layer can map them to the right
//! user-facing status without inspecting message text.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

use crate::booking::{BookingId, BookingStatus};
use crate::interval::StayInterval;
use crate::retry::ErrorClass;
use crate::room::{RoomId, RoomVersion};

/// Result type alias for operations that may fail with a staylock error.
///
/// # Examples
///
/// ```
/// use staylock::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the staylock library.
#[derive(Debug, Error)]
pub enum Error {
    /// An active booking already occupies part of the requested interval.
    #[error("room {room_id} is already booked during {interval}{}", conflict_suffix(*.conflicting))]
    DoubleBookingConflict {
        /// The room that was requested.
        room_id: RoomId,
        /// The interval that was requested.
        interval: StayInterval,
        /// The booking that holds the interval, when the engine found it.
        /// `None` when the store's own overlap constraint fired.
        conflicting: Option<BookingId>,
    },

    /// A room was modified since the caller last read it.
    #[error("room {room_id} was modified concurrently: expected version {expected}, found {actual}")]
    OptimisticLockConflict {
        /// The room being modified.
        room_id: RoomId,
        /// The version the caller submitted.
        expected: RoomVersion,
        /// The version currently stored.
        actual: RoomVersion,
    },

    /// A soft-deleted booking cannot come back because its interval is taken.
    #[error("cannot restore booking {booking_id}: {interval} is now occupied{}", conflict_suffix(*.conflicting))]
    RestoreConflict {
        /// The booking being restored.
        booking_id: BookingId,
        /// The booking's original interval.
        interval: StayInterval,
        /// The booking that now holds the interval, when known.
        conflicting: Option<BookingId>,
    },

    /// A room still has active bookings and cannot be deleted.
    #[error("room {room_id} still has {active_bookings} active booking(s)")]
    RoomInUse {
        /// The room that was to be deleted.
        room_id: RoomId,
        /// Number of active bookings referencing it.
        active_bookings: u64,
    },

    /// Transient store failures persisted through every allowed attempt.
    #[error("gave up after {attempts} attempt(s): last failure was {last}")]
    RetryExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Classification of the final failure.
        last: ErrorClass,
    },

    /// The caller's deadline elapsed before the operation could finish.
    #[error("operation timed out after {}ms", elapsed.as_millis())]
    Timeout {
        /// Time spent before giving up.
        elapsed: Duration,
    },

    /// Check-out is not strictly after check-in.
    #[error("invalid stay: check-out {check_out} must be after check-in {check_in}")]
    InvalidInterval {
        /// The requested check-in date.
        check_in: NaiveDate,
        /// The requested check-out date.
        check_out: NaiveDate,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A booking status change that the lifecycle does not allow.
    #[error("booking {booking_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The booking.
        booking_id: BookingId,
        /// Its current status.
        from: BookingStatus,
        /// The requested status.
        to: BookingStatus,
    },

    /// The booking is soft-deleted and must be restored first.
    #[error("booking {booking_id} is deleted")]
    BookingDeleted {
        /// The deleted booking.
        booking_id: BookingId,
    },

    /// Only soft-deleted bookings can be restored or purged.
    #[error("booking {booking_id} is not deleted")]
    NotSoftDeleted {
        /// The booking.
        booking_id: BookingId,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

fn conflict_suffix(conflicting: Option<BookingId>) -> String {
    conflicting.map_or_else(String::new, |id| format!(" (booking {id})"))
}

/// Broad families of [`Error`], for callers that map failures to statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A real business conflict. Retrying the same request will fail again.
    Conflict,
    /// Transient store contention that outlasted the retry budget.
    Transient,
    /// The caller's deadline elapsed.
    Timeout,
    /// The request itself is malformed or names a missing entity.
    Request,
    /// Anything else: storage, configuration, I/O.
    Internal,
}

impl Error {
    /// Returns the family this error belongs to.
    ///
    /// # Examples
    ///
    /// ```
    /// use staylock::{Error, ErrorCategory, RoomId, RoomVersion};
    ///
    /// let err = Error::OptimisticLockConflict {
    ///     room_id: RoomId::from(1),
    ///     expected: RoomVersion::from(5),
    ///     actual: RoomVersion::from(6),
    /// };
    /// assert_eq!(err.category(), ErrorCategory::Conflict);
    /// ```
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DoubleBookingConflict { .. }
            | Self::OptimisticLockConflict { .. }
            | Self::RestoreConflict { .. }
            | Self::RoomInUse { .. } => ErrorCategory::Conflict,
            Self::RetryExhausted { .. } => ErrorCategory::Transient,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::InvalidInterval { .. }
            | Self::Validation { .. }
            | Self::NotFound { .. }
            | Self::InvalidTransition { .. }
            | Self::BookingDeleted { .. }
            | Self::NotSoftDeleted { .. } => ErrorCategory::Request,
            Self::Database(_) if self.class() != ErrorClass::Unclassified => {
                ErrorCategory::Transient
            }
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Io(_)
            | Self::DataDirectoryNotFound { .. }
            | Self::DatabaseCorruption { .. }
            | Self::UnsupportedSchemaVersion { .. } => ErrorCategory::Internal,
        }
    }

    /// Classifies this error as a transient store condition, if it is one.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        crate::retry::classifier::classify(self)
    }

    /// Check if this is a business conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.category() == ErrorCategory::Conflict
    }

    /// Check if this error was caused by the request rather than the system.
    #[must_use]
    pub fn is_request_error(&self) -> bool {
        self.category() == ErrorCategory::Request
    }

    pub(crate) fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }
}

/// Error type for field validation failures in domain builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<crate::interval::InvalidIntervalError> for Error {
    fn from(err: crate::interval::InvalidIntervalError) -> Self {
        match err {
            crate::interval::InvalidIntervalError::Reversed { check_in, check_out } => {
                Self::InvalidInterval { check_in, check_out }
            }
            crate::interval::InvalidIntervalError::OutOfRange { field, .. } => Self::Validation {
                field: field.to_string(),
                message: err.to_string(),
            },
        }
    }
}
