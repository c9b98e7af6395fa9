//! Mapping raw store errors onto retryable classes.

use std::time::Duration;

use rusqlite::ErrorCode;
use serde::Serialize;

use crate::config::BackoffConfig;
use crate::error::Error;

/// `SQLITE_BUSY_SNAPSHOT`: a WAL reader's snapshot went stale before it
/// could upgrade to a writer.
const SQLITE_BUSY_SNAPSHOT: i32 = 517;

/// Transient conditions a locking transaction can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The store could not serialize this transaction against another.
    SerializationFailure,
    /// The store broke a lock cycle by aborting this transaction.
    Deadlock,
    /// A lock could not be acquired within the wait budget.
    LockTimeout,
    /// Anything else. Never retried.
    Unclassified,
}

impl ErrorClass {
    /// Returns true for the classes worth another attempt.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SerializationFailure => "serialization failure",
            Self::Deadlock => "deadlock",
            Self::LockTimeout => "lock timeout",
            Self::Unclassified => "unclassified error",
        })
    }
}

/// Classifies a raw `SQLite` error code pair.
///
/// # Examples
///
/// ```
/// use rusqlite::ffi;
/// use staylock::retry::{classify_sqlite, ErrorClass};
///
/// assert_eq!(classify_sqlite(&ffi::Error::new(517)), ErrorClass::SerializationFailure);
/// assert_eq!(classify_sqlite(&ffi::Error::new(6)), ErrorClass::Deadlock);
/// assert_eq!(classify_sqlite(&ffi::Error::new(5)), ErrorClass::LockTimeout);
/// assert_eq!(classify_sqlite(&ffi::Error::new(19)), ErrorClass::Unclassified);
/// ```
#[must_use]
pub fn classify_sqlite(err: &rusqlite::ffi::Error) -> ErrorClass {
    if err.extended_code == SQLITE_BUSY_SNAPSHOT {
        return ErrorClass::SerializationFailure;
    }
    match err.code {
        ErrorCode::DatabaseLocked => ErrorClass::Deadlock,
        ErrorCode::DatabaseBusy => ErrorClass::LockTimeout,
        _ => ErrorClass::Unclassified,
    }
}

/// Classifies a SQLSTATE code as reported by server databases.
///
/// [`classify`] never reaches this: the bundled SQLite store reports
/// result codes, not SQLSTATEs. It gives a [`BookingStore`] over a server
/// database the same retry classes for its driver's errors.
///
/// [`BookingStore`]: crate::store::BookingStore
///
/// # Examples
///
/// ```
/// use staylock::retry::{classify_sqlstate, ErrorClass};
///
/// assert_eq!(classify_sqlstate("40001"), ErrorClass::SerializationFailure);
/// assert_eq!(classify_sqlstate("40P01"), ErrorClass::Deadlock);
/// assert_eq!(classify_sqlstate("55P03"), ErrorClass::LockTimeout);
/// assert_eq!(classify_sqlstate("23505"), ErrorClass::Unclassified);
/// ```
#[must_use]
pub fn classify_sqlstate(sqlstate: &str) -> ErrorClass {
    match sqlstate {
        "40001" => ErrorClass::SerializationFailure,
        "40P01" => ErrorClass::Deadlock,
        "55P03" => ErrorClass::LockTimeout,
        _ => ErrorClass::Unclassified,
    }
}

/// Classifies a library error. Only raw store failures can be transient.
#[must_use]
pub fn classify(err: &Error) -> ErrorClass {
    match err {
        Error::Database(rusqlite::Error::SqliteFailure(inner, _)) => classify_sqlite(inner),
        _ => ErrorClass::Unclassified,
    }
}

/// The outcome of classifying one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Which transient condition, if any.
    pub class: ErrorClass,
    /// Whether another attempt may succeed.
    pub retryable: bool,
    /// How long to back off before that attempt.
    pub suggested_delay: Duration,
}

/// Classifies failures and attaches the configured backoff for each class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionErrorClassifier {
    serialization_failure: Duration,
    deadlock: Duration,
    lock_timeout: Duration,
}

impl Default for TransactionErrorClassifier {
    fn default() -> Self {
        Self {
            serialization_failure: Duration::from_millis(20),
            deadlock: Duration::from_millis(1),
            lock_timeout: Duration::from_millis(150),
        }
    }
}

impl TransactionErrorClassifier {
    /// Creates a classifier with explicit delays per class.
    #[must_use]
    pub const fn new(serialization_failure: Duration, deadlock: Duration, lock_timeout: Duration) -> Self {
        Self {
            serialization_failure,
            deadlock,
            lock_timeout,
        }
    }

    /// Creates a classifier from the `backoff` configuration section.
    #[must_use]
    pub fn from_config(config: &BackoffConfig) -> Self {
        let defaults = Self::default();
        let ms = Duration::from_millis;
        Self {
            serialization_failure: config
                .serialization_failure_ms
                .map_or(defaults.serialization_failure, ms),
            deadlock: config.deadlock_ms.map_or(defaults.deadlock, ms),
            lock_timeout: config.lock_timeout_ms.map_or(defaults.lock_timeout, ms),
        }
    }

    /// Classifies `err`. The same error always yields the same answer.
    #[must_use]
    pub fn classify(&self, err: &Error) -> Classification {
        let class = classify(err);
        let suggested_delay = match class {
            ErrorClass::SerializationFailure => self.serialization_failure,
            ErrorClass::Deadlock => self.deadlock,
            ErrorClass::LockTimeout => self.lock_timeout,
            ErrorClass::Unclassified => Duration::ZERO,
        };
        Classification {
            class,
            retryable: class.is_retryable(),
            suggested_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn sqlite(extended: i32) -> Error {
        Error::Database(rusqlite::Error::SqliteFailure(ffi::Error::new(extended), None))
    }

    #[test]
    fn test_busy_family() {
        assert_eq!(classify(&sqlite(5)), ErrorClass::LockTimeout);
        // SQLITE_BUSY_RECOVERY, SQLITE_BUSY_TIMEOUT
        assert_eq!(classify(&sqlite(261)), ErrorClass::LockTimeout);
        assert_eq!(classify(&sqlite(773)), ErrorClass::LockTimeout);
        assert_eq!(classify(&sqlite(517)), ErrorClass::SerializationFailure);
    }

    #[test]
    fn test_sqlstate_matches_sqlite_classes() {
        assert_eq!(classify_sqlstate("40001"), classify_sqlite(&ffi::Error::new(517)));
        assert_eq!(classify_sqlstate("40P01"), classify_sqlite(&ffi::Error::new(6)));
        assert_eq!(classify_sqlstate("55P03"), classify_sqlite(&ffi::Error::new(5)));
        // Unique violation
        assert!(!classify_sqlstate("23505").is_retryable());
    }

    #[test]
    fn test_locked_family() {
        assert_eq!(classify(&sqlite(6)), ErrorClass::Deadlock);
        // SQLITE_LOCKED_SHAREDCACHE
        assert_eq!(classify(&sqlite(262)), ErrorClass::Deadlock);
    }

    #[test]
    fn test_constraint_is_not_transient() {
        // SQLITE_CONSTRAINT_TRIGGER
        assert_eq!(classify(&sqlite(1811)), ErrorClass::Unclassified);
        assert_eq!(
            classify(&Error::Database(rusqlite::Error::QueryReturnedNoRows)),
            ErrorClass::Unclassified
        );
    }

    #[test]
    fn test_business_errors_are_not_transient() {
        let err = Error::RetryExhausted {
            attempts: 3,
            last: ErrorClass::LockTimeout,
        };
        assert_eq!(classify(&err), ErrorClass::Unclassified);
    }

    #[test]
    fn test_default_delays() {
        let classifier = TransactionErrorClassifier::default();

        let c = classifier.classify(&sqlite(517));
        assert!(c.retryable);
        assert_eq!(c.suggested_delay, Duration::from_millis(20));

        let c = classifier.classify(&sqlite(6));
        assert_eq!(c.suggested_delay, Duration::from_millis(1));

        let c = classifier.classify(&sqlite(5));
        assert_eq!(c.suggested_delay, Duration::from_millis(150));

        let c = classifier.classify(&sqlite(19));
        assert!(!c.retryable);
        assert_eq!(c.suggested_delay, Duration::ZERO);
    }

    #[test]
    fn test_from_config_overrides() {
        let config = BackoffConfig {
            serialization_failure_ms: Some(5),
            deadlock_ms: None,
            lock_timeout_ms: Some(40),
        };
        let classifier = TransactionErrorClassifier::from_config(&config);
        assert_eq!(classifier.classify(&sqlite(517)).suggested_delay, Duration::from_millis(5));
        assert_eq!(classifier.classify(&sqlite(6)).suggested_delay, Duration::from_millis(1));
        assert_eq!(classifier.classify(&sqlite(5)).suggested_delay, Duration::from_millis(40));
    }

    #[test]
    fn test_classification_is_stable() {
        let classifier = TransactionErrorClassifier::default();
        let err = sqlite(517);
        assert_eq!(classifier.classify(&err), classifier.classify(&err));
    }
}
