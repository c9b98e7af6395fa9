//! Configuration validation.

use crate::config::schema::{BackoffConfig, Config, RetryConfig};
use crate::error::{Error, Result};

/// Upper bound on attempts per operation.
pub const MAX_RETRY_ATTEMPTS: u32 = 100;

/// Upper bound on any configured wait, one minute.
pub const MAX_WAIT_MS: u64 = 60_000;

/// Upper bound on the lock-scan bucket, roughly ten years.
pub const MAX_DATE_BUCKET_DAYS: u32 = 3660;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use staylock::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns validation errors for out-of-range values.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ms) = config.database.and_then(|d| d.busy_timeout_ms) {
            if ms == 0 {
                return Err(Self::invalid(
                    "database.busy_timeout_ms",
                    "Timeout must be greater than 0",
                ));
            }
            Self::validate_wait("database.busy_timeout_ms", ms)?;
        }

        if let Some(ref retry) = config.retry {
            Self::validate_retry(retry)?;
        }

        if let Some(ref backoff) = config.backoff {
            Self::validate_backoff(backoff)?;
        }

        if let Some(days) = config.lock.and_then(|l| l.date_bucket_days) {
            if days == 0 || days > MAX_DATE_BUCKET_DAYS {
                return Err(Self::invalid(
                    "lock.date_bucket_days",
                    format!("Must be between 1 and {MAX_DATE_BUCKET_DAYS}"),
                ));
            }
        }

        Ok(())
    }

    fn validate_retry(retry: &RetryConfig) -> Result<()> {
        if let Some(attempts) = retry.max_attempts {
            if attempts == 0 || attempts > MAX_RETRY_ATTEMPTS {
                return Err(Self::invalid(
                    "retry.max_attempts",
                    format!("Must be between 1 and {MAX_RETRY_ATTEMPTS}"),
                ));
            }
        }
        if let Some(ratio) = retry.jitter_ratio {
            if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
                return Err(Self::invalid(
                    "retry.jitter_ratio",
                    "Must be between 0.0 and 1.0",
                ));
            }
        }
        Ok(())
    }

    fn validate_backoff(backoff: &BackoffConfig) -> Result<()> {
        let fields = [
            ("backoff.serialization_failure_ms", backoff.serialization_failure_ms),
            ("backoff.deadlock_ms", backoff.deadlock_ms),
            ("backoff.lock_timeout_ms", backoff.lock_timeout_ms),
        ];
        for (field, value) in fields {
            if let Some(ms) = value {
                Self::validate_wait(field, ms)?;
            }
        }
        Ok(())
    }

    fn validate_wait(field: &str, ms: u64) -> Result<()> {
        if ms > MAX_WAIT_MS {
            return Err(Self::invalid(
                field,
                format!("Must not exceed {MAX_WAIT_MS}ms"),
            ));
        }
        Ok(())
    }

    fn invalid(field: &str, message: impl Into<String>) -> Error {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
