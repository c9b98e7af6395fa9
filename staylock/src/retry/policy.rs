//! Bounded retry with jittered backoff and an optional caller deadline.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::RetryConfig;
use crate::error::{Error, Result};

use super::classifier::TransactionErrorClassifier;

/// A point in time after which the caller no longer wants an answer.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use staylock::Deadline;
///
/// let deadline = Deadline::after(Duration::from_secs(5));
/// assert!(!deadline.is_expired());
/// assert!(deadline.remaining() <= Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started: Instant,
    at: Instant,
}

impl Deadline {
    /// A deadline `budget` from now.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        let started = Instant::now();
        Self {
            started,
            at: started + budget,
        }
    }

    /// Time left, zero once expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Returns true once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Time since the deadline was set.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn timeout(&self) -> Error {
        Error::Timeout {
            elapsed: self.elapsed(),
        }
    }
}

/// How many times a transaction body may run and how backoff is spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            jitter_ratio: 0.25,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is raised to at least one and
    /// `jitter_ratio` is clamped into `[0, 1]`.
    #[must_use]
    pub fn new(max_attempts: u32, jitter_ratio: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            jitter_ratio: if jitter_ratio.is_finite() {
                jitter_ratio.clamp(0.0, 1.0)
            } else {
                0.0
            },
        }
    }

    /// Creates a policy from the `retry` configuration section.
    #[must_use]
    pub fn from_config(config: &RetryConfig) -> Self {
        let defaults = Self::default();
        Self::new(
            config.max_attempts.unwrap_or(defaults.max_attempts),
            config.jitter_ratio.unwrap_or(defaults.jitter_ratio),
        )
    }

    /// Returns the attempt budget.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `body` until it succeeds, fails for good, runs out of attempts or
    /// outlives `deadline`.
    ///
    /// `body` receives the 1-based attempt number and, when a deadline is
    /// set, the time remaining for it, which callers use to clamp lock waits.
    ///
    /// # Errors
    ///
    /// - The body's own error when the classifier says it is not retryable
    /// - [`Error::Timeout`] when the deadline passes before an attempt or a
    ///   backoff sleep
    /// - [`Error::RetryExhausted`] after `max_attempts` transient failures
    pub fn run<T, F>(
        &self,
        classifier: &TransactionErrorClassifier,
        deadline: Option<Deadline>,
        mut body: F,
    ) -> Result<T>
    where
        F: FnMut(u32, Option<Duration>) -> Result<T>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let remaining = match deadline {
                Some(d) if d.is_expired() => return Err(d.timeout()),
                Some(d) => Some(d.remaining()),
                None => None,
            };

            let err = match body(attempt, remaining) {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let classification = classifier.classify(&err);
            if !classification.retryable {
                return Err(err);
            }
            if let Some(d) = deadline.filter(Deadline::is_expired) {
                return Err(d.timeout());
            }
            if attempt >= self.max_attempts {
                log::warn!(
                    "giving up after {attempt} attempt(s): {}",
                    classification.class
                );
                return Err(Error::RetryExhausted {
                    attempts: attempt,
                    last: classification.class,
                });
            }

            let delay = self.jittered(classification.suggested_delay);
            if let Some(d) = deadline {
                if d.remaining() <= delay {
                    return Err(d.timeout());
                }
            }
            log::debug!(
                "attempt {attempt} hit {}; retrying in {}ms",
                classification.class,
                delay.as_millis()
            );
            std::thread::sleep(delay);
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter_ratio == 0.0 || delay.is_zero() {
            return delay;
        }
        let spread = rand::thread_rng().gen_range(-self.jitter_ratio..=self.jitter_ratio);
        delay.mul_f64((1.0 + spread).max(0.0))
    }
}
