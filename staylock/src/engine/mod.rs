//! The concurrency-control engine.
//!
//! - [`BookingCoordinator`] creates and mutates bookings inside locking
//!   transactions, retrying transient failures.
//! - [`RoomVersionGuard`] updates and deletes rooms with a single
//!   compare-and-swap statement, never retrying.
//! - [`RestoreCoordinator`] brings soft-deleted bookings back after
//!   re-checking for overlaps.
//!
//! Every coordinator borrows a store and an [`EngineContext`] for the
//! duration of a call. Workers that run concurrently each hold their own
//! store (connection) and may share one context.

use std::num::NonZeroU32;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::events::{BookingEvent, EventSink, NullSink};
use crate::retry::{Deadline, RetryPolicy, TransactionErrorClassifier};
use crate::store::{BookingStore, BookingTxn};

pub mod booking;
pub mod restore;
pub mod room_guard;

pub use booking::{BookingCoordinator, CreateOptions};
pub use restore::RestoreCoordinator;
pub use room_guard::RoomVersionGuard;

/// Policies and collaborators shared by the coordinators.
#[derive(Clone)]
pub struct EngineContext {
    /// Attempt budget and jitter for transient failures.
    pub retry: RetryPolicy,
    /// Maps store errors to retry classes and delays.
    pub classifier: TransactionErrorClassifier,
    /// Width of the date bucket narrowing lock scans, if any.
    pub date_bucket: Option<NonZeroU32>,
    /// Whether an omitted room version may fall back to the caller's view.
    pub allow_implicit_version: bool,
    /// Source of audit timestamps.
    pub clock: Arc<dyn Clock>,
    /// Receives events after commit.
    pub events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("retry", &self.retry)
            .field("classifier", &self.classifier)
            .field("date_bucket", &self.date_bucket)
            .field("allow_implicit_version", &self.allow_implicit_version)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            classifier: TransactionErrorClassifier::default(),
            date_bucket: None,
            allow_implicit_version: false,
            clock: Arc::new(SystemClock),
            events: Arc::new(NullSink),
        }
    }
}

impl EngineContext {
    /// Builds a context from validated configuration, with the system clock
    /// and no event sink.
    ///
    /// # Examples
    ///
    /// ```
    /// use staylock::{Config, EngineContext};
    ///
    /// let ctx = EngineContext::from_config(&Config::default());
    /// assert_eq!(ctx.retry.max_attempts(), 3);
    /// assert!(!ctx.allow_implicit_version);
    /// ```
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: config
                .retry
                .as_ref()
                .map_or_else(RetryPolicy::default, RetryPolicy::from_config),
            classifier: config
                .backoff
                .as_ref()
                .map_or_else(TransactionErrorClassifier::default, TransactionErrorClassifier::from_config),
            date_bucket: config.date_bucket_days(),
            allow_implicit_version: config.allow_implicit_version(),
            ..Self::default()
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub(crate) fn publish(&self, event: BookingEvent) {
        log::debug!("publishing {:?} for booking {}", event.kind, event.booking_id);
        self.events.publish(&event);
    }
}

/// Runs `body` inside a locking transaction under the retry policy and
/// commits it.
///
/// Each attempt opens a fresh transaction, so a retry never sees state
/// from a rolled-back attempt. With a deadline the store's lock wait is
/// clamped to the time remaining and restored afterwards.
pub(crate) fn run_locked<S, T, F>(
    store: &mut S,
    ctx: &EngineContext,
    deadline: Option<Deadline>,
    mut body: F,
) -> Result<T>
where
    S: BookingStore + ?Sized,
    F: FnMut(&mut dyn BookingTxn) -> Result<T>,
{
    let configured = store.lock_wait();

    let result = ctx.retry.run(&ctx.classifier, deadline, |attempt, remaining| {
        if let Some(remaining) = remaining {
            store.set_lock_wait(configured.min(remaining))?;
        }
        if attempt > 1 {
            log::debug!("locking transaction attempt {attempt}");
        }
        let mut tx = store.begin_locked()?;
        let value = body(tx.as_mut())?;
        tx.commit()?;
        Ok(value)
    });

    let restored = if deadline.is_some() {
        store.set_lock_wait(configured)
    } else {
        Ok(())
    };
    let value = result?;
    restored?;
    Ok(value)
}
