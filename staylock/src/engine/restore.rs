//! Conflict-safe restore of soft-deleted bookings.
//!
//! While a booking is soft-deleted its nights are free, so another booking
//! may have taken them. Restore therefore runs the same locking transaction
//! as a create and re-checks the original interval before clearing the
//! marker.

use crate::booking::{Booking, BookingId};
use crate::error::{Error, Result};
use crate::events::EventKind;
use crate::interval::{find_conflict, LockScope};
use crate::retry::Deadline;
use crate::store::BookingStore;

use super::booking::{event, require_actor, require_booking};
use super::{run_locked, EngineContext};

/// Restores soft-deleted bookings.
pub struct RestoreCoordinator<'a, S: BookingStore + ?Sized> {
    store: &'a mut S,
    ctx: &'a EngineContext,
    deadline: Option<Deadline>,
}

impl<'a, S: BookingStore + ?Sized> RestoreCoordinator<'a, S> {
    /// Creates a coordinator over `store`.
    pub fn new(store: &'a mut S, ctx: &'a EngineContext) -> Self {
        Self {
            store,
            ctx,
            deadline: None,
        }
    }

    /// Bounds every following call by `deadline`.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Clears the soft-delete marker of `booking_id` and records `actor` as
    /// the restorer.
    ///
    /// The booking keeps its status. A cancelled booking holds no nights, so
    /// it comes back without an overlap check.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `actor` is blank
    /// - [`Error::NotFound`] if the booking does not exist
    /// - [`Error::NotSoftDeleted`] if it is not deleted
    /// - [`Error::RestoreConflict`] if an active booking now overlaps it
    /// - [`Error::RetryExhausted`] or [`Error::Timeout`] on persistent
    ///   contention
    pub fn restore(&mut self, booking_id: BookingId, actor: &str) -> Result<Booking> {
        let actor = require_actor(actor)?;
        let date_bucket = self.ctx.date_bucket;
        let clock = &self.ctx.clock;

        let booking = run_locked(self.store, self.ctx, self.deadline, |tx| {
            let current = require_booking(tx, booking_id)?;
            if !current.is_soft_deleted() {
                return Err(Error::NotSoftDeleted { booking_id });
            }
            let interval = *current.interval();

            if current.status().is_active() {
                let scope = LockScope::for_candidate(current.room_id(), &interval, date_bucket);
                let rows = tx.lock_candidates(&scope)?;
                if let Some(holder) = find_conflict(&interval, &rows, Some(booking_id)) {
                    return Err(Error::RestoreConflict {
                        booking_id,
                        interval,
                        conflicting: Some(holder.id()),
                    });
                }
            }

            tx.clear_deleted(booking_id, actor, clock.now())
                .map_err(|err| match err {
                    Error::DoubleBookingConflict { conflicting, .. } => Error::RestoreConflict {
                        booking_id,
                        interval,
                        conflicting,
                    },
                    other => other,
                })
        })?;

        log::info!("booking {booking_id} restored by {actor}");
        self.ctx.publish(event(EventKind::Restored, &booking));
        Ok(booking)
    }
}
