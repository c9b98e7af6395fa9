//! Pessimistic booking transactions.
//!
//! Every write follows the same shape: validate the request, fail fast on a
//! missing room, open a locking transaction, re-read the room and scan its
//! active bookings, evaluate the overlap predicate, write, commit. Transient store
//! failures rerun the whole transaction. Business conflicts never do.

use chrono::NaiveDate;

use crate::booking::{Booking, BookingChanges, BookingId, BookingStatus, GuestInfo, NewBooking};
use crate::error::{Error, Result, ValidationError};
use crate::events::{BookingEvent, EventKind};
use crate::interval::{find_conflict, LockScope, StayInterval};
use crate::retry::Deadline;
use crate::room::{RoomId, RoomStatus};
use crate::store::{BookingStore, BookingTxn};

use super::{run_locked, EngineContext};

/// Options for [`BookingCoordinator::create`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Create the booking already confirmed instead of pending.
    pub confirm: bool,
}

/// Creates and mutates bookings without ever letting two active bookings of
/// a room overlap.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use staylock::engine::CreateOptions;
/// use staylock::{BookingCoordinator, Database, DatabaseConfig, EngineContext, GuestInfo, RoomId};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/staylock.db")).unwrap();
/// let ctx = EngineContext::default();
/// let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
///
/// let booking = BookingCoordinator::new(&mut db, &ctx)
///     .create(
///         RoomId::from(1),
///         d(1),
///         d(5),
///         GuestInfo::new("Ada", "ada@example.com").unwrap(),
///         CreateOptions::default(),
///     )
///     .unwrap();
/// assert_eq!(booking.interval().nights(), 4);
/// ```
pub struct BookingCoordinator<'a, S: BookingStore + ?Sized> {
    store: &'a mut S,
    ctx: &'a EngineContext,
    deadline: Option<Deadline>,
}

impl<'a, S: BookingStore + ?Sized> BookingCoordinator<'a, S> {
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

    /// Reserves `[check_in, check_out)` in `room_id` for `guest`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInterval`] unless `check_out > check_in`
    /// - [`Error::NotFound`] if the room does not exist
    /// - [`Error::Validation`] if the room is inactive
    /// - [`Error::DoubleBookingConflict`] if an active booking overlaps
    /// - [`Error::RetryExhausted`] or [`Error::Timeout`] on persistent
    ///   contention
    pub fn create(
        &mut self,
        room_id: RoomId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guest: GuestInfo,
        options: CreateOptions,
    ) -> Result<Booking> {
        let interval = StayInterval::new(check_in, check_out)?;
        let mut request = NewBooking::new(room_id, interval, guest);
        if options.confirm {
            request = request.confirmed();
        }
        self.create_booking(&request)
    }

    /// Creates a booking from a prepared request.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create). A request whose initial status is
    /// cancelled is a validation error.
    pub fn create_booking(&mut self, request: &NewBooking) -> Result<Booking> {
        if !request.status.is_active() {
            return Err(ValidationError::new("status", "a new booking must be pending or confirmed").into());
        }
        self.require_room(request.room_id)?;

        let scope = LockScope::for_candidate(request.room_id, &request.interval, self.ctx.date_bucket);
        let clock = &self.ctx.clock;
        let booking = run_locked(self.store, self.ctx, self.deadline, |tx| {
            require_bookable_room(tx, request.room_id)?;
            let rows = tx.lock_candidates(&scope)?;
            if let Some(holder) = find_conflict(&request.interval, &rows, None) {
                return Err(Error::DoubleBookingConflict {
                    room_id: request.room_id,
                    interval: request.interval,
                    conflicting: Some(holder.id()),
                });
            }
            tx.insert_booking(request, clock.now())
        })?;

        log::info!(
            "booked room {} for {} as booking {}",
            booking.room_id(),
            booking.interval(),
            booking.id()
        );
        self.ctx.publish(event(EventKind::Created, &booking));
        Ok(booking)
    }

    /// Moves a booking to `[new_check_in, new_check_out)` and applies
    /// `changes`.
    ///
    /// The booking's own prior row never counts as a conflict.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInterval`] unless `new_check_out > new_check_in`
    /// - [`Error::NotFound`] if the booking does not exist
    /// - [`Error::BookingDeleted`] if it is soft-deleted
    /// - [`Error::Validation`] if it is cancelled
    /// - [`Error::DoubleBookingConflict`] if another active booking overlaps
    /// - [`Error::RetryExhausted`] or [`Error::Timeout`] on persistent
    ///   contention
    pub fn update(
        &mut self,
        booking_id: BookingId,
        new_check_in: NaiveDate,
        new_check_out: NaiveDate,
        changes: BookingChanges,
    ) -> Result<Booking> {
        let interval = StayInterval::new(new_check_in, new_check_out)?;
        let before = self.get(booking_id)?;

        let scope = LockScope::for_candidate(before.room_id(), &interval, self.ctx.date_bucket);
        let clock = &self.ctx.clock;
        let (previous, booking) = run_locked(self.store, self.ctx, self.deadline, |tx| {
            let current = require_mutable(tx, booking_id)?;
            if !current.status().is_active() {
                return Err(ValidationError::new(
                    "status",
                    format!("booking {booking_id} is {} and cannot be changed", current.status()),
                )
                .into());
            }

            let rows = tx.lock_candidates(&scope)?;
            if let Some(holder) = find_conflict(&interval, &rows, Some(booking_id)) {
                return Err(Error::DoubleBookingConflict {
                    room_id: current.room_id(),
                    interval,
                    conflicting: Some(holder.id()),
                });
            }

            let guest = changes.guest.as_ref().unwrap_or_else(|| current.guest());
            let updated = tx.update_booking(booking_id, &interval, guest, clock.now())?;
            Ok((*current.interval(), updated))
        })?;

        log::info!("booking {} moved from {previous} to {}", booking.id(), booking.interval());
        self.ctx.publish(event(EventKind::Updated, &booking));
        if previous != *booking.interval() {
            self.ctx.publish(BookingEvent {
                interval: previous,
                ..event(EventKind::Updated, &booking)
            });
        }
        Ok(booking)
    }

    /// Confirms a pending booking.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] or [`Error::BookingDeleted`]
    /// - [`Error::InvalidTransition`] unless the booking is pending
    pub fn confirm(&mut self, booking_id: BookingId) -> Result<Booking> {
        self.transition(booking_id, BookingStatus::Confirmed, EventKind::Confirmed)
    }

    /// Cancels a booking, releasing its nights.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] or [`Error::BookingDeleted`]
    /// - [`Error::InvalidTransition`] if the booking is already cancelled
    pub fn cancel(&mut self, booking_id: BookingId) -> Result<Booking> {
        self.transition(booking_id, BookingStatus::Cancelled, EventKind::Cancelled)
    }

    /// Sets the soft-delete marker. The row stays and can be restored.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `actor` is blank
    /// - [`Error::NotFound`] if the booking does not exist
    /// - [`Error::BookingDeleted`] if it is already soft-deleted
    pub fn soft_delete(&mut self, booking_id: BookingId, actor: &str) -> Result<Booking> {
        let actor = require_actor(actor)?;
        let clock = &self.ctx.clock;
        let booking = run_locked(self.store, self.ctx, self.deadline, |tx| {
            require_mutable(tx, booking_id)?;
            tx.mark_deleted(booking_id, actor, clock.now())
        })?;

        log::info!("booking {booking_id} deleted by {actor}");
        self.ctx.publish(event(EventKind::SoftDeleted, &booking));
        Ok(booking)
    }

    /// Removes a soft-deleted booking for good.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the booking does not exist
    /// - [`Error::NotSoftDeleted`] unless it was soft-deleted first
    pub fn hard_delete(&mut self, booking_id: BookingId) -> Result<()> {
        let booking = run_locked(self.store, self.ctx, self.deadline, |tx| {
            let current = require_booking(tx, booking_id)?;
            if !current.is_soft_deleted() {
                return Err(Error::NotSoftDeleted { booking_id });
            }
            tx.purge(booking_id)?;
            Ok(current)
        })?;

        log::info!("booking {booking_id} purged");
        self.ctx.publish(event(EventKind::Purged, &booking));
        Ok(())
    }

    /// Reads one booking, soft-deleted or not.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the booking does not exist.
    pub fn get(&self, booking_id: BookingId) -> Result<Booking> {
        self.store
            .find_booking(booking_id)?
            .ok_or_else(|| Error::not_found(format!("booking {booking_id}")))
    }

    /// Lists a room's bookings ordered by check-in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the room does not exist.
    pub fn list_for_room(&self, room_id: RoomId, include_deleted: bool) -> Result<Vec<Booking>> {
        if self.store.find_room(room_id)?.is_none() {
            return Err(Error::not_found(format!("room {room_id}")));
        }
        self.store.list_bookings_for_room(room_id, include_deleted)
    }

    fn transition(&mut self, booking_id: BookingId, to: BookingStatus, kind: EventKind) -> Result<Booking> {
        let clock = &self.ctx.clock;
        let booking = run_locked(self.store, self.ctx, self.deadline, |tx| {
            let current = require_mutable(tx, booking_id)?;
            let from = current.status();
            if !from.can_transition_to(to) {
                return Err(Error::InvalidTransition { booking_id, from, to });
            }
            tx.set_status(booking_id, to, clock.now())
        })?;

        log::info!("booking {booking_id} is now {to}");
        self.ctx.publish(event(kind, &booking));
        Ok(booking)
    }

    // Fails fast before taking the writer lock. The status that decides
    // the write is read again inside the transaction.
    fn require_room(&self, room_id: RoomId) -> Result<()> {
        self.store
            .find_room(room_id)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("room {room_id}")))
    }
}

fn require_bookable_room(tx: &mut dyn BookingTxn, room_id: RoomId) -> Result<()> {
    let room = tx
        .find_room(room_id)?
        .ok_or_else(|| Error::not_found(format!("room {room_id}")))?;
    if room.status() != RoomStatus::Active {
        return Err(ValidationError::new("room_id", format!("room {room_id} is {}", room.status())).into());
    }
    Ok(())
}

pub(super) fn event(kind: EventKind, booking: &Booking) -> BookingEvent {
    BookingEvent {
        kind,
        room_id: booking.room_id(),
        booking_id: booking.id(),
        interval: *booking.interval(),
    }
}

pub(super) fn require_booking(tx: &mut dyn BookingTxn, booking_id: BookingId) -> Result<Booking> {
    tx.find_booking(booking_id)?
        .ok_or_else(|| Error::not_found(format!("booking {booking_id}")))
}

fn require_mutable(tx: &mut dyn BookingTxn, booking_id: BookingId) -> Result<Booking> {
    let booking = require_booking(tx, booking_id)?;
    if booking.is_soft_deleted() {
        return Err(Error::BookingDeleted { booking_id });
    }
    Ok(booking)
}

pub(super) fn require_actor(actor: &str) -> Result<&str> {
    let actor = actor.trim();
    if actor.is_empty() {
        return Err(ValidationError::new("actor", "actor must be non-empty").into());
    }
    Ok(actor)
}
