//! Persistence boundary consumed by the engine.
//!
//! The coordinators in [`crate::engine`] only talk to these traits. The
//! `SQLite` implementation lives in [`crate::database`]; tests substitute
//! their own to simulate contention.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::booking::{Booking, BookingId, BookingStatus, GuestInfo, NewBooking};
use crate::error::Result;
use crate::interval::{LockScope, StayInterval};
use crate::room::{NewRoom, Room, RoomChanges, RoomId, RoomVersion};

/// Room persistence with a single-statement compare-and-swap.
pub trait RoomStore {
    /// Inserts a room at the initial version.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_room(&mut self, room: &NewRoom, now: DateTime<Utc>) -> Result<Room>;

    /// Reads a room by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_room(&self, id: RoomId) -> Result<Option<Room>>;

    /// Lists every room ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_rooms(&self) -> Result<Vec<Room>>;

    /// Applies `changes` iff the stored version equals `expected`, advancing
    /// the version by one in the same statement.
    ///
    /// Returns `None` when no row matched: either the room is gone or its
    /// version moved on.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn compare_and_update_room(
        &mut self,
        id: RoomId,
        expected: RoomVersion,
        changes: &RoomChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Room>>;

    /// Deletes the room iff the stored version equals `expected` and no
    /// active booking references it. Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn compare_and_delete_room(&mut self, id: RoomId, expected: RoomVersion) -> Result<bool>;

    /// Counts pending or confirmed, non-deleted bookings of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn count_active_bookings(&self, id: RoomId) -> Result<u64>;
}

/// Booking persistence with exclusive locking transactions.
pub trait BookingStore: RoomStore {
    /// Returns how long the store currently waits for a lock.
    fn lock_wait(&self) -> Duration;

    /// Changes how long the store waits for a lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the setting.
    fn set_lock_wait(&mut self, wait: Duration) -> Result<()>;

    /// Opens a transaction holding the write lock for every room it touches.
    ///
    /// Dropping the returned transaction without committing rolls it back
    /// and releases the lock.
    ///
    /// # Errors
    ///
    /// Returns a lock timeout if the lock is not granted within
    /// [`lock_wait`](Self::lock_wait).
    fn begin_locked(&mut self) -> Result<Box<dyn BookingTxn + '_>>;

    /// Reads a booking outside any transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_booking(&self, id: BookingId) -> Result<Option<Booking>>;

    /// Lists the bookings of a room ordered by check-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_bookings_for_room(&self, room_id: RoomId, include_deleted: bool) -> Result<Vec<Booking>>;
}

/// An open locking transaction.
pub trait BookingTxn {
    /// Returns the active bookings in `scope`, locked until commit or drop.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn lock_candidates(&mut self, scope: &LockScope) -> Result<Vec<Booking>>;

    /// Reads a room inside the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_room(&mut self, id: RoomId) -> Result<Option<Room>>;

    /// Reads a booking inside the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_booking(&mut self, id: BookingId) -> Result<Option<Booking>>;

    /// Inserts a booking.
    ///
    /// # Errors
    ///
    /// Returns a double-booking conflict if the store's own overlap
    /// constraint rejects the row, or `NotFound` if the room is gone.
    fn insert_booking(&mut self, booking: &NewBooking, now: DateTime<Utc>) -> Result<Booking>;

    /// Replaces a booking's interval and guest.
    ///
    /// # Errors
    ///
    /// Returns a double-booking conflict if the store's own overlap
    /// constraint rejects the change.
    fn update_booking(
        &mut self,
        id: BookingId,
        interval: &StayInterval,
        guest: &GuestInfo,
        now: DateTime<Utc>,
    ) -> Result<Booking>;

    /// Sets a booking's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking is missing or the update fails.
    fn set_status(&mut self, id: BookingId, status: BookingStatus, now: DateTime<Utc>) -> Result<Booking>;

    /// Sets the soft-delete marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking is missing or the update fails.
    fn mark_deleted(&mut self, id: BookingId, actor: &str, now: DateTime<Utc>) -> Result<Booking>;

    /// Clears the soft-delete marker and records who restored the booking.
    ///
    /// # Errors
    ///
    /// Returns a double-booking conflict if the store's own overlap
    /// constraint rejects the restored row.
    fn clear_deleted(&mut self, id: BookingId, actor: &str, now: DateTime<Utc>) -> Result<Booking>;

    /// Removes a booking row permanently.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn purge(&mut self, id: BookingId) -> Result<()>;

    /// Commits and releases the lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails. The transaction is rolled back.
    fn commit(self: Box<Self>) -> Result<()>;
}
