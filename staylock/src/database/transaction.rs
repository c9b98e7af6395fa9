//! The `SQLite` locking transaction.

use chrono::{DateTime, Utc};
use rusqlite::Transaction;

use crate::booking::{Booking, BookingId, BookingStatus, GuestInfo, NewBooking};
use crate::error::Result;
use crate::interval::{LockScope, StayInterval};
use crate::room::{Room, RoomId};
use crate::store::BookingTxn;

use super::{bookings, rooms};

/// A `BEGIN IMMEDIATE` transaction.
///
/// The writer lock is held from `begin_locked` until commit or drop, which
/// covers every room, so candidate rows cannot change under the overlap
/// check.
#[derive(Debug)]
pub struct SqliteTxn<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> SqliteTxn<'conn> {
    pub(super) const fn new(tx: Transaction<'conn>) -> Self {
        Self { tx }
    }
}

impl BookingTxn for SqliteTxn<'_> {
    fn lock_candidates(&mut self, scope: &LockScope) -> Result<Vec<Booking>> {
        bookings::lock_candidates(&self.tx, scope)
    }

    fn find_room(&mut self, id: RoomId) -> Result<Option<Room>> {
        rooms::find_room(&self.tx, id)
    }

    fn find_booking(&mut self, id: BookingId) -> Result<Option<Booking>> {
        bookings::find_booking(&self.tx, id)
    }

    fn insert_booking(&mut self, booking: &NewBooking, now: DateTime<Utc>) -> Result<Booking> {
        bookings::insert_booking(&self.tx, booking, now)
    }

    fn update_booking(
        &mut self,
        id: BookingId,
        interval: &StayInterval,
        guest: &GuestInfo,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        bookings::update_booking(&self.tx, id, interval, guest, now)
    }

    fn set_status(&mut self, id: BookingId, status: BookingStatus, now: DateTime<Utc>) -> Result<Booking> {
        bookings::set_status(&self.tx, id, status, now)
    }

    fn mark_deleted(&mut self, id: BookingId, actor: &str, now: DateTime<Utc>) -> Result<Booking> {
        bookings::mark_deleted(&self.tx, id, actor, now)
    }

    fn clear_deleted(&mut self, id: BookingId, actor: &str, now: DateTime<Utc>) -> Result<Booking> {
        bookings::clear_deleted(&self.tx, id, actor, now)
    }

    fn purge(&mut self, id: BookingId) -> Result<()> {
        bookings::purge(&self.tx, id)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}
