//! Booking statements shared by plain reads and locking transactions.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};

use crate::booking::{Booking, BookingId, BookingStatus, GuestInfo, NewBooking};
use crate::error::{Error, Result};
use crate::interval::{LockScope, StayInterval};
use crate::room::RoomId;
use crate::store::{BookingStore, BookingTxn};

use super::connection::Database;
use super::rows::{date_to_sql, row_to_booking, timestamp_to_sql};
use super::schema::{BOOKING_COLUMNS, OVERLAP_MARKER};
use super::transaction::SqliteTxn;

/// `SQLITE_CONSTRAINT_FOREIGNKEY`
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;

/// Translates constraint failures on a booking write into domain errors.
///
/// The overlap triggers become a double-booking conflict whose holder is
/// unknown. A dangling room reference means the room was deleted.
pub(super) fn map_write_error(err: rusqlite::Error, room_id: RoomId, interval: StayInterval) -> Error {
    if let rusqlite::Error::SqliteFailure(ref inner, ref message) = err {
        if inner.code == ErrorCode::ConstraintViolation {
            if message.as_deref().is_some_and(|m| m.contains(OVERLAP_MARKER)) {
                return Error::DoubleBookingConflict {
                    room_id,
                    interval,
                    conflicting: None,
                };
            }
            if inner.extended_code == SQLITE_CONSTRAINT_FOREIGNKEY {
                return Error::not_found(format!("room {room_id}"));
            }
        }
    }
    Error::Database(err)
}

pub(super) fn find_booking(conn: &Connection, id: BookingId) -> Result<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            [id.value()],
            row_to_booking,
        )
        .optional()?;
    Ok(booking)
}

pub(super) fn require_booking(conn: &Connection, id: BookingId) -> Result<Booking> {
    find_booking(conn, id)?.ok_or_else(|| Error::not_found(format!("booking {id}")))
}

pub(super) fn lock_candidates(conn: &Connection, scope: &LockScope) -> Result<Vec<Booking>> {
    let window = scope.window();
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE room_id = ?1
           AND status != 'cancelled'
           AND deleted_at IS NULL
           AND (?2 IS NULL OR (check_in < ?3 AND check_out > ?2))
         ORDER BY check_in, id"
    ))?;
    let rows = stmt
        .query_map(
            params![
                scope.room_id.value(),
                window.map(|w| date_to_sql(w.check_in())),
                window.map(|w| date_to_sql(w.check_out())),
            ],
            row_to_booking,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub(super) fn insert_booking(conn: &Connection, booking: &NewBooking, now: DateTime<Utc>) -> Result<Booking> {
    let now = timestamp_to_sql(now);
    conn.query_row(
        &format!(
            "INSERT INTO bookings
                 (room_id, check_in, check_out, guest_name, guest_email, guest_phone,
                  status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             RETURNING {BOOKING_COLUMNS}"
        ),
        params![
            booking.room_id.value(),
            date_to_sql(booking.interval.check_in()),
            date_to_sql(booking.interval.check_out()),
            booking.guest.name(),
            booking.guest.email(),
            booking.guest.phone(),
            booking.status.as_str(),
            now,
        ],
        row_to_booking,
    )
    .map_err(|e| map_write_error(e, booking.room_id, booking.interval))
}

pub(super) fn update_booking(
    conn: &Connection,
    id: BookingId,
    interval: &StayInterval,
    guest: &GuestInfo,
    now: DateTime<Utc>,
) -> Result<Booking> {
    let current = require_booking(conn, id)?;
    conn.query_row(
        &format!(
            "UPDATE bookings SET
                 check_in = ?2, check_out = ?3,
                 guest_name = ?4, guest_email = ?5, guest_phone = ?6,
                 updated_at = ?7
             WHERE id = ?1
             RETURNING {BOOKING_COLUMNS}"
        ),
        params![
            id.value(),
            date_to_sql(interval.check_in()),
            date_to_sql(interval.check_out()),
            guest.name(),
            guest.email(),
            guest.phone(),
            timestamp_to_sql(now),
        ],
        row_to_booking,
    )
    .map_err(|e| map_write_error(e, current.room_id(), *interval))
}

pub(super) fn set_status(
    conn: &Connection,
    id: BookingId,
    status: BookingStatus,
    now: DateTime<Utc>,
) -> Result<Booking> {
    let current = require_booking(conn, id)?;
    conn.query_row(
        &format!(
            "UPDATE bookings SET status = ?2, updated_at = ?3 WHERE id = ?1
             RETURNING {BOOKING_COLUMNS}"
        ),
        params![id.value(), status.as_str(), timestamp_to_sql(now)],
        row_to_booking,
    )
    .map_err(|e| map_write_error(e, current.room_id(), *current.interval()))
}

pub(super) fn mark_deleted(conn: &Connection, id: BookingId, actor: &str, now: DateTime<Utc>) -> Result<Booking> {
    let now = timestamp_to_sql(now);
    conn.query_row(
        &format!(
            "UPDATE bookings SET deleted_at = ?2, deleted_by = ?3, updated_at = ?2 WHERE id = ?1
             RETURNING {BOOKING_COLUMNS}"
        ),
        params![id.value(), now, actor],
        row_to_booking,
    )
    .optional()?
    .ok_or_else(|| Error::not_found(format!("booking {id}")))
}

pub(super) fn clear_deleted(conn: &Connection, id: BookingId, actor: &str, now: DateTime<Utc>) -> Result<Booking> {
    let current = require_booking(conn, id)?;
    let now = timestamp_to_sql(now);
    conn.query_row(
        &format!(
            "UPDATE bookings SET
                 deleted_at = NULL, deleted_by = NULL,
                 restored_at = ?2, restored_by = ?3, updated_at = ?2
             WHERE id = ?1
             RETURNING {BOOKING_COLUMNS}"
        ),
        params![id.value(), now, actor],
        row_to_booking,
    )
    .map_err(|e| map_write_error(e, current.room_id(), *current.interval()))
}

pub(super) fn purge(conn: &Connection, id: BookingId) -> Result<()> {
    let deleted = conn.execute("DELETE FROM bookings WHERE id = ?1", [id.value()])?;
    if deleted == 0 {
        return Err(Error::not_found(format!("booking {id}")));
    }
    Ok(())
}

impl BookingStore for Database {
    fn lock_wait(&self) -> Duration {
        self.lock_wait
    }

    fn set_lock_wait(&mut self, wait: Duration) -> Result<()> {
        self.conn.busy_timeout(wait)?;
        self.lock_wait = wait;
        Ok(())
    }

    fn begin_locked(&mut self) -> Result<Box<dyn BookingTxn + '_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(Box::new(SqliteTxn::new(tx)))
    }

    fn find_booking(&self, id: BookingId) -> Result<Option<Booking>> {
        find_booking(&self.conn, id)
    }

    fn list_bookings_for_room(&self, room_id: RoomId, include_deleted: bool) -> Result<Vec<Booking>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE room_id = ?1 AND (?2 OR deleted_at IS NULL)
             ORDER BY check_in, id"
        ))?;
        let rows = stmt
            .query_map(params![room_id.value(), include_deleted], row_to_booking)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
