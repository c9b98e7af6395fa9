//! Conversions between stored text columns and domain values.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use crate::booking::{Booking, BookingId, GuestInfo};
use crate::interval::StayInterval;
use crate::room::{Room, RoomId, RoomVersion};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(super) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(super) fn timestamp_to_sql(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn date_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn optional_timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|text| {
        DateTime::parse_from_rfc3339(&text)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|e| conversion_error(idx, e))
    })
    .transpose()
}

/// Reads a room from a row laid out as `ROOM_COLUMNS`.
pub(super) fn row_to_room(row: &Row<'_>) -> rusqlite::Result<Room> {
    let status: String = row.get(4)?;
    Ok(Room {
        id: RoomId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
        price: row.get(2)?,
        capacity: row.get(3)?,
        status: status.parse().map_err(|e| conversion_error(4, e))?,
        version: RoomVersion::from_sql(row.get(5)?),
        created_at: timestamp_at(row, 6)?,
        updated_at: timestamp_at(row, 7)?,
    })
}

/// Reads a booking from a row laid out as `BOOKING_COLUMNS`.
pub(super) fn row_to_booking(row: &Row<'_>) -> rusqlite::Result<Booking> {
    let interval = StayInterval::new(date_at(row, 2)?, date_at(row, 3)?)
        .map_err(|e| conversion_error(3, e))?;
    let status: String = row.get(7)?;
    Ok(Booking {
        id: BookingId::from(row.get::<_, i64>(0)?),
        room_id: RoomId::from(row.get::<_, i64>(1)?),
        interval,
        guest: GuestInfo::from_parts(row.get(4)?, row.get(5)?, row.get(6)?),
        status: status.parse().map_err(|e| conversion_error(7, e))?,
        created_at: timestamp_at(row, 8)?,
        updated_at: timestamp_at(row, 9)?,
        deleted_at: optional_timestamp_at(row, 10)?,
        deleted_by: row.get(11)?,
        restored_at: optional_timestamp_at(row, 12)?,
        restored_by: row.get(13)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_text_sorts_like_dates() {
        let a = date_to_sql(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
        let b = date_to_sql(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert_eq!(a, "2025-09-30");
        assert!(a < b);
    }

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(timestamp_to_sql(at), "2025-01-02T03:04:05.000000Z");
    }
}
