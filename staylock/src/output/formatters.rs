//! Output formatter implementations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::booking::Booking;
use crate::room::Room;
use crate::{Error, Result};

use super::OutputFormatter;

/// Column headers for room tables.
const ROOM_HEADERS: [&str; 6] = ["id", "name", "price", "capacity", "status", "version"];

/// Column headers for booking tables.
const BOOKING_HEADERS: [&str; 8] = [
    "id",
    "room",
    "check_in",
    "check_out",
    "nights",
    "guest",
    "status",
    "deleted",
];

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn header_line(headers: &[&str]) -> String {
    headers
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t")
}

/// Formatter for tab-separated, human-readable tables.
pub struct TableFormatter;

impl TableFormatter {
    fn room_row(room: &Room) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            room.id(),
            room.name(),
            room.price(),
            room.capacity(),
            room.status(),
            room.version()
        )
    }

    fn booking_row(booking: &Booking) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            booking.id(),
            booking.room_id(),
            booking.interval().check_in(),
            booking.interval().check_out(),
            booking.interval().nights(),
            booking.guest().name(),
            booking.status(),
            booking.deleted_by().unwrap_or("-"),
        )
    }
}

impl OutputFormatter for TableFormatter {
    fn room(&self, room: &Room) -> Result<String> {
        Ok([
            format!("id:       {}", room.id()),
            format!("name:     {}", room.name()),
            format!("price:    {}", room.price()),
            format!("capacity: {}", room.capacity()),
            format!("status:   {}", room.status()),
            format!("version:  {}", room.version()),
            format!("updated:  {}", format_timestamp(room.updated_at())),
        ]
        .join("\n"))
    }

    fn rooms(&self, rooms: &[Room]) -> Result<String> {
        let mut lines = vec![header_line(&ROOM_HEADERS)];
        lines.extend(rooms.iter().map(Self::room_row));
        Ok(lines.join("\n"))
    }

    fn booking(&self, booking: &Booking) -> Result<String> {
        let mut lines = vec![
            format!("id:        {}", booking.id()),
            format!("room:      {}", booking.room_id()),
            format!("stay:      {}", booking.interval()),
            format!("nights:    {}", booking.interval().nights()),
            format!("guest:     {} <{}>", booking.guest().name(), booking.guest().email()),
        ];
        if let Some(phone) = booking.guest().phone() {
            lines.push(format!("phone:     {phone}"));
        }
        lines.push(format!("status:    {}", booking.status()));
        if let (Some(at), Some(by)) = (booking.deleted_at(), booking.deleted_by()) {
            lines.push(format!("deleted:   {} by {by}", format_timestamp(at)));
        }
        if let (Some(at), Some(by)) = (booking.restored_at(), booking.restored_by()) {
            lines.push(format!("restored:  {} by {by}", format_timestamp(at)));
        }
        lines.push(format!("updated:   {}", format_timestamp(booking.updated_at())));
        Ok(lines.join("\n"))
    }

    fn bookings(&self, bookings: &[Booking]) -> Result<String> {
        let mut lines = vec![header_line(&BOOKING_HEADERS)];
        lines.extend(bookings.iter().map(Self::booking_row));
        Ok(lines.join("\n"))
    }
}

/// Formatter for JSON output.
pub struct JsonFormatter;

impl JsonFormatter {
    fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        serde_json::to_string_pretty(value).map_err(|e| Error::Validation {
            field: "json_output".to_string(),
            message: format!("failed to serialize to JSON: {e}"),
        })
    }
}

impl OutputFormatter for JsonFormatter {
    fn room(&self, room: &Room) -> Result<String> {
        Self::to_json(room)
    }

    fn rooms(&self, rooms: &[Room]) -> Result<String> {
        Self::to_json(rooms)
    }

    fn booking(&self, booking: &Booking) -> Result<String> {
        Self::to_json(booking)
    }

    fn bookings(&self, bookings: &[Booking]) -> Result<String> {
        Self::to_json(bookings)
    }
}
