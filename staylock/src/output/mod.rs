//! Output formatting for rooms and bookings.
//!
//! Two formats are provided: a tab-separated table for people and pretty
//! JSON for scripts. The CLI picks one from `--format` or the configured
//! `output_format`.

mod formatters;

use crate::booking::Booking;
use crate::config::OutputFormat;
use crate::room::Room;
use crate::Result;

pub use formatters::{JsonFormatter, TableFormatter};

/// Renders domain records as text.
pub trait OutputFormatter {
    /// Formats one room.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn room(&self, room: &Room) -> Result<String>;

    /// Formats a list of rooms.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn rooms(&self, rooms: &[Room]) -> Result<String>;

    /// Formats one booking.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn booking(&self, booking: &Booking) -> Result<String>;

    /// Formats a list of bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn bookings(&self, bookings: &[Booking]) -> Result<String>;
}

impl OutputFormat {
    /// Create a formatter for this output format.
    ///
    /// # Examples
    ///
    /// ```
    /// use staylock::config::OutputFormat;
    ///
    /// let formatter = OutputFormat::Json.create_formatter();
    /// assert_eq!(formatter.rooms(&[]).unwrap(), "[]");
    /// ```
    #[must_use]
    pub fn create_formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Table => Box::new(TableFormatter),
            Self::Json => Box::new(JsonFormatter),
        }
    }
}
