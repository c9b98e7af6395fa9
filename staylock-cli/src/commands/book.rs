//! Book command implementation.
//!
//! This module implements the `book` command, which reserves a room for a
//! stay after checking that no active booking overlaps it.

use crate::error::CliError;
use crate::utils::{print_output, GlobalOptions, Session};
use chrono::NaiveDate;
use clap::Args;
use staylock::engine::CreateOptions;
use staylock::{GuestInfo, RoomId};

/// Book a room for a stay.
#[derive(Args)]
pub struct BookCommand {
    /// Room id
    #[arg(long)]
    pub room: i64,

    /// First night (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_in: NaiveDate,

    /// Departure day, not itself booked (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_out: NaiveDate,

    /// Guest name
    #[arg(long, value_name = "NAME")]
    pub guest_name: String,

    /// Guest email
    #[arg(long, value_name = "EMAIL")]
    pub guest_email: String,

    /// Guest phone
    #[arg(long, value_name = "PHONE")]
    pub guest_phone: Option<String>,

    /// Create the booking already confirmed
    #[arg(long)]
    pub confirm: bool,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut guest = GuestInfo::new(&self.guest_name, &self.guest_email).map_err(staylock::Error::from)?;
        if let Some(ref phone) = self.guest_phone {
            guest = guest.with_phone(phone);
        }

        let mut session = Session::open(global)?;
        let formatter = session.formatter();
        let booking = session.bookings().create(
            RoomId::from(self.room),
            self.check_in,
            self.check_out,
            guest,
            CreateOptions {
                confirm: self.confirm,
            },
        )?;

        print_output(&formatter.booking(&booking)?)
    }
}
