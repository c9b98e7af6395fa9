//! Rebook command implementation.
//!
//! Moves an existing booking to new dates and optionally changes the guest.
//! The booking's own nights never count against the move.

use crate::error::CliError;
use crate::utils::{print_output, GlobalOptions, Session};
use chrono::NaiveDate;
use clap::Args;
use staylock::booking::BookingChanges;
use staylock::{BookingId, GuestInfo};

/// Move a booking to new dates or change its guest.
#[derive(Args)]
pub struct RebookCommand {
    /// Booking id
    pub id: i64,

    /// New first night (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_in: NaiveDate,

    /// New departure day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_out: NaiveDate,

    /// New guest name
    #[arg(long, value_name = "NAME")]
    pub guest_name: Option<String>,

    /// New guest email
    #[arg(long, value_name = "EMAIL")]
    pub guest_email: Option<String>,

    /// New guest phone (empty to clear)
    #[arg(long, value_name = "PHONE")]
    pub guest_phone: Option<String>,
}

impl RebookCommand {
    /// Execute the rebook command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let id = BookingId::from(self.id);
        let mut session = Session::open(global)?;
        let formatter = session.formatter();
        let mut bookings = session.bookings();

        let wants_guest_change =
            self.guest_name.is_some() || self.guest_email.is_some() || self.guest_phone.is_some();
        let changes = if wants_guest_change {
            let current = bookings.get(id)?;
            let name = self.guest_name.as_deref().unwrap_or(current.guest().name());
            let email = self.guest_email.as_deref().unwrap_or(current.guest().email());
            let mut guest = GuestInfo::new(name, email).map_err(staylock::Error::from)?;
            if let Some(phone) = self.guest_phone.as_deref().or(current.guest().phone()) {
                guest = guest.with_phone(phone);
            }
            BookingChanges { guest: Some(guest) }
        } else {
            BookingChanges::default()
        };

        let booking = bookings.update(id, self.check_in, self.check_out, changes)?;
        print_output(&formatter.booking(&booking)?)
    }
}
