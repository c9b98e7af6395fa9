//! Booking status commands: `confirm` and `cancel`.

use crate::error::CliError;
use crate::utils::{print_output, GlobalOptions, Session};
use clap::Args;
use staylock::BookingId;

/// Confirm a pending booking.
#[derive(Args)]
pub struct ConfirmCommand {
    /// Booking id
    pub id: i64,
}

impl ConfirmCommand {
    /// Execute the confirm command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut session = Session::open(global)?;
        let formatter = session.formatter();
        let booking = session.bookings().confirm(BookingId::from(self.id))?;
        print_output(&formatter.booking(&booking)?)
    }
}

/// Cancel a booking.
#[derive(Args)]
pub struct CancelCommand {
    /// Booking id
    pub id: i64,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut session = Session::open(global)?;
        let formatter = session.formatter();
        let booking = session.bookings().cancel(BookingId::from(self.id))?;
        print_output(&formatter.booking(&booking)?)
    }
}
