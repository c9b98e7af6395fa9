//! Show command implementation.

use crate::error::CliError;
use crate::utils::{print_output, GlobalOptions, Session};
use clap::Args;
use staylock::BookingId;

/// Show one booking, including deleted ones.
#[derive(Args)]
pub struct ShowCommand {
    /// Booking id
    pub id: i64,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut session = Session::open(global)?;
        let formatter = session.formatter();
        let booking = session.bookings().get(BookingId::from(self.id))?;
        print_output(&formatter.booking(&booking)?)
    }
}
