//! Soft delete lifecycle commands: `delete`, `restore` and `purge`.

use crate::error::CliError;
use crate::utils::{default_actor, print_output, GlobalOptions, Session};
use clap::Args;
use staylock::BookingId;

/// Soft-delete a booking.
#[derive(Args)]
pub struct DeleteCommand {
    /// Booking id
    pub id: i64,

    /// Who is deleting the booking (default: $USER)
    #[arg(long, env = "STAYLOCK_ACTOR")]
    pub actor: Option<String>,
}

impl DeleteCommand {
    /// Execute the delete command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let actor = self.actor.unwrap_or_else(default_actor);
        let mut session = Session::open(global)?;
        let formatter = session.formatter();
        let booking = session.bookings().soft_delete(BookingId::from(self.id), &actor)?;
        print_output(&formatter.booking(&booking)?)
    }
}

/// Restore a soft-deleted booking.
#[derive(Args)]
pub struct RestoreCommand {
    /// Booking id
    pub id: i64,

    /// Who is restoring the booking (default: $USER)
    #[arg(long, env = "STAYLOCK_ACTOR")]
    pub actor: Option<String>,
}

impl RestoreCommand {
    /// Execute the restore command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let actor = self.actor.unwrap_or_else(default_actor);
        let mut session = Session::open(global)?;
        let formatter = session.formatter();
        let booking = session.restores().restore(BookingId::from(self.id), &actor)?;
        print_output(&formatter.booking(&booking)?)
    }
}

/// Permanently remove a soft-deleted booking.
#[derive(Args)]
pub struct PurgeCommand {
    /// Booking id
    pub id: i64,
}

impl PurgeCommand {
    /// Execute the purge command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let id = BookingId::from(self.id);
        let mut session = Session::open(global)?;
        session.bookings().hard_delete(id)?;
        if !global.quiet {
            println!("Purged booking {id}");
        }
        Ok(())
    }
}
