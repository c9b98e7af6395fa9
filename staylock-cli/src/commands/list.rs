//! List command implementation.
//!
//! This module implements the `list` command, which displays bookings of
//! one room or of every room as a table or JSON.

use crate::error::CliError;
use crate::utils::{print_output, GlobalOptions, Session};
use clap::Args;
use staylock::{BookingStatus, RoomId};

/// List bookings.
#[derive(Args)]
pub struct ListCommand {
    /// Only this room
    #[arg(long, value_name = "ROOM")]
    pub room: Option<i64>,

    /// Include soft-deleted bookings
    #[arg(long)]
    pub include_deleted: bool,

    /// Filter by status (pending, confirmed or cancelled)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<BookingStatus>,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut session = Session::open(global)?;
        let formatter = session.formatter();

        let room_ids = match self.room {
            Some(id) => vec![RoomId::from(id)],
            None => session.rooms().list_rooms()?.iter().map(|room| room.id()).collect(),
        };

        let coordinator = session.bookings();
        let mut bookings = Vec::new();
        for room_id in room_ids {
            bookings.extend(coordinator.list_for_room(room_id, self.include_deleted)?);
        }

        if let Some(status) = self.status {
            bookings.retain(|b| b.status() == status);
        }

        print_output(&formatter.bookings(&bookings)?)
    }
}
