//! Room commands.
//!
//! Updates and deletes carry the version the caller last saw (`--version`).
//! Leaving it out is only accepted when `rooms.allow_implicit_version` is
//! enabled, in which case the version just read is used.

use crate::error::CliError;
use crate::utils::{print_output, GlobalOptions, Session};
use clap::{Args, Subcommand};
use staylock::{NewRoom, RoomChanges, RoomId, RoomStatus, RoomVersion};

/// Manage rooms.
#[derive(Args)]
pub struct RoomCommand {
    #[command(subcommand)]
    pub action: RoomAction,
}

/// Room subcommands.
#[derive(Subcommand)]
pub enum RoomAction {
    /// Create a room
    Create(RoomCreateArgs),

    /// Show one room
    Show(RoomIdArgs),

    /// List every room
    List,

    /// Change a room if it is still at the given version
    Update(RoomUpdateArgs),

    /// Delete a room if it is still at the given version and has no active
    /// bookings
    Delete(RoomDeleteArgs),
}

/// Arguments for `room create`.
#[derive(Args)]
pub struct RoomCreateArgs {
    /// Room name
    #[arg(long)]
    pub name: String,

    /// Nightly price in minor currency units
    #[arg(long, default_value_t = 0)]
    pub price: i64,

    /// Number of guests the room holds
    #[arg(long, default_value_t = 1)]
    pub capacity: u32,

    /// Create the room out of service
    #[arg(long)]
    pub inactive: bool,
}

/// A room id argument.
#[derive(Args)]
pub struct RoomIdArgs {
    /// Room id
    pub id: i64,
}

/// Arguments for `room update`.
#[derive(Args)]
pub struct RoomUpdateArgs {
    /// Room id
    pub id: i64,

    /// Version the room was read at
    #[arg(long, value_name = "VERSION")]
    pub version: Option<u64>,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New nightly price
    #[arg(long)]
    pub price: Option<i64>,

    /// New capacity
    #[arg(long)]
    pub capacity: Option<u32>,

    /// New status (active or inactive)
    #[arg(long)]
    pub status: Option<RoomStatus>,
}

/// Arguments for `room delete`.
#[derive(Args)]
pub struct RoomDeleteArgs {
    /// Room id
    pub id: i64,

    /// Version the room was read at
    #[arg(long, value_name = "VERSION")]
    pub version: Option<u64>,
}

impl RoomCommand {
    /// Execute the room command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut session = Session::open(global)?;
        let formatter = session.formatter();

        match self.action {
            RoomAction::Create(args) => {
                let status = if args.inactive {
                    RoomStatus::Inactive
                } else {
                    RoomStatus::Active
                };
                let new_room = NewRoom::builder(args.name)
                    .price(args.price)
                    .capacity(args.capacity)
                    .status(status)
                    .build()
                    .map_err(staylock::Error::from)?;
                let room = session.rooms().create_room(&new_room)?;
                print_output(&formatter.room(&room)?)
            }
            RoomAction::Show(args) => {
                let room = session.rooms().get_room(RoomId::from(args.id))?;
                print_output(&formatter.room(&room)?)
            }
            RoomAction::List => {
                let rooms = session.rooms().list_rooms()?;
                print_output(&formatter.rooms(&rooms)?)
            }
            RoomAction::Update(args) => {
                let mut changes = RoomChanges::new();
                if let Some(name) = args.name {
                    changes = changes.name(name);
                }
                if let Some(price) = args.price {
                    changes = changes.price(price);
                }
                if let Some(capacity) = args.capacity {
                    changes = changes.capacity(capacity);
                }
                if let Some(status) = args.status {
                    changes = changes.status(status);
                }
                if changes.is_empty() {
                    return Err(CliError::InvalidArguments(
                        "nothing to update (use --name, --price, --capacity or --status)".to_string(),
                    ));
                }

                let mut guard = session.rooms();
                let view = guard.get_room(RoomId::from(args.id))?;
                let room = guard.update_from_view(&view, args.version.map(RoomVersion::from), changes)?;
                print_output(&formatter.room(&room)?)
            }
            RoomAction::Delete(args) => {
                let mut guard = session.rooms();
                let view = guard.get_room(RoomId::from(args.id))?;
                guard.delete_from_view(&view, args.version.map(RoomVersion::from))?;
                if !global.quiet {
                    println!("Deleted room {}", view.id());
                }
                Ok(())
            }
        }
    }
}
