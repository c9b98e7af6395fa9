//! CLI command implementations.
//!
//! - `init`: Create the data directory and database
//! - `room`: Room create/show/list/update/delete with version checks
//! - `book`, `rebook`: Create and move bookings
//! - `confirm`, `cancel`: Status transitions
//! - `delete`, `restore`, `purge`: Soft delete lifecycle
//! - `show`, `list`: Inspect bookings
//! - `completions`: Shell completion scripts

pub mod book;
pub mod completions;
pub mod delete;
pub mod init;
pub mod list;
pub mod rebook;
pub mod room;
pub mod show;
pub mod status;

pub use book::BookCommand;
pub use completions::CompletionsCommand;
pub use delete::{DeleteCommand, PurgeCommand, RestoreCommand};
pub use init::InitCommand;
pub use list::ListCommand;
pub use rebook::RebookCommand;
pub use room::RoomCommand;
pub use show::ShowCommand;
pub use status::{CancelCommand, ConfirmCommand};
