//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    BookCommand, CancelCommand, CompletionsCommand, ConfirmCommand, DeleteCommand, InitCommand,
    ListCommand, PurgeCommand, RebookCommand, RestoreCommand, RoomCommand, ShowCommand,
};
use clap::{Parser, Subcommand};
use staylock::config::OutputFormat;
use std::path::PathBuf;

/// Command-line tool for concurrency-safe room reservations.
#[derive(Parser)]
#[command(name = "staylock")]
#[command(version, about = "Manage room reservations without double bookings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "STAYLOCK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override how long a writer waits for the lock (in milliseconds)
    #[arg(long, value_name = "MS", global = true)]
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization
    #[arg(long, global = true)]
    pub disable_autoinit: bool,

    /// Give up after this many milliseconds, including retries
    #[arg(long, value_name = "MS", global = true)]
    pub deadline_ms: Option<u64>,

    /// Output format (table or json)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Manage rooms
    Room(RoomCommand),

    /// Book a room for a stay
    Book(BookCommand),

    /// Move a booking to new dates or change its guest
    Rebook(RebookCommand),

    /// Confirm a pending booking
    Confirm(ConfirmCommand),

    /// Cancel a booking
    Cancel(CancelCommand),

    /// Soft-delete a booking
    Delete(DeleteCommand),

    /// Restore a soft-deleted booking
    Restore(RestoreCommand),

    /// Permanently remove a soft-deleted booking
    Purge(PurgeCommand),

    /// Show one booking
    Show(ShowCommand),

    /// List bookings
    List(ListCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
