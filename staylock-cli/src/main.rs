//! Main entry point for the staylock CLI.
//!
//! This is the command-line interface for the staylock reservation engine.
//! It provides commands for managing rooms and bookings:
//! - `room`: Create, inspect, update and delete rooms
//! - `book` / `rebook`: Create and move bookings
//! - `confirm` / `cancel`: Booking status changes
//! - `delete` / `restore` / `purge`: Soft delete lifecycle
//! - `show` / `list`: Inspect bookings

use clap::Parser;
use staylock_cli::cli::{Cli, Command};
use staylock_cli::utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    staylock::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
        deadline_ms: cli.deadline_ms,
        format: cli.format,
    };

    // Execute the command
    let result = match cli.command {
        Command::Init(cmd) => cmd.execute(&global),
        Command::Room(cmd) => cmd.execute(&global),
        Command::Book(cmd) => cmd.execute(&global),
        Command::Rebook(cmd) => cmd.execute(&global),
        Command::Confirm(cmd) => cmd.execute(&global),
        Command::Cancel(cmd) => cmd.execute(&global),
        Command::Delete(cmd) => cmd.execute(&global),
        Command::Restore(cmd) => cmd.execute(&global),
        Command::Purge(cmd) => cmd.execute(&global),
        Command::Show(cmd) => cmd.execute(&global),
        Command::List(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
