//! Build script for staylock-cli.
//!
//! This script generates the man page at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is declared here a second time.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep this structure synchronized with src/cli.rs.
fn build_cli() -> Command {
    Command::new("staylock")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage room reservations without double bookings")
        .long_about(
            "Concurrency-safe room reservations: overlapping stays are rejected under \
             concurrent writers and room updates are guarded by version checks",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("STAYLOCK_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override how long a writer waits for the lock (in milliseconds)")
                .value_name("MS")
                .global(true),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("deadline-ms")
                .long("deadline-ms")
                .help("Give up after this many milliseconds, including retries")
                .value_name("MS")
                .global(true),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format (table or json)")
                .value_name("FORMAT")
                .global(true),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Create the staylock database and, optionally, a default configuration file"),
            Command::new("room")
                .about("Manage rooms")
                .long_about("Create, show, list, update and delete rooms; updates and deletes are version-checked"),
            Command::new("book")
                .about("Book a room for a stay")
                .long_about("Reserve [check-in, check-out) in a room unless an active booking overlaps it"),
            Command::new("rebook")
                .about("Move a booking to new dates or change its guest"),
            Command::new("confirm").about("Confirm a pending booking"),
            Command::new("cancel").about("Cancel a booking"),
            Command::new("delete").about("Soft-delete a booking"),
            Command::new("restore")
                .about("Restore a soft-deleted booking")
                .long_about("Restore a soft-deleted booking unless another booking has taken its nights"),
            Command::new("purge").about("Permanently remove a soft-deleted booking"),
            Command::new("show").about("Show one booking"),
            Command::new("list").about("List bookings"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR is not set")
    })?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    fs::write(man_dir.join("staylock.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
