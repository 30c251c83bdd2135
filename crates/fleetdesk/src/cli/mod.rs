//! Command-line interface for fleetdesk.
//!
//! This module provides the CLI structure for the `fleetdesk` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddShipArgs, ConfigCommand, DashboardCommand, LoginCommand, OutputFormat, ShipStatusArg,
    ShipsCommand, StatusCommand, UpdateShipArgs, WhoamiCommand,
};

/// fleetdesk - Manage a fleet of ships from the terminal
///
/// Log in as one of the demo users, then list, add, edit and delete ship
/// records. The session and the records persist between runs.
#[derive(Debug, Parser)]
#[command(name = "fleetdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (command output is still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in as a known user
    Login(LoginCommand),

    /// End the current session
    Logout,

    /// Show who is logged in
    Whoami(WhoamiCommand),

    /// Show fleet counts
    Dashboard(DashboardCommand),

    /// Manage ship records
    #[command(subcommand)]
    Ships(ShipsCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
