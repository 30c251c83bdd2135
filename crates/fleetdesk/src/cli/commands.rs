//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::DisplayFormat;
use crate::ship::{ShipFields, ShipPatch, ShipStatus};

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account email, matched exactly
    pub email: String,

    /// Account password, matched exactly
    pub password: String,
}

/// `whoami` command arguments.
#[derive(Debug, Args)]
pub struct WhoamiCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Ship record commands.
#[derive(Debug, Subcommand)]
pub enum ShipsCommand {
    /// List every ship in insertion order
    List {
        /// Output format (defaults to the configured one)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show one ship's profile
    Show {
        /// Ship id
        id: String,

        /// Output format (defaults to the configured one)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Add a ship
    Add(AddShipArgs),

    /// Edit a ship; only the given fields change
    Update(UpdateShipArgs),

    /// Delete a ship
    Delete {
        /// Ship id
        id: String,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for `ships add`.
#[derive(Debug, Args)]
pub struct AddShipArgs {
    /// Vessel name
    #[arg(long)]
    pub name: String,

    /// IMO number
    #[arg(long)]
    pub imo: String,

    /// Flag state
    #[arg(long)]
    pub flag: String,

    /// Operational status
    #[arg(long, value_enum)]
    pub status: ShipStatusArg,
}

impl From<AddShipArgs> for ShipFields {
    fn from(args: AddShipArgs) -> Self {
        Self {
            name: args.name,
            imo_number: args.imo,
            flag: args.flag,
            status: args.status.into(),
        }
    }
}

/// Arguments for `ships update`.
#[derive(Debug, Args)]
pub struct UpdateShipArgs {
    /// Ship id
    pub id: String,

    /// New vessel name
    #[arg(long)]
    pub name: Option<String>,

    /// New IMO number
    #[arg(long)]
    pub imo: Option<String>,

    /// New flag state
    #[arg(long)]
    pub flag: Option<String>,

    /// New operational status
    #[arg(long, value_enum)]
    pub status: Option<ShipStatusArg>,
}

impl UpdateShipArgs {
    /// The requested field changes.
    #[must_use]
    pub fn patch(&self) -> ShipPatch {
        ShipPatch {
            name: self.name.clone(),
            imo_number: self.imo.clone(),
            flag: self.flag.clone(),
            status: self.status.map(Into::into),
        }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Ship status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShipStatusArg {
    /// In service
    Active,
    /// Laid up
    Inactive,
    /// Under maintenance
    Maintenance,
}

impl From<ShipStatusArg> for ShipStatus {
    fn from(arg: ShipStatusArg) -> Self {
        match arg {
            ShipStatusArg::Active => Self::Active,
            ShipStatusArg::Inactive => Self::Inactive,
            ShipStatusArg::Maintenance => Self::Maintenance,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

impl From<DisplayFormat> for OutputFormat {
    fn from(format: DisplayFormat) -> Self {
        match format {
            DisplayFormat::Plain => Self::Plain,
            DisplayFormat::Table => Self::Table,
            DisplayFormat::Json => Self::Json,
        }
    }
}
