//! Error types for fleetdesk.
//!
//! This module defines all error types used throughout the fleetdesk crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::access::View;

/// The main error type for fleetdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Session Errors ===
    /// The supplied email/password pair matched no known identity.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A view that needs a session was requested without one.
    #[error("not logged in: please log in to view the {view} page")]
    NotAuthenticated {
        /// The view that was requested.
        view: View,
    },

    /// The current session's role may not open the requested view.
    #[error("Unauthorized - You do not have permission to view this page.")]
    Unauthorized {
        /// The view that was requested.
        view: View,
    },

    // === Record Errors ===
    /// No ship record carries the given id.
    #[error("Ship not found: {id}")]
    ShipNotFound {
        /// The id that was looked up.
        id: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for fleetdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a ship-not-found error.
    #[must_use]
    pub fn ship_not_found(id: impl Into<String>) -> Self {
        Self::ShipNotFound { id: id.into() }
    }

    /// Check if this error comes from the login/authorization gate.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::NotAuthenticated { .. } | Self::Unauthorized { .. }
        )
    }

    /// Check if this error refers to a missing ship record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ShipNotFound { .. })
    }

    /// Process exit status for this error: 2 for login and permission
    /// failures, 3 for a missing ship, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_auth_error() {
            2
        } else if self.is_not_found() {
            3
        } else {
            1
        }
    }
}
