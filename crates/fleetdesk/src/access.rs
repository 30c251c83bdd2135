//! Which views need a session, and which roles may open them.

use std::fmt;

use crate::error::Error;
use crate::identity::Role;

/// Every role may work with ship records.
const SHIP_ROLES: &[Role] = &[Role::Admin, Role::Inspector, Role::Engineer];

/// A screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Credential entry.
    Login,
    /// Shown when the session's role is not allowed somewhere.
    Unauthorized,
    /// Fleet summary counts.
    Dashboard,
    /// The ship table with its add/edit/delete actions.
    ShipList,
    /// A single ship's profile.
    ShipDetail,
}

impl View {
    /// Whether the view is only shown to logged-in users.
    #[must_use]
    pub fn requires_session(self) -> bool {
        !matches!(self, Self::Login | Self::Unauthorized)
    }

    /// Roles allowed to open the view. `None` means any session will do.
    #[must_use]
    pub fn required_roles(self) -> Option<&'static [Role]> {
        match self {
            Self::ShipList | Self::ShipDetail => Some(SHIP_ROLES),
            Self::Login | Self::Unauthorized | Self::Dashboard => None,
        }
    }

    /// Resolve a route path. Unknown paths land on the dashboard.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/login" => Self::Login,
            "/unauthorized" => Self::Unauthorized,
            "/ships" => Self::ShipList,
            p if p.starts_with("/ships/") && p.len() > "/ships/".len() => Self::ShipDetail,
            _ => Self::Dashboard,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Unauthorized => "unauthorized",
            Self::Dashboard => "dashboard",
            Self::ShipList => "ships",
            Self::ShipDetail => "ship detail",
        };
        f.write_str(name)
    }
}

/// Outcome of checking a view against the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Show the view.
    Granted,
    /// Nobody is logged in.
    RedirectToLogin,
    /// Logged in, but with a role the view does not allow.
    RedirectToUnauthorized,
}

impl Access {
    /// Turn a denial into the matching error for `view`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] or [`Error::Unauthorized`] unless
    /// access was granted.
    pub fn require(self, view: View) -> Result<(), Error> {
        match self {
            Self::Granted => Ok(()),
            Self::RedirectToLogin => Err(Error::NotAuthenticated { view }),
            Self::RedirectToUnauthorized => Err(Error::Unauthorized { view }),
        }
    }
}
