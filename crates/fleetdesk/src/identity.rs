//! Known users and their roles.
//!
//! fleetdesk has no user management: a fixed directory of three identities
//! is seeded at startup and login matches against it verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a logged-in user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Fleet administrator.
    Admin,
    /// Ship inspector.
    Inspector,
    /// Maintenance engineer.
    Engineer,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Inspector, Role::Engineer];

    /// The role's canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Inspector => "Inspector",
            Self::Engineer => "Engineer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

/// A user that can log in.
///
/// Serialized as `{"email", "password", "role"}`, the shape stored under
/// the session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Login name.
    pub email: String,
    /// Plain-text password. The directory is demo data, not a credential store.
    pub password: String,
    /// The user's role.
    pub role: Role,
}

impl Identity {
    /// Build an identity from borrowed parts.
    #[must_use]
    pub fn new(email: &str, password: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            role,
        }
    }

    /// Exact, case-sensitive comparison of both credentials.
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

const SEED: [(&str, &str, Role); 3] = [
    ("admin@entnt.in", "admin123", Role::Admin),
    ("inspector@entnt.in", "inspect123", Role::Inspector),
    ("engineer@entnt.in", "engineer123", Role::Engineer),
];

/// The fixed list of identities login is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityDirectory {
    identities: Vec<Identity>,
}

impl IdentityDirectory {
    /// The three built-in demo users.
    #[must_use]
    pub fn seeded() -> Self {
        Self::from_identities(
            SEED.iter()
                .map(|(email, password, role)| Identity::new(email, password, *role))
                .collect(),
        )
    }

    /// A directory over an arbitrary list, mainly for tests.
    #[must_use]
    pub fn from_identities(identities: Vec<Identity>) -> Self {
        Self { identities }
    }

    /// Find the first identity whose email and password both match exactly.
    #[must_use]
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&Identity> {
        self.identities.iter().find(|id| id.matches(email, password))
    }

    /// All identities in seed order.
    #[must_use]
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }
}

impl Default for IdentityDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_directory_has_three_roles() {
        let directory = IdentityDirectory::seeded();
        let roles: Vec<Role> = directory.identities().iter().map(|i| i.role).collect();
        assert_eq!(roles, Role::ALL.to_vec());
    }

    #[test]
    fn test_authenticate_each_seeded_user() {
        let directory = IdentityDirectory::seeded();
        for (email, password, role) in SEED {
            let found = directory.authenticate(email, password).unwrap();
            assert_eq!(found.email, email);
            assert_eq!(found.role, role);
        }
    }

    #[test]
    fn test_authenticate_is_case_sensitive() {
        let directory = IdentityDirectory::seeded();
        assert!(directory.authenticate("Admin@entnt.in", "admin123").is_none());
        assert!(directory.authenticate("admin@entnt.in", "ADMIN123").is_none());
    }

    #[test]
    fn test_authenticate_does_not_trim() {
        let directory = IdentityDirectory::seeded();
        assert!(directory.authenticate(" admin@entnt.in", "admin123").is_none());
        assert!(directory.authenticate("admin@entnt.in", "admin123 ").is_none());
    }

    #[test]
    fn test_authenticate_rejects_crossed_credentials() {
        let directory = IdentityDirectory::seeded();
        assert!(directory
            .authenticate("admin@entnt.in", "inspect123")
            .is_none());
        assert!(directory.authenticate("", "").is_none());
    }

    #[test]
    fn test_custom_directory() {
        let directory =
            IdentityDirectory::from_identities(vec![Identity::new("a@b.c", "pw", Role::Engineer)]);
        assert_eq!(
            directory.authenticate("a@b.c", "pw").map(|i| i.role),
            Some(Role::Engineer)
        );
        assert!(directory.authenticate("admin@entnt.in", "admin123").is_none());
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_identity_json_shape() {
        let identity = Identity::new("admin@entnt.in", "admin123", Role::Admin);
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(
            json,
            r#"{"email":"admin@entnt.in","password":"admin123","role":"Admin"}"#
        );
    }
}
