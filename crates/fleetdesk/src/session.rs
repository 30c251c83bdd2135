//! Login state and its persistence.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::access::{Access, View};
use crate::error::Result;
use crate::identity::{Identity, IdentityDirectory, Role};
use crate::storage::{LocalStorage, SESSION_KEY};

/// The authenticated user of this process.
///
/// Persisted as the bare identity so the stored payload stays
/// `{"email","password","role"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    identity: Identity,
}

impl Session {
    /// Open a session for `identity`.
    #[must_use]
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// The logged-in identity.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The logged-in user's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.identity.role
    }

    /// The logged-in user's email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.identity.email
    }
}

/// Authenticates users against an [`IdentityDirectory`] and keeps at most one
/// [`Session`], mirrored under [`SESSION_KEY`] in `S`.
#[derive(Debug)]
pub struct SessionManager<S> {
    storage: S,
    directory: IdentityDirectory,
    current: Option<Session>,
}

impl<S: LocalStorage> SessionManager<S> {
    /// A manager over the seeded directory. Starts with no session; call
    /// [`restore`](Self::restore) to pick up a persisted one.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_directory(storage, IdentityDirectory::seeded())
    }

    /// A manager over a caller-supplied directory.
    #[must_use]
    pub fn with_directory(storage: S, directory: IdentityDirectory) -> Self {
        Self {
            storage,
            directory,
            current: None,
        }
    }

    /// Load the persisted session, if any.
    ///
    /// A missing, unreadable or malformed payload leaves no session; none of
    /// these are reported to the caller.
    pub fn restore(&mut self) -> Option<&Session> {
        self.current = match self.storage.get_item(SESSION_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Session>(&payload) {
                Ok(session) => {
                    debug!("Restored session for {}", session.email());
                    Some(session)
                }
                Err(e) => {
                    warn!("Ignoring malformed session payload: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read stored session: {e}");
                None
            }
        };
        self.current.as_ref()
    }

    /// Log in with an exact email/password match.
    ///
    /// Returns `Ok(false)` when no identity matches; the current session and
    /// the stored payload are left as they were.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted. The in-memory
    /// session is unchanged in that case.
    pub fn login(&mut self, email: &str, password: &str) -> Result<bool> {
        let Some(identity) = self.directory.authenticate(email, password) else {
            info!("Rejected login for {email}");
            return Ok(false);
        };

        let session = Session::new(identity.clone());
        self.storage
            .set_item(SESSION_KEY, &serde_json::to_string(&session)?)?;
        info!("Logged in {} as {}", session.email(), session.role());
        self.current = Some(session);
        Ok(true)
    }

    /// End the session and forget the stored payload. Safe to call when
    /// nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored payload cannot be removed.
    pub fn logout(&mut self) -> Result<()> {
        self.storage.remove_item(SESSION_KEY)?;
        if let Some(session) = self.current.take() {
            info!("Logged out {}", session.email());
        }
        Ok(())
    }

    /// The logged-in identity, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&Identity> {
        self.current.as_ref().map(Session::identity)
    }

    /// The current session, if any.
    #[must_use]
    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Whether the current session may proceed.
    ///
    /// Always `false` without a session. With `roles == None` any session
    /// passes; otherwise the session's role must be listed.
    #[must_use]
    pub fn is_authorized(&self, roles: Option<&[Role]>) -> bool {
        match (&self.current, roles) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(session), Some(roles)) => roles.contains(&session.role()),
        }
    }

    /// Decide whether `view` may be shown to the current session.
    #[must_use]
    pub fn guard(&self, view: View) -> Access {
        if !view.requires_session() {
            return Access::Granted;
        }
        if self.current.is_none() {
            return Access::RedirectToLogin;
        }
        if self.is_authorized(view.required_roles()) {
            Access::Granted
        } else {
            Access::RedirectToUnauthorized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FlakyStorage, MemoryStorage};

    fn restarted(storage: &MemoryStorage) -> SessionManager<&MemoryStorage> {
        let mut manager = SessionManager::new(storage);
        manager.restore();
        manager
    }

    #[test]
    fn test_starts_without_session() {
        let storage = MemoryStorage::new();
        let manager = SessionManager::new(&storage);
        assert!(manager.current_user().is_none());
        assert!(!manager.is_authorized(None));
    }

    #[test]
    fn test_login_success_sets_and_persists() {
        let storage = MemoryStorage::new();
        let mut manager = SessionManager::new(&storage);

        assert!(manager.login("inspector@entnt.in", "inspect123").unwrap());
        assert_eq!(manager.current_user().unwrap().role, Role::Inspector);
        assert_eq!(
            storage.get_item(SESSION_KEY).unwrap().as_deref(),
            Some(r#"{"email":"inspector@entnt.in","password":"inspect123","role":"Inspector"}"#)
        );
    }

    #[test]
    fn test_login_failure_leaves_no_session_and_no_write() {
        let storage = MemoryStorage::new();
        let mut manager = SessionManager::new(&storage);

        assert!(!manager.login("admin@entnt.in", "wrong").unwrap());
        assert!(manager.current_user().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_failed_login_keeps_existing_session() {
        let storage = MemoryStorage::new();
        let mut manager = SessionManager::new(&storage);
        manager.login("engineer@entnt.in", "engineer123").unwrap();

        assert!(!manager.login("admin@entnt.in", "nope").unwrap());
        assert_eq!(
            manager.current_user().map(|u| u.email.as_str()),
            Some("engineer@entnt.in")
        );
        assert!(restarted(&storage).current_user().is_some());
    }

    #[test]
    fn test_login_replaces_previous_session() {
        let storage = MemoryStorage::new();
        let mut manager = SessionManager::new(&storage);
        manager.login("engineer@entnt.in", "engineer123").unwrap();
        manager.login("admin@entnt.in", "admin123").unwrap();

        assert_eq!(manager.current_session().unwrap().role(), Role::Admin);
        assert_eq!(restarted(&storage).current_session().unwrap().role(), Role::Admin);
    }

    #[test]
    fn test_login_round_trips_across_restart() {
        let storage = MemoryStorage::new();
        let identity = {
            let mut manager = SessionManager::new(&storage);
            manager.login("admin@entnt.in", "admin123").unwrap();
            manager.current_user().cloned().unwrap()
        };

        let manager = restarted(&storage);
        assert_eq!(manager.current_user(), Some(&identity));
    }

    #[test]
    fn test_logout_then_restart_has_no_session() {
        let storage = MemoryStorage::new();
        let mut manager = SessionManager::new(&storage);
        manager.login("admin@entnt.in", "admin123").unwrap();
        manager.logout().unwrap();

        assert!(manager.current_user().is_none());
        assert!(storage.get_item(SESSION_KEY).unwrap().is_none());
        assert!(restarted(&storage).current_user().is_none());
    }

    #[test]
    fn test_logout_without_session_is_noop() {
        let storage = MemoryStorage::new();
        let mut manager = SessionManager::new(&storage);
        assert!(manager.logout().is_ok());
        assert!(manager.logout().is_ok());
        assert!(manager.current_user().is_none());
    }

    #[test]
    fn test_restore_with_missing_payload() {
        let storage = MemoryStorage::new();
        let mut manager = SessionManager::new(&storage);
        assert!(manager.restore().is_none());
    }

    #[test]
    fn test_restore_with_malformed_payload() {
        let storage = MemoryStorage::new();
        for payload in ["not json", "{}", "null", r#"{"email":"a","password":"b","role":"Captain"}"#] {
            storage.set_item(SESSION_KEY, payload).unwrap();
            let mut manager = SessionManager::new(&storage);
            assert!(manager.restore().is_none(), "payload {payload} restored");
        }
    }

    #[test]
    fn test_restore_clears_stale_in_memory_session() {
        let storage = MemoryStorage::new();
        let mut manager = SessionManager::new(&storage);
        manager.login("admin@entnt.in", "admin123").unwrap();
        storage.remove_item(SESSION_KEY).unwrap();

        assert!(manager.restore().is_none());
        assert!(manager.current_user().is_none());
    }

    #[test]
    fn test_is_authorized_with_all_roles() {
        let storage = MemoryStorage::new();
        let all = Role::ALL.as_slice();
        let mut manager = SessionManager::new(&storage);
        assert!(!manager.is_authorized(Some(all)));

        for (email, password) in [
            ("admin@entnt.in", "admin123"),
            ("inspector@entnt.in", "inspect123"),
            ("engineer@entnt.in", "engineer123"),
        ] {
            manager.login(email, password).unwrap();
            assert!(manager.is_authorized(Some(all)));
            assert!(manager.is_authorized(None));
        }
    }

    #[test]
    fn test_is_authorized_excludes_unlisted_role() {
        let storage = MemoryStorage::new();
        let mut manager = SessionManager::new(&storage);
        manager.login("engineer@entnt.in", "engineer123").unwrap();

        let none: [Role; 0] = [];
        assert!(!manager.is_authorized(Some(&[Role::Admin, Role::Inspector][..])));
        assert!(!manager.is_authorized(Some(&none[..])));
    }

    #[test]
    fn test_guard() {
        let storage = MemoryStorage::new();
        let directory = IdentityDirectory::from_identities(vec![Identity::new(
            "x@y.z",
            "pw",
            Role::Engineer,
        )]);
        let mut manager = SessionManager::with_directory(&storage, directory);

        assert_eq!(manager.guard(View::Login), Access::Granted);
        assert_eq!(manager.guard(View::Dashboard), Access::RedirectToLogin);
        assert_eq!(manager.guard(View::ShipList), Access::RedirectToLogin);

        manager.login("x@y.z", "pw").unwrap();
        assert_eq!(manager.guard(View::Dashboard), Access::Granted);
        assert_eq!(manager.guard(View::ShipDetail), Access::Granted);
    }

    #[test]
    fn test_login_write_failure_keeps_previous_state() {
        let storage = FlakyStorage::new();
        let mut manager = SessionManager::new(&storage);
        manager.login("engineer@entnt.in", "engineer123").unwrap();

        storage.set_failing(true);
        assert!(manager.login("admin@entnt.in", "admin123").is_err());
        assert_eq!(manager.current_session().unwrap().role(), Role::Engineer);

        let mut reopened = SessionManager::new(&storage);
        assert_eq!(reopened.restore().unwrap().role(), Role::Engineer);
    }

    #[test]
    fn test_logout_write_failure_keeps_session() {
        let storage = FlakyStorage::new();
        let mut manager = SessionManager::new(&storage);
        manager.login("admin@entnt.in", "admin123").unwrap();

        storage.set_failing(true);
        assert!(manager.logout().is_err());
        assert_eq!(
            manager.current_user().map(|u| u.email.as_str()),
            Some("admin@entnt.in")
        );
        let mut reopened = SessionManager::new(&storage);
        assert!(reopened.restore().is_some());

        storage.set_failing(false);
        manager.logout().unwrap();
        assert!(manager.current_user().is_none());
        assert!(storage.inner().is_empty());
    }

    #[test]
    fn test_session_serializes_as_identity() {
        let session = Session::new(Identity::new("a@b.c", "pw", Role::Admin));
        let json = serde_json::to_string(&session).unwrap();
        let identity: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(&identity, session.identity());
    }
}
