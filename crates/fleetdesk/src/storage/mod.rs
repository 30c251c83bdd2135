//! Storage layer for fleetdesk.
//!
//! Both the session and the ship collection persist through a small
//! string-keyed, string-valued store modeled on browser local storage. The
//! [`LocalStorage`] trait is the seam; [`SqliteStorage`] is the durable
//! backend and [`MemoryStorage`] the in-process one used by tests.

#[cfg(test)]
pub(crate) mod flaky;
pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::rc::Rc;

use crate::error::Result;

#[cfg(test)]
pub(crate) use flaky::FlakyStorage;
pub use memory::MemoryStorage;
pub use sqlite::{SqliteStorage, StorageEntry, StorageStats};

/// Key holding the serialized identity of the logged-in user.
pub const SESSION_KEY: &str = "sessionUser";

/// Key holding the serialized ship collection.
pub const SHIPS_KEY: &str = "entnt_ships";

/// A string-keyed, string-valued persistence backend.
///
/// Writes overwrite the whole value stored under a key; there is no partial
/// update.
pub trait LocalStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<T: LocalStorage + ?Sized> LocalStorage for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

impl<T: LocalStorage + ?Sized> LocalStorage for Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}
