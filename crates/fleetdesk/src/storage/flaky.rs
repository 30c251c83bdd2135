//! A storage double whose writes can be switched to fail.

use std::cell::Cell;

use crate::error::{Error, Result};

use super::{LocalStorage, MemoryStorage};

/// Wraps a [`MemoryStorage`]; while [`set_failing`](Self::set_failing) is on,
/// every write returns a disk-full error and leaves the data untouched.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    failing: Cell<bool>,
}

impl FlakyStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// What actually got persisted.
    #[must_use]
    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }

    fn check(&self) -> Result<()> {
        if self.failing.get() {
            return Err(Error::DatabaseQuery(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                Some("database or disk is full".to_string()),
            )));
        }
        Ok(())
    }
}

impl LocalStorage for FlakyStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.remove_item(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_fail_only_while_failing() {
        let storage = FlakyStorage::new();
        storage.set_item("key", "one").unwrap();

        storage.set_failing(true);
        assert!(matches!(
            storage.set_item("key", "two"),
            Err(Error::DatabaseQuery(_))
        ));
        assert!(storage.remove_item("key").is_err());
        assert_eq!(storage.get_item("key").unwrap().as_deref(), Some("one"));

        storage.set_failing(false);
        storage.remove_item("key").unwrap();
        assert!(storage.inner().is_empty());
    }
}
