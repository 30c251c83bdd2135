//! `SQLite`-backed local storage.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::{migrations, LocalStorage};

const IN_MEMORY_PATH: &str = ":memory:";

/// Durable [`LocalStorage`] kept in a single `SQLite` file.
///
/// Each key is one row of the `local_storage` table; every write also
/// records when the key was last touched.
#[derive(Debug)]
pub struct SqliteStorage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

/// One key as seen by [`SqliteStorage::entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    /// The storage key.
    pub key: String,
    /// Length of the stored value in bytes.
    pub size_bytes: usize,
    /// When the key was last written, if the stamp could be parsed.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of keys stored.
    pub total_entries: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

impl SqliteStorage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(IN_MEMORY_PATH),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(IN_MEMORY_PATH),
            conn,
        })
    }

    /// Set how long a write waits on a locked database before failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be applied.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List every stored key, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn entries(&self) -> Result<Vec<StorageEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, length(CAST(value AS BLOB)), updated_at FROM local_storage ORDER BY key")?;

        let entries = stmt
            .query_map([], |row| {
                let size: i64 = row.get(1)?;
                let updated_at: String = row.get(2)?;
                Ok(StorageEntry {
                    key: row.get(0)?,
                    size_bytes: usize::try_from(size).unwrap_or(0),
                    updated_at: DateTime::parse_from_rfc3339(&updated_at)
                        .ok()
                        .map(|dt| dt.with_timezone(&Utc)),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_entries: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM local_storage", [], |row| row.get(0))?;

        let db_size_bytes = if self.path.as_os_str() == IN_MEMORY_PATH {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_entries,
            db_size_bytes,
        })
    }
}

impl LocalStorage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            r"
            INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, now],
        )?;
        debug!("Wrote {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
        if affected > 0 {
            debug!("Removed {}", key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> SqliteStorage {
        SqliteStorage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_open_in_memory() {
        let storage = SqliteStorage::open_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_set_and_get() {
        let storage = create_test_storage();
        storage.set_item("sessionUser", "{}").unwrap();
        assert_eq!(
            storage.get_item("sessionUser").unwrap(),
            Some("{}".to_string())
        );
    }

    #[test]
    fn test_get_missing() {
        let storage = create_test_storage();
        assert!(storage.get_item("nothing").unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let storage = create_test_storage();
        storage.set_item("k", "one").unwrap();
        storage.set_item("k", "two").unwrap();

        assert_eq!(storage.get_item("k").unwrap(), Some("two".to_string()));
        assert_eq!(storage.stats().unwrap().total_entries, 1);
    }

    #[test]
    fn test_remove() {
        let storage = create_test_storage();
        storage.set_item("k", "v").unwrap();
        storage.remove_item("k").unwrap();
        assert!(storage.get_item("k").unwrap().is_none());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let storage = create_test_storage();
        assert!(storage.remove_item("missing").is_ok());
    }

    #[test]
    fn test_unicode_value() {
        let storage = create_test_storage();
        let value = r#"[{"name":"Ørsted Ærø 船"}]"#;
        storage.set_item("entnt_ships", value).unwrap();
        assert_eq!(
            storage.get_item("entnt_ships").unwrap().as_deref(),
            Some(value)
        );
    }

    #[test]
    fn test_entries() {
        let storage = create_test_storage();
        storage.set_item("b", "22").unwrap();
        storage.set_item("a", "1").unwrap();

        let entries = storage.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "a");
        assert_eq!(entries[0].size_bytes, 1);
        assert_eq!(entries[1].key, "b");
        assert_eq!(entries[1].size_bytes, 2);
        assert!(entries.iter().all(|e| e.updated_at.is_some()));
    }

    #[test]
    fn test_stats_empty() {
        let storage = create_test_storage();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_busy_timeout() {
        let storage = create_test_storage();
        assert!(storage.set_busy_timeout(Duration::from_millis(250)).is_ok());
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_open_file_based_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("fleetdesk.db");

        {
            let storage = SqliteStorage::open(&db_path).unwrap();
            storage.set_item("sessionUser", "payload").unwrap();
            assert_eq!(storage.path(), db_path);
        }

        let reopened = SqliteStorage::open(&db_path).unwrap();
        assert_eq!(
            reopened.get_item("sessionUser").unwrap(),
            Some("payload".to_string())
        );
        assert!(reopened.stats().unwrap().db_size_bytes > 0);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/fleetdesk.db");

        let storage = SqliteStorage::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        drop(storage);
    }
}
