use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Handle to the on-disk database. The store only remembers where the file
/// lives; each operation opens its own connection and drops it before
/// returning, so nothing stays open between calls.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Create the data directory if needed, then make sure both tables exist.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self { path: path.into() };

        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| StoreError::storage("failed to create data directory", err))?;
            }
        }

        store.initialize()?;
        info!(path = %store.path.display(), "opened language store");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the schema. Safe to call on every startup: existing tables and
    /// rows are left untouched.
    pub fn initialize(&self) -> StoreResult<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS languages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                language_name TEXT UNIQUE NOT NULL
            )",
            [],
        )
        .map_err(|err| StoreError::storage("failed to create languages table", err))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS language_pairs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                english_sentence TEXT NOT NULL,
                foreign_sentence TEXT NOT NULL,
                language_id INTEGER NOT NULL,
                FOREIGN KEY (language_id) REFERENCES languages (id)
            )",
            [],
        )
        .map_err(|err| StoreError::storage("failed to create language_pairs table", err))?;

        debug!("schema ready");
        Ok(())
    }

    /// Open a fresh connection with foreign keys enforced. Callers hold it for
    /// the duration of one operation only.
    pub(crate) fn connect(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.path)
            .map_err(|err| StoreError::storage("failed to open SQLite database", err))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|err| StoreError::storage("failed to enable foreign keys", err))?;
        Ok(conn)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use tempfile::TempDir;

    use super::*;

    /// A store backed by a throwaway directory. Keep the `TempDir` alive for
    /// as long as the store is used.
    pub(crate) fn temp_store() -> (Store, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("language_pairs.db")).unwrap();
        (store, dir)
    }

    #[test]
    fn open_creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("memo.db");

        let store = Store::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn initialize_twice_keeps_existing_rows() {
        let (store, _dir) = temp_store();
        store.add_language("French").unwrap();
        store.save_pair("Hello", "Bonjour", "French").unwrap();

        store.initialize().unwrap();
        store.initialize().unwrap();

        assert_eq!(store.list_languages().unwrap(), vec!["French".to_string()]);
        assert_eq!(store.count_pairs().unwrap(), 1);
    }

    #[test]
    fn reopening_the_file_sees_previous_data() {
        let (store, _dir) = temp_store();
        store.add_language("German").unwrap();

        let reopened = Store::open(store.path()).unwrap();
        assert_eq!(reopened.list_languages().unwrap(), vec!["German".to_string()]);
    }

    #[test]
    fn unreachable_path_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as a database file.
        let err = Store::open(dir.path()).unwrap_err();
        assert!(!err.is_recoverable());
    }
}
