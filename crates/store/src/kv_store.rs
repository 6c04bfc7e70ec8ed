use crate::error::{Error, Result};
use crate::migration::MigrationManager;

use relaychat_core::storage::{KeyValueStore, check_quota};
use relaychat_core::StorageError;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::instrument;

/// Key-value store persisted in a single SQLite file
pub struct SqliteStore {
    conn: Mutex<Connection>,
    quota: Option<usize>,
}

impl SqliteStore {
    /// Open or create a store at the given path, creating parent directories.
    #[instrument(skip_all, fields(db_path = %db_path.display()))]
    pub fn open(db_path: &Path) -> Result<Self> {
        tracing::info!("Opening store at {}", db_path.display());

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path).map_err(|e| Error::database(format!("Failed to open database: {e}")))?;
        Self::from_connection(conn)
    }

    /// Store that lives only as long as the process.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        MigrationManager::migrate(&conn)?;
        Ok(Self { conn: Mutex::new(conn), quota: None })
    }

    /// Reject values larger than `limit` bytes.
    pub fn with_quota(mut self, limit: usize) -> Self {
        self.quota = Some(limit);
        self
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::database("connection lock poisoned"))
    }

    /// Every stored key, sorted.
    #[cfg(test)]
    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt.query_map([], |row| row.get(0))?.collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let conn = self.conn().map_err(|e| e.into_read(key))?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get::<_, String>(0))
            .optional()
            .map_err(|e| Error::from(e).into_read(key))?;

        tracing::trace!(found = value.is_some(), "read slot");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        check_quota(key, value, self.quota)?;

        let conn = self.conn().map_err(|e| e.into_write(key))?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )
        .map_err(|e| Error::from(e).into_write(key))?;

        tracing::debug!("wrote slot");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
        let conn = self.conn().map_err(|e| e.into_write(key))?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| Error::from(e).into_write(key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaychat_core::storage::{CONVERSATION_KEY, THEME_KEY};
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);

        store.set(THEME_KEY, "dark").unwrap();
        store.set(THEME_KEY, "light").unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));

        store.remove(THEME_KEY).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("nested").join("store.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.set(CONVERSATION_KEY, r#"[{"role":"user","content":"hi"}]"#).unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(store.get(CONVERSATION_KEY).unwrap().as_deref(), Some(r#"[{"role":"user","content":"hi"}]"#));
        assert_eq!(store.keys().unwrap(), vec![CONVERSATION_KEY.to_string()]);
    }

    #[test]
    fn test_quota_rejects_large_values() {
        let store = SqliteStore::open_in_memory().unwrap().with_quota(8);
        let err = store.set(CONVERSATION_KEY, "0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { size: 10, limit: 8, .. }));
        assert_eq!(store.get(CONVERSATION_KEY).unwrap(), None);
    }
}
