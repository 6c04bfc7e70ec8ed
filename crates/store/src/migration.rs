//! Schema migration logic for the key-value store

use crate::error::{Error, Result};
use crate::schema::{KV_SQL, SCHEMA_VERSION, SCHEMA_VERSION_SQL};
use rusqlite::Connection;
use tracing::{debug, info, trace};

pub struct MigrationManager;

impl MigrationManager {
    /// Current schema version; 0 when the database is fresh.
    pub fn get_current_version(conn: &Connection) -> Result<i32> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(format!("Failed to check schema_version table: {e}")))?;

        if !table_exists {
            trace!("schema_version table does not exist, returning version 0");
            return Ok(0);
        }

        let version: Option<i32> = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(|e| Error::database(format!("Failed to query schema version: {e}")))?;

        Ok(version.unwrap_or(0))
    }

    /// Apply pending migrations up to SCHEMA_VERSION. Idempotent.
    pub fn migrate(conn: &Connection) -> Result<()> {
        let current_version = Self::get_current_version(conn)?;
        debug!(current_version, target = SCHEMA_VERSION, "checking schema version");

        if current_version > SCHEMA_VERSION {
            return Err(Error::database(format!(
                "database schema version {current_version} is newer than supported version {SCHEMA_VERSION}"
            )));
        }

        if current_version == SCHEMA_VERSION {
            trace!("Schema is up to date, no migration needed");
            return Ok(());
        }

        info!(from = current_version, to = SCHEMA_VERSION, "migrating schema");
        if current_version == 0 {
            Self::apply_v1_migration(conn)?;
        }

        Ok(())
    }

    fn apply_v1_migration(conn: &Connection) -> Result<()> {
        debug!("Applying v1 migration");

        conn.execute_batch(SCHEMA_VERSION_SQL)
            .and_then(|_| conn.execute_batch(KV_SQL))
            .and_then(|_| conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [1]))
            .map_err(|e| Error::database(format!("Failed to apply v1 schema: {e}")))?;

        trace!("v1 migration applied successfully");
        Ok(())
    }
}
