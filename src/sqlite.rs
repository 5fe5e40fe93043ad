// SQLite-backed key-value store

use crate::kv::{KvStore, validate_key};
use eyre::{Context, Result, eyre};
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SCHEMA_VERSION: i64 = 1;
const DB_FILE: &str = "tasklist.db";

/// Key-value store kept in a single SQLite database file
pub struct SqliteStore {
    path: PathBuf,
    db: Connection,
}

impl SqliteStore {
    /// Open or create the database inside `dir`
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).context("Failed to create data directory")?;

        let path = dir.join(DB_FILE);
        let db = Connection::open(&path).context("Failed to open SQLite database")?;

        let store = Self { path, db };
        store.migrate()?;

        info!(path = ?store.path, "Opened SQLite store");
        Ok(store)
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self.db.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version > SCHEMA_VERSION {
            return Err(eyre!(
                "Database schema version {} is newer than supported version {}",
                version,
                SCHEMA_VERSION
            ));
        }

        if version < SCHEMA_VERSION {
            debug!(from = version, to = SCHEMA_VERSION, "Creating database schema");
            self.db.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                PRAGMA user_version = 1;
                "#,
            )?;
        }

        Ok(())
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .context("Failed to read value")?;

        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;

        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, crate::now_ms()],
            )
            .context("Failed to write value")?;

        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }
}
