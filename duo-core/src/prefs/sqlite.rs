// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! SQLite-backed preference store.
//!
//! Values survive process restarts, which is how a front end observes a
//! "reload" after the mode switch wipes credentials.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::{PreferenceStore, PrefsError};

/// Current schema version stored in `PRAGMA user_version`.
const SCHEMA_VERSION: u32 = 1;

const SCHEMA_V1: &str = "CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);";

/// Persistent preference store.
pub struct SqlitePreferenceStore {
    conn: Mutex<Connection>,
}

impl SqlitePreferenceStore {
    /// Opens or creates a preference database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PrefsError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PrefsError::Unavailable(e.to_string()))?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Creates an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, PrefsError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, PrefsError> {
        let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version < SCHEMA_VERSION {
            conn.execute_batch(SCHEMA_V1)?;
            conn.execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))?;
        }
        Ok(SqlitePreferenceStore {
            conn: Mutex::new(conn),
        })
    }

    /// Returns the schema version of the underlying database.
    pub fn schema_version(&self) -> Result<u32, PrefsError> {
        let conn = self.conn()?;
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, PrefsError> {
        self.conn
            .lock()
            .map_err(|_| PrefsError::Unavailable("connection lock poisoned".into()))
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, now as i64],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
        Ok(())
    }
}
