//! Flat key-value client storage.
//!
//! Every store persists one complete JSON snapshot under a fixed key.
//! Writes are upserts: the last writer wins, there is no revision check.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::{open_database, open_memory_database, DatabaseError};

/// Key holding the single health profile snapshot.
pub const PROFILE_KEY: &str = "healthProfile";
/// Key holding the medication reminder list.
pub const MEDICATIONS_KEY: &str = "medications";
/// Key holding the mood log (newest first).
pub const MOOD_ENTRIES_KEY: &str = "moodEntries";

pub trait ClientStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
    fn remove(&self, key: &str) -> Result<(), DatabaseError>;
    fn keys(&self) -> Result<Vec<String>, DatabaseError>;
}

/// SQLite-backed storage. One row per key.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: Mutex::new(open_database(path)?),
        })
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: Mutex::new(open_memory_database()?),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn)
    }
}

impl ClientStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM client_storage WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO client_storage (key, value, updated_at)
                 VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM client_storage WHERE key = ?1", params![key])?;
            Ok(())
        })
    }

    fn keys(&self) -> Result<Vec<String>, DatabaseError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM client_storage ORDER BY key")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
        })
    }
}

/// Volatile storage for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, DatabaseError> {
        let entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}
