//! Named preference values (get/set by name).

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension};

use super::connection::open_db;
use super::dirs::AppDirs;

/// Durable key-value facility used by the favorites store.
///
/// Implementations must make `set` durable before returning.
#[allow(clippy::module_name_repetitions)]
pub trait PreferenceStore: Send + Sync {
    /// Reads the value stored under `name`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Stores `value` under `name`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written durably.
    fn set(&self, name: &str, value: &str) -> Result<()>;
}

/// Loads a single preference value.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_preference(conn: &Connection, name: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM preferences WHERE name = ?1",
        [name],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to load preference {name}"))
}

/// Inserts or replaces a single preference value.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn save_preference(conn: &Connection, name: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO preferences (name, value) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        rusqlite::params![name, value],
    )
    .with_context(|| format!("failed to save preference {name}"))?;
    Ok(())
}

/// `SQLite`-backed preference store.
///
/// `rusqlite::Connection` is not `Sync`, so access is serialized through a mutex.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SqlitePreferenceStore {
    conn: Mutex<Connection>,
}

impl SqlitePreferenceStore {
    /// Wraps an already-migrated connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens the database in the data directory of `dirs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(dirs: &AppDirs) -> Result<Self> {
        open_db(dirs).map(Self::new)
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        load_preference(&conn, name)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        save_preference(&conn, name, value)
    }
}

/// Process-local preference store; nothing survives the process.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        Ok(values.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        values.insert(String::from(name), String::from(value));
        Ok(())
    }
}
