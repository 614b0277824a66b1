//! Opening the movieapp database.

use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::dirs::AppDirs;
use super::migrations::run_migrations;

/// How long a write waits for another movieapp process holding the lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the database in the data directory of `dirs` and
/// brings its schema up to date.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created, the file
/// cannot be opened, or migrations fail.
pub fn open_db(dirs: &AppDirs) -> Result<Connection> {
    std::fs::create_dir_all(dirs.data_dir()).with_context(|| {
        format!("failed to create data directory {}", dirs.data_dir().display())
    })?;

    let db_path = dirs.database_file();
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout")?;
    run_migrations(&conn).context("database migration failed")?;

    tracing::debug!(path = %db_path.display(), "database opened");
    Ok(conn)
}
