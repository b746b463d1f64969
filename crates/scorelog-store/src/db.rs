//! Embedded database handles
//!
//! Opens per-partition SQLite files. Handles are short-lived: one per store
//! operation, closed when dropped.

use std::path::Path;
use std::time::Duration;

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OpenFlags};

/// How long a connection waits on another writer's lock before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) the SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(|e| from_rusqlite("sqlite_open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an existing SQLite database without creating it
pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags)
        .map_err(|e| from_rusqlite("sqlite_open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(|e| from_rusqlite("sqlite_open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Configure a connection for concurrent first-writers of a month
pub fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| from_rusqlite("sqlite_configure", e))?;
    Ok(())
}
