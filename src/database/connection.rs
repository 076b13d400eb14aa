//! SQLite handle behind Stampbook's local storage.
//!
//! The database holds the `local_storage` key/value table that keeps the
//! signed-in session (`accessToken`, `userData`) across restarts. Board and
//! bookmark data is never written here; it always comes from the backend.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens or creates the session database at `path`, bringing the
    /// `local_storage` schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        Self::with_schema(Connection::open(path)?)
    }

    /// A throwaway database for tests and one-off sessions.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
