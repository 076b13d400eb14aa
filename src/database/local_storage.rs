//! Persistent key/value storage, the client's equivalent of browser local storage.

use rusqlite::{params, OptionalExtension};

use super::connection::Database;

/// String key/value store over the `local_storage` table.
pub struct LocalStorage {
    db: Database,
}

impl LocalStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.db
            .connection()
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Inserts or overwrites `key`.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        let now = chrono::Utc::now().timestamp();
        self.db.connection().execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    /// Removes `key`. Removing a missing key is not an error.
    pub fn remove_item(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.db
            .connection()
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), rusqlite::Error> {
        self.db.connection().execute("DELETE FROM local_storage", [])?;
        Ok(())
    }

    pub fn keys(&self) -> Result<Vec<String>, rusqlite::Error> {
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT key FROM local_storage ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect()
    }
}
