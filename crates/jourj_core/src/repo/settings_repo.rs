//! Key-value settings persistence.
//!
//! # Responsibility
//! - Persist small session-scoped values (the current event id) separately
//!   from entity collections, so a restart resumes the same context.

use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

pub const CURRENT_EVENT_KEY: &str = "current_event_id";

/// Repository interface for settings values.
pub trait SettingsRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Inserts or replaces a value. Writes through immediately.
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    fn delete(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "settings")?;
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;

        Ok(())
    }

    fn delete(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1;", [key])?;
        Ok(())
    }
}
