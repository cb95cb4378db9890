//! Drive configuration persistence.

use crate::model::drive::DriveConfig;
use crate::repo::{bool_to_int, ensure_connection_ready, parse_bool, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for per-event Drive connection records.
pub trait DriveConfigRepository {
    /// Inserts or replaces the config for its event.
    fn upsert_config(&self, config: &DriveConfig) -> RepoResult<()>;
    fn get_config(&self, event_id: &str) -> RepoResult<Option<DriveConfig>>;
    fn list_configs(&self) -> RepoResult<Vec<DriveConfig>>;
    fn delete_config(&self, event_id: &str) -> RepoResult<()>;
}

/// SQLite-backed Drive config repository.
pub struct SqliteDriveConfigRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDriveConfigRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "drive_configs")?;
        Ok(Self { conn })
    }
}

impl DriveConfigRepository for SqliteDriveConfigRepository<'_> {
    fn upsert_config(&self, config: &DriveConfig) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO drive_configs (event_id, folder_url, folder_id, connected, last_sync_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(event_id) DO UPDATE SET
                folder_url = excluded.folder_url,
                folder_id = excluded.folder_id,
                connected = excluded.connected,
                last_sync_at = excluded.last_sync_at;",
            params![
                config.event_id,
                config.folder_url,
                config.folder_id,
                bool_to_int(config.connected),
                config.last_sync_at,
            ],
        )?;

        Ok(())
    }

    fn get_config(&self, event_id: &str) -> RepoResult<Option<DriveConfig>> {
        let mut stmt = self.conn.prepare(
            "SELECT event_id, folder_url, folder_id, connected, last_sync_at
             FROM drive_configs WHERE event_id = ?1;",
        )?;
        let mut rows = stmt.query([event_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_config_row(row)?));
        }

        Ok(None)
    }

    fn list_configs(&self) -> RepoResult<Vec<DriveConfig>> {
        let mut stmt = self.conn.prepare(
            "SELECT event_id, folder_url, folder_id, connected, last_sync_at
             FROM drive_configs ORDER BY event_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut configs = Vec::new();
        while let Some(row) = rows.next()? {
            configs.push(parse_config_row(row)?);
        }

        Ok(configs)
    }

    fn delete_config(&self, event_id: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM drive_configs WHERE event_id = ?1;", [event_id])?;
        Ok(())
    }
}

fn parse_config_row(row: &Row<'_>) -> RepoResult<DriveConfig> {
    Ok(DriveConfig {
        event_id: row.get("event_id")?,
        folder_url: row.get("folder_url")?,
        folder_id: row.get("folder_id")?,
        connected: parse_bool("drive_configs.connected", row.get("connected")?)?,
        last_sync_at: row.get("last_sync_at")?,
    })
}
