//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `events` table.
//! - Resolve magic words to events for the shared team-access flow.
//!
//! # Invariants
//! - `update_event` performs full-record replacement and refreshes `updated_at`.
//! - Magic-word lookup is an exact, case-sensitive comparison.

use crate::id::now_ms;
use crate::model::event::Event;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    event_type,
    event_date,
    location,
    description,
    magic_word,
    theme_color,
    created_at,
    updated_at
FROM events";

/// Repository interface for event CRUD operations.
pub trait EventRepository {
    fn create_event(&self, event: &Event) -> RepoResult<String>;
    fn update_event(&self, event: &Event) -> RepoResult<()>;
    fn get_event(&self, id: &str) -> RepoResult<Option<Event>>;
    fn list_events(&self) -> RepoResult<Vec<Event>>;
    fn delete_event(&self, id: &str) -> RepoResult<()>;
    /// Resolves a shared magic word to its event, if any.
    fn find_by_magic_word(&self, word: &str) -> RepoResult<Option<Event>>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "events")?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &Event) -> RepoResult<String> {
        self.conn.execute(
            "INSERT INTO events (
                id, name, event_type, event_date, location, description,
                magic_word, theme_color, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                event.id,
                event.name,
                event.event_type,
                event.event_date.map(|date| date.to_string()),
                event.location,
                event.description,
                event.magic_word.as_deref(),
                event.theme_color.as_deref(),
                event.created_at,
                event.updated_at,
            ],
        )?;

        Ok(event.id.clone())
    }

    fn update_event(&self, event: &Event) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE events
             SET
                name = ?1,
                event_type = ?2,
                event_date = ?3,
                location = ?4,
                description = ?5,
                magic_word = ?6,
                theme_color = ?7,
                updated_at = ?8
             WHERE id = ?9;",
            params![
                event.name,
                event.event_type,
                event.event_date.map(|date| date.to_string()),
                event.location,
                event.description,
                event.magic_word.as_deref(),
                event.theme_color.as_deref(),
                now_ms(),
                event.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(event.id.clone()));
        }

        Ok(())
    }

    fn get_event(&self, id: &str) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }

        Ok(None)
    }

    fn list_events(&self) -> RepoResult<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }

        Ok(events)
    }

    fn delete_event(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM events WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn find_by_magic_word(&self, word: &str) -> RepoResult<Option<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL} WHERE magic_word = ?1 ORDER BY created_at ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([word])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }

        Ok(None)
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let event_date = match row.get::<_, Option<String>>("event_date")? {
        Some(text) => Some(text.parse::<NaiveDate>().map_err(|_| {
            RepoError::InvalidData(format!("invalid date `{text}` in events.event_date"))
        })?),
        None => None,
    };

    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
        event_type: row.get("event_type")?,
        event_date,
        location: row.get("location")?,
        description: row.get("description")?,
        magic_word: row.get("magic_word")?,
        theme_color: row.get("theme_color")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
