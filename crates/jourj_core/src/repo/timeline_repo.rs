//! Timeline item repository contract and SQLite implementation.
//!
//! # Invariants
//! - Event-scoped listings are ordered by `order_index`, the per-event display
//!   order. Index-based operations (reorder) must work on this filtered
//!   sequence, never on a cross-event view.

use crate::id::now_ms;
use crate::model::timeline_item::{ItemStatus, TimelineItem};
use crate::model::Priority;
use crate::repo::{
    encode_id_array, ensure_connection_ready, event_scope_sql, parse_id_array, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    event_id,
    title,
    description,
    time,
    duration_minutes,
    category,
    status,
    priority,
    assigned_person_ids,
    assigned_vendor_ids,
    assigned_role,
    order_index,
    notes,
    created_at,
    updated_at
FROM timeline_items";

/// Repository interface for timeline item CRUD operations.
pub trait TimelineRepository {
    fn create_item(&self, item: &TimelineItem) -> RepoResult<String>;
    fn update_item(&self, item: &TimelineItem) -> RepoResult<()>;
    fn get_item(&self, id: &str) -> RepoResult<Option<TimelineItem>>;
    /// Lists items of the active event in display (`order_index`) order.
    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<TimelineItem>>;
    /// Lists every item across all events, for snapshot/export paths.
    fn list_all(&self) -> RepoResult<Vec<TimelineItem>>;
    fn delete_item(&self, id: &str) -> RepoResult<()>;
    /// Persists recalculated `time`/`order_index` values for one item.
    fn update_schedule_fields(&self, id: &str, time: &str, order_index: i64) -> RepoResult<()>;
    /// Next free `order_index` for appending to an event's timeline.
    fn next_order_index(&self, event_id: &str) -> RepoResult<i64>;
}

/// SQLite-backed timeline repository.
pub struct SqliteTimelineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTimelineRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "timeline_items")?;
        Ok(Self { conn })
    }
}

impl TimelineRepository for SqliteTimelineRepository<'_> {
    fn create_item(&self, item: &TimelineItem) -> RepoResult<String> {
        self.conn.execute(
            "INSERT INTO timeline_items (
                id, event_id, title, description, time, duration_minutes,
                category, status, priority, assigned_person_ids,
                assigned_vendor_ids, assigned_role, order_index, notes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16);",
            params![
                item.id,
                item.event_id.as_deref(),
                item.title,
                item.description,
                item.time,
                item.duration_minutes,
                item.category,
                item.status.as_str(),
                item.priority.as_str(),
                encode_id_array(&item.assigned_person_ids)?,
                encode_id_array(&item.assigned_vendor_ids)?,
                item.assigned_role.as_deref(),
                item.order_index,
                item.notes,
                item.created_at,
                item.updated_at,
            ],
        )?;

        Ok(item.id.clone())
    }

    fn update_item(&self, item: &TimelineItem) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE timeline_items
             SET
                event_id = ?1,
                title = ?2,
                description = ?3,
                time = ?4,
                duration_minutes = ?5,
                category = ?6,
                status = ?7,
                priority = ?8,
                assigned_person_ids = ?9,
                assigned_vendor_ids = ?10,
                assigned_role = ?11,
                order_index = ?12,
                notes = ?13,
                updated_at = ?14
             WHERE id = ?15;",
            params![
                item.event_id.as_deref(),
                item.title,
                item.description,
                item.time,
                item.duration_minutes,
                item.category,
                item.status.as_str(),
                item.priority.as_str(),
                encode_id_array(&item.assigned_person_ids)?,
                encode_id_array(&item.assigned_vendor_ids)?,
                item.assigned_role.as_deref(),
                item.order_index,
                item.notes,
                now_ms(),
                item.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id.clone()));
        }

        Ok(())
    }

    fn get_item(&self, id: &str) -> RepoResult<Option<TimelineItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<TimelineItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL} WHERE {} ORDER BY order_index ASC, created_at ASC, id ASC;",
            event_scope_sql()
        ))?;
        let mut rows = stmt.query([event_id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn list_all(&self) -> RepoResult<Vec<TimelineItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn delete_item(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM timeline_items WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn update_schedule_fields(&self, id: &str, time: &str, order_index: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE timeline_items
             SET time = ?1, order_index = ?2, updated_at = ?3
             WHERE id = ?4;",
            params![time, order_index, now_ms(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn next_order_index(&self, event_id: &str) -> RepoResult<i64> {
        let max: Option<i64> = self.conn.query_row(
            &format!(
                "SELECT MAX(order_index) FROM timeline_items WHERE {};",
                event_scope_sql()
            ),
            [event_id],
            |row| row.get(0),
        )?;

        Ok(max.map_or(0, |value| value + 1))
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<TimelineItem> {
    let status_text: String = row.get("status")?;
    let status = ItemStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in timeline_items.status"
        ))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in timeline_items.priority"
        ))
    })?;

    let person_ids_text: String = row.get("assigned_person_ids")?;
    let vendor_ids_text: String = row.get("assigned_vendor_ids")?;

    Ok(TimelineItem {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        time: row.get("time")?,
        duration_minutes: row.get("duration_minutes")?,
        category: row.get("category")?,
        status,
        priority,
        assigned_person_ids: parse_id_array(
            "timeline_items.assigned_person_ids",
            &person_ids_text,
        )?,
        assigned_vendor_ids: parse_id_array(
            "timeline_items.assigned_vendor_ids",
            &vendor_ids_text,
        )?,
        assigned_role: row.get("assigned_role")?,
        order_index: row.get("order_index")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
