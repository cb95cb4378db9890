//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - The write path owns the `completed_at` lifecycle: a transition to
//!   completed stamps it (when unset), any other status clears it.

use crate::id::now_ms;
use crate::model::task::{Task, TaskStatus};
use crate::model::Priority;
use crate::repo::{
    encode_id_array, ensure_connection_ready, event_scope_sql, parse_id_array, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    event_id,
    title,
    description,
    status,
    priority,
    assigned_person_ids,
    assigned_vendor_ids,
    duration_minutes,
    completed_at,
    notes,
    created_at,
    updated_at
FROM tasks";

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<String>;
    /// Full-record replacement. `completed_at` is derived from the status
    /// transition, not taken from the caller's record.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: &str) -> RepoResult<Option<Task>>;
    /// Lists tasks of the active event in insertion order.
    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<Task>>;
    /// Lists every task across all events, for snapshot/export paths.
    fn list_all(&self) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "tasks")?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<String> {
        let completed_at = completion_stamp(task.status, task.completed_at);
        self.conn.execute(
            "INSERT INTO tasks (
                id, event_id, title, description, status, priority,
                assigned_person_ids, assigned_vendor_ids, duration_minutes,
                completed_at, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                task.id,
                task.event_id.as_deref(),
                task.title,
                task.description,
                task.status.as_str(),
                task.priority.as_str(),
                encode_id_array(&task.assigned_person_ids)?,
                encode_id_array(&task.assigned_vendor_ids)?,
                task.duration_minutes,
                completed_at,
                task.notes,
                task.created_at,
                task.updated_at,
            ],
        )?;

        Ok(task.id.clone())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        // Preserve the original completion stamp when the task stays completed.
        let previous = self.get_task(&task.id)?;
        let carried = previous.and_then(|existing| existing.completed_at);
        let completed_at = completion_stamp(task.status, carried);

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                event_id = ?1,
                title = ?2,
                description = ?3,
                status = ?4,
                priority = ?5,
                assigned_person_ids = ?6,
                assigned_vendor_ids = ?7,
                duration_minutes = ?8,
                completed_at = ?9,
                notes = ?10,
                updated_at = ?11
             WHERE id = ?12;",
            params![
                task.event_id.as_deref(),
                task.title,
                task.description,
                task.status.as_str(),
                task.priority.as_str(),
                encode_id_array(&task.assigned_person_ids)?,
                encode_id_array(&task.assigned_vendor_ids)?,
                task.duration_minutes,
                completed_at,
                task.notes,
                now_ms(),
                task.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id.clone()));
        }

        Ok(())
    }

    fn get_task(&self, id: &str) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_for_event(&self, event_id: &str) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE {} ORDER BY created_at ASC, id ASC;",
            event_scope_sql()
        ))?;
        let mut rows = stmt.query([event_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn list_all(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

/// Derives the stored `completed_at` from the target status.
fn completion_stamp(status: TaskStatus, existing: Option<i64>) -> Option<i64> {
    match status {
        TaskStatus::Completed => existing.or_else(|| Some(now_ms())),
        _ => None,
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let person_ids_text: String = row.get("assigned_person_ids")?;
    let vendor_ids_text: String = row.get("assigned_vendor_ids")?;

    Ok(Task {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority,
        assigned_person_ids: parse_id_array("tasks.assigned_person_ids", &person_ids_text)?,
        assigned_vendor_ids: parse_id_array("tasks.assigned_vendor_ids", &vendor_ids_text)?,
        duration_minutes: row.get("duration_minutes")?,
        completed_at: row.get("completed_at")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
