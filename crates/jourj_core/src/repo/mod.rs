//! Repository contracts and SQLite implementations for the entity store.
//!
//! # Responsibility
//! - Provide stable per-entity CRUD APIs over the migrated schema.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Repositories refuse to operate on unmigrated connections.
//! - Mutating an unknown id returns [`RepoError::NotFound`] instead of
//!   silently succeeding; callers decide whether to log or ignore.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::event::DEFAULT_EVENT_ID;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document_repo;
pub mod drive_repo;
pub mod event_repo;
pub mod person_repo;
pub mod settings_repo;
pub mod task_repo;
pub mod timeline_repo;
pub mod vendor_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The targeted entity id does not exist.
    NotFound(String),
    InvalidData(String),
    /// Connection has not been migrated to the supported schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entity not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table: {table}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// SQL predicate binding `?1` to the active event id.
///
/// Rows with an empty/absent `event_id` belong to the default event only, so
/// legacy unassigned records keep surfacing somewhere without leaking into
/// other events.
pub(crate) fn event_scope_sql() -> String {
    format!(
        "(event_id = ?1 OR ((event_id IS NULL OR event_id = '') AND ?1 = '{DEFAULT_EVENT_ID}'))"
    )
}

/// Verifies the connection is migrated and the required table exists.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
) -> RepoResult<()> {
    let expected = crate::db::migrations::latest_version();
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual != expected {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    Ok(())
}

/// Encodes an assigned-id array as a JSON text column value.
pub(crate) fn encode_id_array(ids: &[String]) -> RepoResult<String> {
    serde_json::to_string(ids)
        .map_err(|err| RepoError::InvalidData(format!("unencodable id array: {err}")))
}

/// Decodes a JSON text column back into an assigned-id array.
pub(crate) fn parse_id_array(column: &str, value: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid id array `{value}` in {column}"))
    })
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn parse_bool(column: &str, value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
