//! Store snapshot, restore and export.
//!
//! # Responsibility
//! - Serialize the whole store (all collections + current-event selection)
//!   into one transportable JSON document.
//! - Restore wholesale from such a document without partial mutation.
//! - Manage on-disk backup files and the local storage budget.
//!
//! # Invariants
//! - Restore parses and version-checks the payload before touching the store;
//!   the replacement itself runs in one transaction.
//! - A snapshot captures collections in insertion order, so a round-trip is
//!   element-wise equal.

use crate::model::document::Document;
use crate::model::drive::DriveConfig;
use crate::model::event::Event;
use crate::model::person::Person;
use crate::model::task::Task;
use crate::model::timeline_item::TimelineItem;
use crate::model::vendor::Vendor;
use crate::repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
use crate::repo::drive_repo::{DriveConfigRepository, SqliteDriveConfigRepository};
use crate::repo::event_repo::{EventRepository, SqliteEventRepository};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::settings_repo::{
    SettingsRepository, SqliteSettingsRepository, CURRENT_EVENT_KEY,
};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::timeline_repo::{SqliteTimelineRepository, TimelineRepository};
use crate::repo::vendor_repo::{SqliteVendorRepository, VendorRepository};
use crate::repo::RepoError;
use chrono::Local;
use log::{info, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub mod scheduler;

/// Version tag carried by every snapshot payload.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Assumed local storage quota for backup files.
pub const STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Pruning starts once usage exceeds this share of the quota.
const USAGE_THRESHOLD_PERCENT: u64 = 80;

const BACKUP_FILE_PREFIX: &str = "jourj-backup-";
const EXPORT_FILE_PREFIX: &str = "jourj-export-";

pub type BackupResult<T> = Result<T, BackupError>;

/// Error for snapshot, restore and backup-file operations.
#[derive(Debug)]
pub enum BackupError {
    Repo(RepoError),
    /// Payload is not valid snapshot JSON.
    InvalidPayload(String),
    /// Payload was written by a newer schema than this binary supports.
    UnsupportedVersion { found: u32, supported: u32 },
    Io(std::io::Error),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InvalidPayload(message) => write!(f, "invalid backup payload: {message}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "backup snapshot version {found} is newer than supported {supported}"
            ),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BackupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for BackupError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

impl From<std::io::Error> for BackupError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Whole-store snapshot, the backup/export wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub schema_version: u32,
    pub current_event_id: Option<String>,
    pub events: Vec<Event>,
    pub people: Vec<Person>,
    pub vendors: Vec<Vendor>,
    pub timeline_items: Vec<TimelineItem>,
    pub tasks: Vec<Task>,
    pub documents: Vec<Document>,
    pub drive_configs: Vec<DriveConfig>,
}

/// Captures the current store state as a snapshot value.
pub fn capture_snapshot(conn: &Connection) -> BackupResult<StoreSnapshot> {
    Ok(StoreSnapshot {
        schema_version: SNAPSHOT_VERSION,
        current_event_id: SqliteSettingsRepository::try_new(conn)?.get(CURRENT_EVENT_KEY)?,
        events: SqliteEventRepository::try_new(conn)?.list_events()?,
        people: SqlitePersonRepository::try_new(conn)?.list_all()?,
        vendors: SqliteVendorRepository::try_new(conn)?.list_all()?,
        timeline_items: SqliteTimelineRepository::try_new(conn)?.list_all()?,
        tasks: SqliteTaskRepository::try_new(conn)?.list_all()?,
        documents: SqliteDocumentRepository::try_new(conn)?.list_all()?,
        drive_configs: SqliteDriveConfigRepository::try_new(conn)?.list_configs()?,
    })
}

/// Serializes the whole store to a transportable JSON blob.
pub fn create_backup(conn: &Connection) -> BackupResult<String> {
    let snapshot = capture_snapshot(conn)?;
    serde_json::to_string(&snapshot)
        .map_err(|err| BackupError::InvalidPayload(format!("unserializable snapshot: {err}")))
}

/// Same blob as [`create_backup`], user-facing download intent.
pub fn export_data(conn: &Connection) -> BackupResult<String> {
    create_backup(conn)
}

/// Replaces the whole store from a snapshot blob.
///
/// The payload is parsed and version-checked before any mutation; the
/// replacement runs in one transaction, so a failure leaves the previous
/// state intact.
pub fn restore_from_backup(conn: &mut Connection, blob: &str) -> BackupResult<()> {
    let snapshot: StoreSnapshot = serde_json::from_str(blob)
        .map_err(|err| BackupError::InvalidPayload(err.to_string()))?;

    if snapshot.schema_version > SNAPSHOT_VERSION {
        return Err(BackupError::UnsupportedVersion {
            found: snapshot.schema_version,
            supported: SNAPSHOT_VERSION,
        });
    }
    // Older versions would be migrated here once a version 2 exists.

    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM events;
         DELETE FROM people;
         DELETE FROM vendors;
         DELETE FROM timeline_items;
         DELETE FROM tasks;
         DELETE FROM documents;
         DELETE FROM drive_configs;",
    )?;

    {
        let events = SqliteEventRepository::try_new(&tx)?;
        for event in &snapshot.events {
            events.create_event(event)?;
        }
        let people = SqlitePersonRepository::try_new(&tx)?;
        for person in &snapshot.people {
            people.create_person(person)?;
        }
        let vendors = SqliteVendorRepository::try_new(&tx)?;
        for vendor in &snapshot.vendors {
            vendors.create_vendor(vendor)?;
        }
        let items = SqliteTimelineRepository::try_new(&tx)?;
        for item in &snapshot.timeline_items {
            items.create_item(item)?;
        }
        let tasks = SqliteTaskRepository::try_new(&tx)?;
        for task in &snapshot.tasks {
            tasks.create_task(task)?;
        }
        let documents = SqliteDocumentRepository::try_new(&tx)?;
        for document in &snapshot.documents {
            documents.create_document(document)?;
        }
        let drive = SqliteDriveConfigRepository::try_new(&tx)?;
        for config in &snapshot.drive_configs {
            drive.upsert_config(config)?;
        }

        let settings = SqliteSettingsRepository::try_new(&tx)?;
        match &snapshot.current_event_id {
            Some(id) => settings.set(CURRENT_EVENT_KEY, id)?,
            None => settings.delete(CURRENT_EVENT_KEY)?,
        }
    }

    tx.commit()?;
    info!(
        "event=backup_restore module=backup status=ok events={} tasks={}",
        snapshot.events.len(),
        snapshot.tasks.len()
    );
    Ok(())
}

/// Writes an auto-backup file named `jourj-backup-<ISO date>.json`.
///
/// One file per day: a same-day write replaces the previous one.
pub fn write_backup_file(conn: &Connection, dir: &Path) -> BackupResult<PathBuf> {
    write_dated_file(conn, dir, BACKUP_FILE_PREFIX)
}

/// Writes a user-facing export named `jourj-export-<ISO date>.json`.
pub fn write_export_file(conn: &Connection, dir: &Path) -> BackupResult<PathBuf> {
    write_dated_file(conn, dir, EXPORT_FILE_PREFIX)
}

fn write_dated_file(conn: &Connection, dir: &Path, prefix: &str) -> BackupResult<PathBuf> {
    let blob = create_backup(conn)?;
    fs::create_dir_all(dir)?;
    let date = Local::now().date_naive();
    let path = dir.join(format!("{prefix}{date}.json"));
    fs::write(&path, blob)?;
    Ok(path)
}

/// Sums the size of all auto-backup files in `dir`.
pub fn estimate_usage_bytes(dir: &Path) -> BackupResult<u64> {
    Ok(backup_files(dir)?
        .into_iter()
        .map(|(_, size, _)| size)
        .sum())
}

/// Removes the oldest auto-backup files while usage exceeds 80% of the quota.
///
/// The newest auto-backup always survives, so pruning never leaves zero
/// restore points even when a single file exceeds the threshold on its own.
/// Returns the removed paths. Export files are never touched.
pub fn optimize_storage(dir: &Path) -> BackupResult<Vec<PathBuf>> {
    let threshold = STORAGE_QUOTA_BYTES * USAGE_THRESHOLD_PERCENT / 100;
    let mut files = backup_files(dir)?;
    // Oldest first.
    files.sort_by_key(|(_, _, modified)| *modified);

    let mut usage: u64 = files.iter().map(|(_, size, _)| size).sum();
    let mut removed = Vec::new();

    let prunable = files.len().saturating_sub(1);
    let mut queue = files.into_iter().take(prunable);
    while usage > threshold {
        let Some((path, size, _)) = queue.next() else {
            break;
        };
        fs::remove_file(&path)?;
        usage = usage.saturating_sub(size);
        warn!(
            "event=storage_optimize module=backup status=pruned file={} freed_bytes={size}",
            path.display()
        );
        removed.push(path);
    }

    Ok(removed)
}

fn backup_files(dir: &Path) -> BackupResult<Vec<(PathBuf, u64, std::time::SystemTime)>> {
    let mut files = Vec::new();
    if !dir.exists() {
        return Ok(files);
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(BACKUP_FILE_PREFIX) || !name.ends_with(".json") {
            continue;
        }
        let metadata = entry.metadata()?;
        let modified = metadata.modified()?;
        files.push((entry.path(), metadata.len(), modified));
    }

    Ok(files)
}
