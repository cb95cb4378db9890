//! Google Drive stub service.
//!
//! # Responsibility
//! - Extract folder ids from Drive folder URLs.
//! - Track per-event connection state.
//! - Simulate a sync by materializing a fixed pair of documents.
//!
//! This is deliberately a stub: no OAuth, no network, no file transfer.

use crate::id::now_ms;
use crate::model::document::{Document, DocumentSource};
use crate::model::drive::DriveConfig;
use crate::repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
use crate::repo::drive_repo::{DriveConfigRepository, SqliteDriveConfigRepository};
use crate::repo::RepoError;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

static FOLDER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/folders/([A-Za-z0-9_-]+)").expect("valid folder id regex"));

pub type DriveResult<T> = Result<T, DriveError>;

/// Error for Drive stub use-cases.
#[derive(Debug)]
pub enum DriveError {
    /// URL does not contain an extractable `/folders/<id>` segment.
    InvalidFolderUrl(String),
    /// Sync requested for an event without a connected folder.
    NotConnected(String),
    Repo(RepoError),
}

impl Display for DriveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFolderUrl(url) => write!(f, "no Drive folder id in url `{url}`"),
            Self::NotConnected(event_id) => {
                write!(f, "no connected Drive folder for event {event_id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DriveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DriveError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Extracts the folder id from a Drive folder URL.
pub fn extract_folder_id(url: &str) -> Option<String> {
    FOLDER_ID_RE
        .captures(url)
        .map(|captures| captures[1].to_string())
}

/// Use-case service for the simulated Drive integration.
pub struct DriveService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> DriveService<'conn> {
    /// Constructs the service from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> DriveResult<Self> {
        let _ = SqliteDriveConfigRepository::try_new(conn)?;
        let _ = SqliteDocumentRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    /// Connects an event to a Drive folder URL.
    pub fn connect(&self, event_id: &str, folder_url: &str) -> DriveResult<DriveConfig> {
        let folder_id = extract_folder_id(folder_url)
            .ok_or_else(|| DriveError::InvalidFolderUrl(folder_url.to_string()))?;

        let config = DriveConfig {
            event_id: event_id.to_string(),
            folder_url: folder_url.to_string(),
            folder_id,
            connected: true,
            last_sync_at: None,
        };
        SqliteDriveConfigRepository::try_new(self.conn)?.upsert_config(&config)?;
        info!(
            "event=drive_connect module=drive status=ok event_id={event_id} folder_id={}",
            config.folder_id
        );
        Ok(config)
    }

    /// Flips the connection off, keeping the folder reference.
    pub fn disconnect(&self, event_id: &str) -> DriveResult<()> {
        let repo = SqliteDriveConfigRepository::try_new(self.conn)?;
        let Some(mut config) = repo.get_config(event_id)? else {
            return Err(DriveError::NotConnected(event_id.to_string()));
        };

        config.connected = false;
        repo.upsert_config(&config)?;
        Ok(())
    }

    /// Returns the stored config for an event, if any.
    pub fn config(&self, event_id: &str) -> DriveResult<Option<DriveConfig>> {
        Ok(SqliteDriveConfigRepository::try_new(self.conn)?.get_config(event_id)?)
    }

    /// Simulates a folder sync: inserts a fixed pair of documents tagged with
    /// `source = google_drive` and stamps `last_sync_at`.
    pub fn sync(&self, event_id: &str) -> DriveResult<Vec<Document>> {
        let configs = SqliteDriveConfigRepository::try_new(self.conn)?;
        let Some(mut config) = configs.get_config(event_id)? else {
            return Err(DriveError::NotConnected(event_id.to_string()));
        };
        if !config.connected {
            return Err(DriveError::NotConnected(event_id.to_string()));
        }

        let documents = SqliteDocumentRepository::try_new(self.conn)?;
        let synced = vec![
            mock_document(event_id, "Planning checklist.pdf", "application/pdf", 24_576),
            mock_document(
                event_id,
                "Venue floor plan.png",
                "image/png",
                1_048_576,
            ),
        ];
        for document in &synced {
            documents.create_document(document)?;
        }

        config.last_sync_at = Some(now_ms());
        configs.upsert_config(&config)?;
        info!(
            "event=drive_sync module=drive status=ok event_id={event_id} documents={}",
            synced.len()
        );
        Ok(synced)
    }
}

fn mock_document(event_id: &str, name: &str, file_type: &str, size: i64) -> Document {
    let mut document = Document::new(event_id, name);
    document.file_type = file_type.to_string();
    document.file_size_bytes = size;
    document.category = "drive".to_string();
    document.source = DocumentSource::GoogleDrive;
    document
}

#[cfg(test)]
mod tests {
    use super::extract_folder_id;

    #[test]
    fn extracts_folder_id_from_share_url() {
        let url = "https://drive.google.com/drive/folders/1aB_c-D2eF3?usp=sharing";
        assert_eq!(extract_folder_id(url).as_deref(), Some("1aB_c-D2eF3"));
    }

    #[test]
    fn rejects_urls_without_folder_segment() {
        assert_eq!(extract_folder_id("https://drive.google.com/file/d/xyz"), None);
        assert_eq!(extract_folder_id(""), None);
    }
}
