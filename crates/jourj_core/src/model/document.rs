//! Document domain model.

use crate::id::{new_entity_id, now_ms};
use serde::{Deserialize, Serialize};

/// Where a document record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Manual,
    GoogleDrive,
}

impl DocumentSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::GoogleDrive => "google_drive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(Self::Manual),
            "google_drive" => Some(Self::GoogleDrive),
            _ => None,
        }
    }
}

/// A stored or linked file attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub event_id: Option<String>,
    /// Optional owning vendor (contracts, quotes).
    pub vendor_id: Option<String>,
    pub name: String,
    /// URL or local blob reference.
    pub file_ref: String,
    /// Mime-ish type label (`application/pdf`, ...).
    pub file_type: String,
    pub file_size_bytes: i64,
    pub category: String,
    pub source: DocumentSource,
    /// Person/vendor ids this document is shared with.
    pub assigned_to: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Document {
    /// Creates a manual document with a generated id.
    pub fn new(event_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: new_entity_id(),
            event_id: Some(event_id.into()),
            vendor_id: None,
            name: name.into(),
            file_ref: String::new(),
            file_type: String::new(),
            file_size_bytes: 0,
            category: String::new(),
            source: DocumentSource::Manual,
            assigned_to: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
