//! Google Drive connection record.
//!
//! The Drive integration is a simulated stub: no OAuth, no file transfer.
//! Only the folder reference and sync bookkeeping are persisted.

use serde::{Deserialize, Serialize};

/// Per-event Drive folder connection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveConfig {
    pub event_id: String,
    pub folder_url: String,
    /// Extracted from the folder URL.
    pub folder_id: String,
    pub connected: bool,
    /// Epoch milliseconds of the last simulated sync.
    pub last_sync_at: Option<i64>,
}
