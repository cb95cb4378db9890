//! Event domain model.
//!
//! # Responsibility
//! - Define the top-level container that scopes every other entity.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `magic_word`, when set, grants shared team access to exactly this event.

use crate::id::{new_entity_id, now_ms};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Id reserved for the bootstrapped local event. Legacy rows without an
/// `event_id` surface under this event only.
pub const DEFAULT_EVENT_ID: &str = "default-event";

/// Top-level planning container (a wedding, a launch party, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    /// Free-form kind label (wedding, birthday, corporate, ...).
    pub event_type: String,
    pub event_date: Option<NaiveDate>,
    pub location: String,
    pub description: String,
    /// Shared secret for the team-access flow. Plain comparison, not a
    /// security boundary.
    pub magic_word: Option<String>,
    pub theme_color: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every update.
    pub updated_at: i64,
}

impl Event {
    /// Creates an event with a generated id and current timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(new_entity_id(), name)
    }

    /// Creates an event with a caller-provided id.
    ///
    /// Used by the default-event bootstrap and import paths where identity
    /// already exists externally.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: id.into(),
            name: name.into(),
            event_type: String::new(),
            event_date: None,
            location: String::new(),
            description: String::new(),
            magic_word: None,
            theme_color: None,
            created_at: now,
            updated_at: now,
        }
    }
}
