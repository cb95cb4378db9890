//! Person (team member / guest) domain model.

use crate::id::{new_entity_id, now_ms};
use serde::{Deserialize, Serialize};

/// Confirmation state of a team member or guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Confirmed,
    Pending,
    Declined,
}

impl ConfirmationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::Declined => "declined",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(Self::Confirmed),
            "pending" => Some(Self::Pending),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

/// A person attached to an event: bride, groom, planner, photographer,
/// caterer, guest, family member...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    /// Owning event. `None`/empty surfaces only under the default event.
    pub event_id: Option<String>,
    pub name: String,
    /// Free-form role label, also used as a timeline assignment fallback.
    pub role: String,
    pub email: String,
    pub phone: String,
    pub availability: String,
    pub status: ConfirmationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Person {
    /// Creates a pending person with a generated id.
    pub fn new(event_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: new_entity_id(),
            event_id: Some(event_id.into()),
            name: name.into(),
            role: String::new(),
            email: String::new(),
            phone: String::new(),
            availability: String::new(),
            status: ConfirmationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
