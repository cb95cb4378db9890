//! Domain model for the Jour J event-planning store.
//!
//! # Responsibility
//! - Define the canonical entity records shared by store, projector and backup.
//! - Keep status vocabularies as closed enums with stable snake_case wire names.
//!
//! # Invariants
//! - Every entity except [`event::Event`] carries an `event_id`; filtering
//!   correctness depends on that field being set at creation and never silently
//!   reassigned.
//! - Assigned-id arrays are plain id lists; dangling ids are tolerated and simply
//!   fail to resolve.

pub mod document;
pub mod drive;
pub mod event;
pub mod person;
pub mod task;
pub mod timeline_item;
pub mod vendor;

use serde::{Deserialize, Serialize};

/// Importance level shared by tasks and timeline items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}
