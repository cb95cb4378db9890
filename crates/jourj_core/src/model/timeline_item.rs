//! Timeline item domain model.
//!
//! # Invariants
//! - Within one event, `order_index` induces a total order consistent with
//!   non-decreasing `time` after any recalculation pass.
//! - `time` uses 24-hour `HH:MM`; the schedule engine validates it at use.

use crate::id::{new_entity_id, now_ms};
use crate::model::Priority;
use serde::{Deserialize, Serialize};

/// Execution state of a scheduled activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Scheduled,
    InProgress,
    Completed,
    Delayed,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(Self::Scheduled),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "delayed" => Some(Self::Delayed),
            _ => None,
        }
    }
}

/// A scheduled activity on the day-of timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: String,
    pub event_id: Option<String>,
    pub title: String,
    pub description: String,
    /// Start time, 24-hour `HH:MM`.
    pub time: String,
    pub duration_minutes: u32,
    pub category: String,
    pub status: ItemStatus,
    pub priority: Priority,
    /// Explicitly assigned people. Order irrelevant, dangling ids tolerated.
    pub assigned_person_ids: Vec<String>,
    pub assigned_vendor_ids: Vec<String>,
    /// Fallback role match when no explicit person is assigned.
    pub assigned_role: Option<String>,
    /// Per-event display position, renumbered by recalculation.
    pub order_index: i64,
    pub notes: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TimelineItem {
    /// Creates a scheduled, medium-priority item with a generated id.
    pub fn new(
        event_id: impl Into<String>,
        title: impl Into<String>,
        time: impl Into<String>,
        duration_minutes: u32,
    ) -> Self {
        let now = now_ms();
        Self {
            id: new_entity_id(),
            event_id: Some(event_id.into()),
            title: title.into(),
            description: String::new(),
            time: time.into(),
            duration_minutes,
            category: String::new(),
            status: ItemStatus::Scheduled,
            priority: Priority::Medium,
            assigned_person_ids: Vec::new(),
            assigned_vendor_ids: Vec::new(),
            assigned_role: None,
            order_index: 0,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
