//! Task domain model.
//!
//! # Invariants
//! - `completed_at` is set exactly when `status` becomes completed and cleared
//!   on any other status. The repository write path enforces this.

use crate::id::{new_entity_id, now_ms};
use crate::model::Priority;
use serde::{Deserialize, Serialize};

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Delayed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "delayed" => Some(Self::Delayed),
            _ => None,
        }
    }
}

/// A preparation task owned by an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub event_id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub assigned_person_ids: Vec<String>,
    pub assigned_vendor_ids: Vec<String>,
    pub duration_minutes: Option<u32>,
    /// Epoch milliseconds of the completion transition, `None` otherwise.
    pub completed_at: Option<i64>,
    pub notes: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Task {
    /// Creates a pending, medium-priority task with a generated id.
    pub fn new(event_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: new_entity_id(),
            event_id: Some(event_id.into()),
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            assigned_person_ids: Vec::new(),
            assigned_vendor_ids: Vec::new(),
            duration_minutes: None,
            completed_at: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
