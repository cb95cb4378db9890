//! Event-scoped projection layer.
//!
//! # Responsibility
//! - Filter every collection down to the active event.
//! - Compute the aggregate dashboard views (progress, summaries, recent
//!   activity, document stats, days-until-event).
//!
//! # Invariants
//! - Getters are pure functions of the current snapshot; nothing is mutated.
//! - Views are re-derived on every call rather than trusting earlier results,
//!   so a stale or not-yet-loaded event id degrades to empty views.

use crate::model::document::{Document, DocumentSource};
use crate::model::person::ConfirmationStatus;
use crate::model::task::{Task, TaskStatus};
use crate::model::timeline_item::{ItemStatus, TimelineItem};
use crate::model::vendor::ContractStatus;
use crate::model::Priority;
use crate::repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
use crate::repo::event_repo::{EventRepository, SqliteEventRepository};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::timeline_repo::{SqliteTimelineRepository, TimelineRepository};
use crate::repo::vendor_repo::{SqliteVendorRepository, VendorRepository};
use crate::repo::RepoResult;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

const CRITICAL_TASKS_CAP: usize = 5;
const UPCOMING_ITEMS_CAP: usize = 3;
const RECENT_ACTIVITY_PER_KIND: usize = 2;
const RECENT_ACTIVITY_CAP: usize = 5;

/// Task progress aggregate for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// `round(100 * completed / total)`, 0 when there are no tasks.
    pub progress_percentage: u32,
    /// High-priority tasks that are not completed.
    pub critical_tasks: usize,
}

/// Confirmation aggregate for people or vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterSummary {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
}

/// Timeline progress aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimelineStats {
    pub total_steps: usize,
    pub completed_steps: usize,
    pub critical_steps: usize,
    pub delayed_steps: usize,
    pub progress_percentage: u32,
}

/// Document collection aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    pub total: usize,
    pub total_bytes: i64,
    /// Distinct non-empty categories.
    pub categories: usize,
    pub manual: usize,
    pub google_drive: usize,
}

/// What produced a recent-activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Task,
    TimelineItem,
}

/// One line of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub id: String,
    pub title: String,
    pub kind: ActivityKind,
    /// Completion time for tasks, last update time for timeline items.
    pub timestamp: i64,
}

/// Derived read layer over the entity store for one active event.
pub struct EventProjector<'conn> {
    conn: &'conn Connection,
}

impl<'conn> EventProjector<'conn> {
    /// Constructs the projector from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let _ = SqliteTaskRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    /// Tasks of the active event, insertion order.
    pub fn tasks(&self, event_id: &str) -> RepoResult<Vec<Task>> {
        SqliteTaskRepository::try_new(self.conn)?.list_for_event(event_id)
    }

    /// Timeline items of the active event, display order.
    pub fn timeline_items(&self, event_id: &str) -> RepoResult<Vec<TimelineItem>> {
        SqliteTimelineRepository::try_new(self.conn)?.list_for_event(event_id)
    }

    /// Documents of the active event, insertion order.
    pub fn documents(&self, event_id: &str) -> RepoResult<Vec<Document>> {
        SqliteDocumentRepository::try_new(self.conn)?.list_for_event(event_id)
    }

    pub fn progress_stats(&self, event_id: &str) -> RepoResult<ProgressStats> {
        let tasks = self.tasks(event_id)?;
        let total_tasks = tasks.len();
        let completed_tasks = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count();
        let critical_tasks = tasks.iter().filter(|task| is_critical_task(task)).count();

        Ok(ProgressStats {
            total_tasks,
            completed_tasks,
            progress_percentage: percentage(completed_tasks, total_tasks),
            critical_tasks,
        })
    }

    pub fn team_summary(&self, event_id: &str) -> RepoResult<RosterSummary> {
        let people = SqlitePersonRepository::try_new(self.conn)?.list_for_event(event_id)?;
        let total = people.len();
        let confirmed = people
            .iter()
            .filter(|person| person.status == ConfirmationStatus::Confirmed)
            .count();

        Ok(RosterSummary {
            total,
            confirmed,
            pending: total - confirmed,
        })
    }

    pub fn vendors_summary(&self, event_id: &str) -> RepoResult<RosterSummary> {
        let vendors = SqliteVendorRepository::try_new(self.conn)?.list_for_event(event_id)?;
        let total = vendors.len();
        let confirmed = vendors
            .iter()
            .filter(|vendor| vendor.contract_status == ContractStatus::Signed)
            .count();

        Ok(RosterSummary {
            total,
            confirmed,
            pending: total - confirmed,
        })
    }

    /// High-priority unfinished tasks, capped to the first 5 in store order.
    pub fn critical_tasks(&self, event_id: &str) -> RepoResult<Vec<Task>> {
        let mut tasks = self.tasks(event_id)?;
        tasks.retain(is_critical_task);
        tasks.truncate(CRITICAL_TASKS_CAP);
        Ok(tasks)
    }

    /// First 3 timeline items in display order.
    pub fn upcoming_planning_items(&self, event_id: &str) -> RepoResult<Vec<TimelineItem>> {
        let mut items = self.timeline_items(event_id)?;
        items.truncate(UPCOMING_ITEMS_CAP);
        Ok(items)
    }

    pub fn timeline_stats(&self, event_id: &str) -> RepoResult<TimelineStats> {
        let items = self.timeline_items(event_id)?;
        let total_steps = items.len();
        let completed_steps = items
            .iter()
            .filter(|item| item.status == ItemStatus::Completed)
            .count();
        let critical_steps = items
            .iter()
            .filter(|item| item.priority == Priority::High && item.status != ItemStatus::Completed)
            .count();
        let delayed_steps = items
            .iter()
            .filter(|item| item.status == ItemStatus::Delayed)
            .count();

        Ok(TimelineStats {
            total_steps,
            completed_steps,
            critical_steps,
            delayed_steps,
            progress_percentage: percentage(completed_steps, total_steps),
        })
    }

    /// Merges the 2 most-recently-completed tasks with the 2 most-recently
    /// updated completed timeline items, newest first, capped to 5.
    pub fn recent_activity(&self, event_id: &str) -> RepoResult<Vec<ActivityEntry>> {
        let mut completed_tasks: Vec<ActivityEntry> = self
            .tasks(event_id)?
            .into_iter()
            .filter_map(|task| {
                task.completed_at.map(|timestamp| ActivityEntry {
                    id: task.id,
                    title: task.title,
                    kind: ActivityKind::Task,
                    timestamp,
                })
            })
            .collect();
        completed_tasks.sort_by_key(|entry| std::cmp::Reverse(entry.timestamp));
        completed_tasks.truncate(RECENT_ACTIVITY_PER_KIND);

        let mut completed_items: Vec<ActivityEntry> = self
            .timeline_items(event_id)?
            .into_iter()
            .filter(|item| item.status == ItemStatus::Completed)
            .map(|item| ActivityEntry {
                id: item.id,
                title: item.title,
                kind: ActivityKind::TimelineItem,
                timestamp: item.updated_at,
            })
            .collect();
        completed_items.sort_by_key(|entry| std::cmp::Reverse(entry.timestamp));
        completed_items.truncate(RECENT_ACTIVITY_PER_KIND);

        let mut merged = completed_tasks;
        merged.extend(completed_items);
        merged.sort_by_key(|entry| std::cmp::Reverse(entry.timestamp));
        merged.truncate(RECENT_ACTIVITY_CAP);
        Ok(merged)
    }

    /// Whole days from today until the event date, clamped at 0.
    ///
    /// Returns 0 when the event row does not exist (e.g. an id selected via a
    /// share token before the event list loaded) or carries no date.
    pub fn days_until_event(&self, event_id: &str) -> RepoResult<i64> {
        let events = SqliteEventRepository::try_new(self.conn)?;
        let Some(event) = events.get_event(event_id)? else {
            return Ok(0);
        };
        let Some(event_date) = event.event_date else {
            return Ok(0);
        };

        Ok(days_until(event_date, Local::now().date_naive()))
    }

    pub fn document_stats(&self, event_id: &str) -> RepoResult<DocumentStats> {
        let documents = self.documents(event_id)?;
        let total = documents.len();
        let total_bytes = documents.iter().map(|doc| doc.file_size_bytes).sum();
        let mut categories: Vec<&str> = documents
            .iter()
            .map(|doc| doc.category.as_str())
            .filter(|category| !category.is_empty())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        let manual = documents
            .iter()
            .filter(|doc| doc.source == DocumentSource::Manual)
            .count();
        let google_drive = total - manual;

        Ok(DocumentStats {
            total,
            total_bytes,
            categories: categories.len(),
            manual,
            google_drive,
        })
    }
}

fn is_critical_task(task: &Task) -> bool {
    task.priority == Priority::High && task.status != TaskStatus::Completed
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

/// Days between `today` and `event_date`, never negative.
fn days_until(event_date: NaiveDate, today: NaiveDate) -> i64 {
    (event_date - today).num_days().max(0)
}
