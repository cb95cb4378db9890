//! Local-first data core for the Jour J event-planning application.
//! This crate is the single source of truth for business invariants.

pub mod backup;
pub mod db;
pub mod id;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use backup::{
    create_backup, export_data, restore_from_backup, BackupError, BackupResult, StoreSnapshot,
};
pub use backup::scheduler::BackupScheduler;
pub use id::new_entity_id;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Document, DocumentSource};
pub use model::drive::DriveConfig;
pub use model::event::{Event, DEFAULT_EVENT_ID};
pub use model::person::{ConfirmationStatus, Person};
pub use model::task::{Task, TaskStatus};
pub use model::timeline_item::{ItemStatus, TimelineItem};
pub use model::vendor::{ContractStatus, Vendor};
pub use model::Priority;
pub use repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
pub use repo::drive_repo::{DriveConfigRepository, SqliteDriveConfigRepository};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::timeline_repo::{SqliteTimelineRepository, TimelineRepository};
pub use repo::vendor_repo::{SqliteVendorRepository, VendorRepository};
pub use repo::{RepoError, RepoResult};
pub use schedule::{calculate_end_time, recalculate_timeline, ScheduleError, ScheduleResult};
pub use service::current_event::CurrentEventService;
pub use service::drive::{extract_folder_id, DriveError, DriveService};
pub use service::projector::{
    ActivityEntry, ActivityKind, DocumentStats, EventProjector, ProgressStats, RosterSummary,
    TimelineStats,
};
pub use service::timeline::{TimelineService, TimelineServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
