//! Timeline use-case service: reorder and recalculation persistence.
//!
//! # Responsibility
//! - Move items within one event's timeline and keep the schedule consistent.
//! - Persist recalculated `time`/`order_index` values atomically.
//!
//! # Invariants
//! - Indices address the event-filtered sequence only; items of other events
//!   are never touched by a reorder.
//! - Schedule writes for one pass happen in a single transaction; a failure
//!   leaves the stored timeline unchanged.

use crate::model::timeline_item::TimelineItem;
use crate::repo::timeline_repo::{SqliteTimelineRepository, TimelineRepository};
use crate::repo::RepoError;
use crate::schedule::{recalculate_timeline, ScheduleError};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TimelineServiceResult<T> = Result<T, TimelineServiceError>;

/// Error for timeline reorder/recalculation use-cases.
#[derive(Debug)]
pub enum TimelineServiceError {
    /// `from`/`to` does not address the event-filtered sequence.
    IndexOutOfRange { index: usize, len: usize },
    Schedule(ScheduleError),
    Repo(RepoError),
}

impl Display for TimelineServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for timeline of length {len}")
            }
            Self::Schedule(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TimelineServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IndexOutOfRange { .. } => None,
            Self::Schedule(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ScheduleError> for TimelineServiceError {
    fn from(value: ScheduleError) -> Self {
        Self::Schedule(value)
    }
}

impl From<RepoError> for TimelineServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for TimelineServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Use-case service for one event's timeline schedule.
pub struct TimelineService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> TimelineService<'conn> {
    /// Constructs the service from a migrated/ready connection.
    ///
    /// Takes the connection mutably: schedule persistence runs in a
    /// transaction.
    pub fn try_new(conn: &'conn mut Connection) -> TimelineServiceResult<Self> {
        let _ = SqliteTimelineRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    /// Moves the item at `from` to position `to` within the event's timeline,
    /// recalculates the schedule and persists it.
    pub fn reorder(
        &mut self,
        event_id: &str,
        from: usize,
        to: usize,
    ) -> TimelineServiceResult<()> {
        let mut items = {
            let repo = SqliteTimelineRepository::try_new(self.conn)?;
            repo.list_for_event(event_id)?
        };

        let len = items.len();
        if from >= len {
            return Err(TimelineServiceError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(TimelineServiceError::IndexOutOfRange { index: to, len });
        }

        let moved = items.remove(from);
        items.insert(to, moved);
        // Re-anchor display positions before recalculation so the stable sort
        // sees the requested order for items sharing a start time.
        for (position, item) in items.iter_mut().enumerate() {
            item.order_index = position as i64;
        }

        recalculate_timeline(&mut items)?;
        self.persist_schedule(event_id, from, to, &items)
    }

    /// Recalculates the event's schedule after time/duration edits and
    /// persists it.
    pub fn recalculate(&mut self, event_id: &str) -> TimelineServiceResult<()> {
        let mut items = {
            let repo = SqliteTimelineRepository::try_new(self.conn)?;
            repo.list_for_event(event_id)?
        };

        recalculate_timeline(&mut items)?;

        let tx = self.conn.transaction()?;
        {
            let repo = SqliteTimelineRepository::try_new(&tx)?;
            for item in &items {
                repo.update_schedule_fields(&item.id, &item.time, item.order_index)?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn persist_schedule(
        &mut self,
        event_id: &str,
        from: usize,
        to: usize,
        items: &[TimelineItem],
    ) -> TimelineServiceResult<()> {
        let tx = self.conn.transaction()?;
        {
            let repo = SqliteTimelineRepository::try_new(&tx)?;
            for item in items {
                repo.update_schedule_fields(&item.id, &item.time, item.order_index)?;
            }
        }
        tx.commit()?;

        info!(
            "event=timeline_reorder module=timeline status=ok event_id={event_id} from={from} to={to} items={}",
            items.len()
        );
        Ok(())
    }
}
