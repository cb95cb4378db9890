//! Current-event selection.
//!
//! # Responsibility
//! - Track which event is active, persisted so a restart resumes the context.
//! - Bootstrap the default event on first use.
//! - Resolve shared magic words into an active-event selection.
//!
//! # Invariants
//! - `set_current_event_id` never validates that the id resolves to a stored
//!   event: magic-word/shared-token flows set the id before event data has
//!   loaded, and the projector tolerates the gap.

use crate::model::event::{Event, DEFAULT_EVENT_ID};
use crate::repo::event_repo::{EventRepository, SqliteEventRepository};
use crate::repo::settings_repo::{SettingsRepository, SqliteSettingsRepository, CURRENT_EVENT_KEY};
use crate::repo::RepoResult;
use chrono::Local;
use log::info;
use rusqlite::Connection;

/// Use-case service for the persisted current-event selection.
pub struct CurrentEventService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> CurrentEventService<'conn> {
    /// Constructs the service from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let _ = SqliteSettingsRepository::try_new(conn)?;
        let _ = SqliteEventRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    /// Returns the active event id, bootstrapping the default event on first
    /// use.
    ///
    /// # Side effects
    /// - Persists `"default-event"` as the selection when none is stored.
    /// - Synthesizes the default event row (today's date, placeholder text)
    ///   when it does not exist yet.
    pub fn current_event_id(&self) -> RepoResult<String> {
        let settings = SqliteSettingsRepository::try_new(self.conn)?;
        if let Some(id) = settings.get(CURRENT_EVENT_KEY)? {
            return Ok(id);
        }

        let events = SqliteEventRepository::try_new(self.conn)?;
        if events.get_event(DEFAULT_EVENT_ID)?.is_none() {
            let mut event = Event::with_id(DEFAULT_EVENT_ID, "My event");
            event.description = "Locally created event".to_string();
            event.event_date = Some(Local::now().date_naive());
            events.create_event(&event)?;
            info!("event=default_event_bootstrap module=current_event status=ok");
        }

        settings.set(CURRENT_EVENT_KEY, DEFAULT_EVENT_ID)?;
        Ok(DEFAULT_EVENT_ID.to_string())
    }

    /// Persists the active event id immediately, without existence checks.
    pub fn set_current_event_id(&self, id: &str) -> RepoResult<()> {
        let settings = SqliteSettingsRepository::try_new(self.conn)?;
        settings.set(CURRENT_EVENT_KEY, id)
    }

    /// Resolves a magic word and, on a match, selects that event.
    ///
    /// Unknown words return `None` and leave the selection untouched.
    pub fn enter_with_magic_word(&self, word: &str) -> RepoResult<Option<String>> {
        let events = SqliteEventRepository::try_new(self.conn)?;
        let Some(event) = events.find_by_magic_word(word)? else {
            info!("event=magic_word_entry module=current_event status=rejected");
            return Ok(None);
        };

        self.set_current_event_id(&event.id)?;
        info!(
            "event=magic_word_entry module=current_event status=ok event_id={}",
            event.id
        );
        Ok(Some(event.id))
    }
}
