//! Entity id and timestamp helpers.
//!
//! # Responsibility
//! - Generate globally unique string ids (creation timestamp + random suffix).
//! - Provide the epoch-millisecond clock used for entity timestamps.
//!
//! # Invariants
//! - Generated ids are never reused; the store performs no duplicate check and
//!   relies on this generator (or caller-provided external ids).

use chrono::Utc;
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 8;

/// Returns the current time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generates a new entity id of the form `<epoch_ms>-<8 hex chars>`.
///
/// The timestamp keeps ids roughly sortable by creation; the random suffix
/// makes collisions within one millisecond vanishingly unlikely.
pub fn new_entity_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now_ms(), &suffix[..RANDOM_SUFFIX_LEN])
}
