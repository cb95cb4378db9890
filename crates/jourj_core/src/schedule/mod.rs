//! Timeline recalculation engine.
//!
//! # Responsibility
//! - Parse and format 24-hour `HH:MM` clock strings.
//! - Recompute a mutually consistent back-to-back schedule after reorders,
//!   insertions or duration edits.
//!
//! # Invariants
//! - Malformed clock strings are rejected with [`ScheduleError::InvalidTime`]
//!   instead of propagating garbage into derived times.
//! - Arithmetic past midnight wraps modulo 24h: `23:30` + 60min ends `00:30`.
//! - Sorting is stable: items sharing a start time keep their relative order.

use crate::model::timeline_item::TimelineItem;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MINUTES_PER_DAY: u32 = 24 * 60;

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("valid clock regex"));

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Error for clock parsing and recalculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Input does not match 24-hour `HH:MM`.
    InvalidTime(String),
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTime(value) => write!(f, "invalid time string `{value}`, expected HH:MM"),
        }
    }
}

impl Error for ScheduleError {}

/// Parses a 24-hour `HH:MM` string into minutes since midnight.
pub fn parse_clock(value: &str) -> ScheduleResult<u32> {
    let captures = CLOCK_RE
        .captures(value)
        .ok_or_else(|| ScheduleError::InvalidTime(value.to_string()))?;

    // The regex guarantees both groups are short digit runs.
    let hours: u32 = captures[1].parse().expect("regex-validated hours");
    let minutes: u32 = captures[2].parse().expect("regex-validated minutes");
    Ok(hours * 60 + minutes)
}

/// Formats minutes since midnight as zero-padded `HH:MM`, reduced modulo 24h.
pub fn format_clock(minutes: u32) -> String {
    let wrapped = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Returns the end time of an activity starting at `start` and lasting
/// `duration_minutes`.
///
/// Totals past midnight wrap into the next day: `"23:30"` + 60 → `"00:30"`.
pub fn calculate_end_time(start: &str, duration_minutes: u32) -> ScheduleResult<String> {
    let start_minutes = parse_clock(start)?;
    Ok(format_clock(start_minutes + duration_minutes))
}

/// Recomputes a gap-free, overlap-free schedule in place.
///
/// Items are stable-sorted by their current `time`; the earliest item keeps
/// its time as the anchor, every following item starts when the previous one
/// ends, and `order_index` is renumbered from 0. Applying the pass twice with
/// no intervening edits is a no-op, as long as the compressed schedule stays
/// within one day; once the chain wraps past midnight the wrapped times no
/// longer sort after their predecessors and a further pass re-anchors.
///
/// # Errors
/// Returns [`ScheduleError::InvalidTime`] without mutating anything when any
/// item carries a malformed `time`.
pub fn recalculate_timeline(items: &mut [TimelineItem]) -> ScheduleResult<()> {
    let mut starts = Vec::with_capacity(items.len());
    for item in items.iter() {
        starts.push(parse_clock(&item.time)?);
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&index| starts[index]);

    let mut cursor: Option<u32> = None;
    for (position, &index) in order.iter().enumerate() {
        let start = match cursor {
            // First item anchors the schedule at its original time.
            None => starts[index],
            Some(previous_end) => previous_end,
        };
        cursor = Some(start + items[index].duration_minutes);
        items[index].time = format_clock(start);
        items[index].order_index = position as i64;
    }

    // Present the slice in the recalculated display order.
    items.sort_by_key(|item| item.order_index);
    Ok(())
}
