//! Learner-local day arithmetic for "due today" / "due tomorrow" reporting.
//!
//! Interval math in [`super::sm2`] never sees an offset. The instant handed
//! to the scheduler is plain wall-clock time; only the labels built here are
//! bucketed into the learner's calendar days.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::CardMemoryState;

/// Real-world offsets span UTC-12:00 to UTC+14:00. Anything wider is clamped.
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Returns the instant the scheduler should use as "now".
///
/// An instant is the same everywhere, so the client offset does not move it.
/// The offset is still validated so a bogus value is noticed at the boundary.
pub fn resolve_now(server_instant: DateTime<Utc>, client_offset_minutes: i32) -> DateTime<Utc> {
    DayBoundaryResolver::new(client_offset_minutes).resolve_now(server_instant)
}

/// Day-bucketing relative to one learner's UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundaryResolver {
    offset: FixedOffset,
}

impl Default for DayBoundaryResolver {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl DayBoundaryResolver {
    /// `offset_minutes` is signed minutes east of UTC.
    pub fn new(offset_minutes: i32) -> Self {
        let clamped = offset_minutes.clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES);
        if clamped != offset_minutes {
            warn!(offset_minutes, clamped, "client day offset out of range, clamping");
        }
        let offset = FixedOffset::east_opt(clamped * 60).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn resolve_now(&self, server_instant: DateTime<Utc>) -> DateTime<Utc> {
        server_instant
    }

    /// Calendar date of `instant` on the learner's wall clock.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Instant of the learner's most recent local midnight.
    pub fn start_of_local_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = self.local_date(instant).and_time(NaiveTime::MIN);
        let utc = midnight - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        DateTime::from_naive_utc_and_offset(utc, Utc)
    }

    pub fn start_of_next_local_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.start_of_local_day(instant) + Duration::days(1)
    }

    /// Local calendar days from `now` to the card's next review. Negative when
    /// the review fell on an earlier local day.
    pub fn days_until_due(&self, state: &CardMemoryState, now: DateTime<Utc>) -> i64 {
        (self.local_date(state.next_review) - self.local_date(now)).num_days()
    }

    pub fn due_label(&self, state: &CardMemoryState, now: DateTime<Utc>) -> DueLabel {
        let days = self.days_until_due(state, now);
        if state.is_due(now) {
            if days < 0 {
                DueLabel::Overdue
            } else {
                DueLabel::Now
            }
        } else {
            match days {
                i64::MIN..=0 => DueLabel::LaterToday,
                1 => DueLabel::Tomorrow,
                n => DueLabel::InDays(n),
            }
        }
    }
}

/// Human-facing bucket for when a card is next due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DueLabel {
    /// Was due on an earlier local day
    Overdue,
    Now,
    LaterToday,
    Tomorrow,
    InDays(i64),
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueLabel::Overdue => write!(f, "overdue"),
            DueLabel::Now => write!(f, "due now"),
            DueLabel::LaterToday => write!(f, "later today"),
            DueLabel::Tomorrow => write!(f, "due tomorrow"),
            DueLabel::InDays(n) => write!(f, "in {n} days"),
        }
    }
}
