//! Persisted scheduling state of one flashcard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Hard floor for the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Ease factor given to newly created cards.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Everything the scheduler knows about a card. Card content and deck
/// membership live elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredCardState")]
pub struct CardMemoryState {
    /// Days until the next review assuming success. 0 means due immediately.
    pub interval: u32,
    pub ease_factor: f64,
    /// Consecutive successful reviews since creation or the last lapse.
    pub repetitions: u32,
    pub next_review: DateTime<Utc>,
}

impl CardMemoryState {
    /// Default state for a card just added to a deck.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::new_with_ease(now, DEFAULT_EASE_FACTOR)
    }

    pub fn new_with_ease(now: DateTime<Utc>, ease_factor: f64) -> Self {
        Self {
            interval: 0,
            ease_factor,
            repetitions: 0,
            next_review: now,
        }
        .sanitized()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// Re-applies the ease floor to a state that may come from a corrupted
    /// store. Never fails; logs what it had to fix.
    pub fn sanitized(mut self) -> Self {
        if !self.ease_factor.is_finite() {
            warn!(
                ease_factor = self.ease_factor,
                "non-finite ease factor in card state, resetting to default"
            );
            self.ease_factor = DEFAULT_EASE_FACTOR;
        } else if self.ease_factor < MIN_EASE_FACTOR {
            warn!(
                ease_factor = self.ease_factor,
                "ease factor below floor in card state, clamping"
            );
            self.ease_factor = MIN_EASE_FACTOR;
        }
        self
    }
}

/// Wire shape of a card state as found in storage, before invariants are
/// enforced.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCardState {
    interval: i64,
    ease_factor: f64,
    repetitions: i64,
    next_review: DateTime<Utc>,
}

fn clamp_counter(field: &'static str, value: i64) -> u32 {
    if value < 0 {
        warn!(field, value, "negative counter in card state, clamping to 0");
        return 0;
    }
    u32::try_from(value).unwrap_or_else(|_| {
        warn!(field, value, "counter overflow in card state, saturating");
        u32::MAX
    })
}

impl From<StoredCardState> for CardMemoryState {
    fn from(stored: StoredCardState) -> Self {
        CardMemoryState {
            interval: clamp_counter("interval", stored.interval),
            ease_factor: stored.ease_factor,
            repetitions: clamp_counter("repetitions", stored.repetitions),
            next_review: stored.next_review,
        }
        .sanitized()
    }
}
