//! SM-2 (SuperMemo 2) review scheduler.
//!
//! - A "Forgot" rating is a lapse: repetitions and interval reset to 0, the
//!   easiness factor (EF) drops by a fixed penalty and the card comes back
//!   after a short delay
//! - Ratings 3-5 adjust EF with the canonical SM-2 formula and grow the
//!   interval 1 day → 6 days → previous interval × EF, capped
//! - EF never falls below 1.3
//!
//! The scheduler is pure: same inputs, same output. No clock is read here.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::config::{SECOND_INTERVAL_DAYS, SchedulerConfig};
use crate::models::{CardMemoryState, MIN_EASE_FACTOR, QualityRating, ReviewEvent};

/// Interval given to the first success after creation or a lapse.
const FIRST_INTERVAL_DAYS: u32 = 1;

/// Computes the next memory state of a card after a review.
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    config: SchedulerConfig,
}

impl ReviewScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Applies one review to `state` at instant `now`.
    pub fn apply(
        &self,
        state: &CardMemoryState,
        quality: QualityRating,
        now: DateTime<Utc>,
    ) -> CardMemoryState {
        let state = state.clone().sanitized();

        let next = if quality.is_lapse() {
            CardMemoryState {
                interval: 0,
                ease_factor: (state.ease_factor - self.config.lapse_ease_penalty)
                    .max(MIN_EASE_FACTOR),
                repetitions: 0,
                next_review: saturating_add(now, Some(self.config.lapse_delay())),
            }
        } else {
            let ease_factor = next_ease_factor(state.ease_factor, quality);
            let interval = self.next_interval(&state, ease_factor);
            CardMemoryState {
                interval,
                ease_factor,
                repetitions: state.repetitions.saturating_add(1),
                next_review: saturating_add(now, Duration::try_days(i64::from(interval))),
            }
        };

        debug!(
            quality = quality.score(),
            old_interval = state.interval,
            new_interval = next.interval,
            ease_factor = next.ease_factor,
            repetitions = next.repetitions,
            "applied review"
        );
        next
    }

    /// Applies a submitted review event. The client offset plays no part in
    /// the interval math.
    pub fn apply_event(&self, state: &CardMemoryState, event: &ReviewEvent) -> CardMemoryState {
        self.apply(state, event.quality, event.reviewed_at)
    }

    /// The state each rating would produce, in button order.
    pub fn preview(
        &self,
        state: &CardMemoryState,
        now: DateTime<Utc>,
    ) -> [(QualityRating, CardMemoryState); 4] {
        QualityRating::ALL.map(|quality| (quality, self.apply(state, quality, now)))
    }

    // Repetition-indexed growth: only the third success onward multiplies.
    fn next_interval(&self, state: &CardMemoryState, ease_factor: f64) -> u32 {
        let max = self.config.max_interval_days;
        let raw = match state.repetitions {
            0 => FIRST_INTERVAL_DAYS,
            1 => SECOND_INTERVAL_DAYS,
            _ => {
                let grown = (f64::from(state.interval) * ease_factor).round();
                if grown >= f64::from(max) {
                    max
                } else {
                    grown as u32
                }
            }
        };
        raw.min(max).max(FIRST_INTERVAL_DAYS)
    }
}

/// `now + delta`, pinned to the latest representable instant on overflow.
fn saturating_add(now: DateTime<Utc>, delta: Option<Duration>) -> DateTime<Utc> {
    delta
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// EF' = max(1.3, EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)))
fn next_ease_factor(ease_factor: f64, quality: QualityRating) -> f64 {
    let distance = f64::from(5 - quality.score());
    let adjusted = ease_factor + (0.1 - distance * (0.08 + distance * 0.02));
    adjusted.max(MIN_EASE_FACTOR)
}

/// Applies a review with the default configuration.
pub fn calculate_next_review(
    state: &CardMemoryState,
    quality: QualityRating,
    now: DateTime<Utc>,
) -> CardMemoryState {
    ReviewScheduler::default().apply(state, quality, now)
}

/// Formats an interval in days as a short button label.
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{days}d"),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
