//! Derives a card's mastery status from its memory state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::config::SchedulerConfig;
use crate::models::{CardMemoryState, MasteryStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusClassifier {
    mastery_threshold_days: u32,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

impl StatusClassifier {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            mastery_threshold_days: config.mastery_threshold_days,
        }
    }

    /// First matching rule wins: due, then never-succeeded, then mastered.
    pub fn classify(&self, state: &CardMemoryState, now: DateTime<Utc>) -> MasteryStatus {
        if state.is_due(now) {
            MasteryStatus::Due
        } else if state.repetitions == 0 {
            MasteryStatus::Learning
        } else if state.interval >= self.mastery_threshold_days {
            MasteryStatus::Mastered
        } else {
            MasteryStatus::Reviewing
        }
    }

    /// Number of cards per status. Every status is present, possibly with 0.
    pub fn counts<'a, I>(&self, states: I, now: DateTime<Utc>) -> HashMap<MasteryStatus, usize>
    where
        I: IntoIterator<Item = &'a CardMemoryState>,
    {
        let mut counts: HashMap<_, _> = MasteryStatus::ALL.iter().map(|&s| (s, 0)).collect();
        for state in states {
            *counts.entry(self.classify(state, now)).or_insert(0) += 1;
        }
        counts
    }
}

/// Classifies with the default mastery threshold.
pub fn classify(state: &CardMemoryState, now: DateTime<Utc>) -> MasteryStatus {
    StatusClassifier::default().classify(state, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn state(interval: u32, repetitions: u32, next_review: DateTime<Utc>) -> CardMemoryState {
        CardMemoryState {
            interval,
            ease_factor: 2.5,
            repetitions,
            next_review,
        }
    }

    #[test]
    fn test_due_wins_over_everything() {
        assert_eq!(classify(&state(0, 0, now()), now()), MasteryStatus::Due);
        assert_eq!(
            classify(&state(40, 6, now() - Duration::days(3)), now()),
            MasteryStatus::Due
        );
    }

    #[test]
    fn test_learning_when_never_succeeded() {
        let later = now() + Duration::minutes(10);
        assert_eq!(classify(&state(0, 0, later), now()), MasteryStatus::Learning);
    }

    #[test]
    fn test_mastered_at_threshold() {
        let later = now() + Duration::days(20);
        assert_eq!(classify(&state(20, 4, later), now()), MasteryStatus::Mastered);
        assert_eq!(classify(&state(14, 3, later), now()), MasteryStatus::Mastered);
        assert_eq!(classify(&state(13, 3, later), now()), MasteryStatus::Reviewing);
    }

    #[test]
    fn test_reviewing_in_between() {
        let later = now() + Duration::days(6);
        assert_eq!(classify(&state(6, 2, later), now()), MasteryStatus::Reviewing);
    }

    #[test]
    fn test_custom_threshold() {
        let classifier = StatusClassifier::new(&SchedulerConfig {
            mastery_threshold_days: 30,
            ..Default::default()
        });
        let later = now() + Duration::days(20);
        assert_eq!(
            classifier.classify(&state(20, 4, later), now()),
            MasteryStatus::Reviewing
        );
    }

    #[test]
    fn test_same_state_changes_status_as_time_passes() {
        let card = state(6, 2, now() + Duration::days(6));
        assert_eq!(classify(&card, now()), MasteryStatus::Reviewing);
        assert_eq!(classify(&card, now() + Duration::days(6)), MasteryStatus::Due);
    }

    #[test]
    fn test_counts() {
        let later = now() + Duration::days(1);
        let cards = [
            state(0, 0, now()),
            state(0, 0, later),
            state(6, 2, later),
            state(30, 5, later),
            state(30, 5, now() - Duration::hours(1)),
        ];
        let counts = StatusClassifier::default().counts(&cards, now());
        assert_eq!(counts[&MasteryStatus::Due], 2);
        assert_eq!(counts[&MasteryStatus::Learning], 1);
        assert_eq!(counts[&MasteryStatus::Reviewing], 1);
        assert_eq!(counts[&MasteryStatus::Mastered], 1);

        let empty = StatusClassifier::default().counts(std::iter::empty(), now());
        assert_eq!(empty.len(), 4);
        assert!(empty.values().all(|&n| n == 0));
    }
}
