//! Builds the card order for a study session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CardId, CardMemoryState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    /// Only cards whose next review has passed.
    #[default]
    Due,
    /// Every card, due ones first.
    All,
}

/// Returns card ids in study order.
///
/// Stable partition: due cards precede not-due cards and input order is kept
/// inside each group. An empty result means nothing to study.
pub fn select_for_session(
    cards: &[(CardId, CardMemoryState)],
    now: DateTime<Utc>,
    mode: SessionMode,
) -> Vec<CardId> {
    let mut due = Vec::with_capacity(cards.len());
    let mut later = Vec::new();
    for (id, state) in cards {
        if state.is_due(now) {
            due.push(*id);
        } else if mode == SessionMode::All {
            later.push(*id);
        }
    }
    due.extend(later);
    due
}

/// Number of cards due at `now`.
pub fn count_due(cards: &[(CardId, CardMemoryState)], now: DateTime<Utc>) -> usize {
    cards.iter().filter(|(_, state)| state.is_due(now)).count()
}
