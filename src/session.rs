//! Study session driver.
//!
//! Walks the cards selected for a session, applies each rating
//! optimistically and keeps a pending marker until the persisted result is
//! reconciled. Lapsed cards come back in a later round once their lapse
//! delay has passed.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::models::{CardId, CardMemoryState, MasteryStatus, QualityRating};
use crate::scheduler::{
    ReviewScheduler, SchedulerConfig, SessionMode, StatusClassifier, count_due,
    select_for_session,
};

/// A review applied locally whose authoritative result has not come back yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingReview {
    pub prior: CardMemoryState,
    pub quality: QualityRating,
    pub reviewed_at: DateTime<Utc>,
    pub optimistic: CardMemoryState,
}

pub struct StudySession {
    cards: Vec<(CardId, CardMemoryState)>,
    index_by_id: HashMap<CardId, usize>,
    current_round: Vec<usize>,
    current_index: usize,
    pending: HashMap<CardId, PendingReview>,
    reviewed: HashSet<CardId>,
    scheduler: ReviewScheduler,
    classifier: StatusClassifier,
    round_number: usize,
    reviews_completed: u64,
}

impl StudySession {
    /// Starts a session over `cards`. Duplicate ids keep their first state.
    pub fn new(
        cards: Vec<(CardId, CardMemoryState)>,
        now: DateTime<Utc>,
        mode: SessionMode,
        config: SchedulerConfig,
    ) -> Self {
        let mut unique = Vec::with_capacity(cards.len());
        let mut index_by_id = HashMap::with_capacity(cards.len());
        for (id, state) in cards {
            if index_by_id.contains_key(&id) {
                warn!(card_id = id, "duplicate card in session input, ignoring");
                continue;
            }
            index_by_id.insert(id, unique.len());
            unique.push((id, state.sanitized()));
        }

        let mut session = Self {
            cards: unique,
            index_by_id,
            current_round: Vec::new(),
            current_index: 0,
            pending: HashMap::new(),
            reviewed: HashSet::new(),
            classifier: StatusClassifier::new(&config),
            scheduler: ReviewScheduler::new(config),
            round_number: 1,
            reviews_completed: 0,
        };
        session.current_round = session.build_round(now, mode);
        info!(
            cards = session.cards.len(),
            queued = session.current_round.len(),
            ?mode,
            "study session started"
        );
        session
    }

    fn build_round(&self, now: DateTime<Utc>, mode: SessionMode) -> Vec<usize> {
        select_for_session(&self.cards, now, mode)
            .into_iter()
            .filter_map(|id| self.index_by_id.get(&id).copied())
            .collect()
    }

    pub fn current_card(&self) -> Option<(CardId, &CardMemoryState)> {
        self.current_round
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
            .map(|(id, state)| (*id, state))
    }

    /// Rates the current card and moves on. Returns the optimistic new state,
    /// which the caller persists and later confirms with [`Self::reconcile`].
    pub fn submit(
        &mut self,
        quality: QualityRating,
        now: DateTime<Utc>,
    ) -> Result<CardMemoryState, SessionError> {
        let &idx = self
            .current_round
            .get(self.current_index)
            .ok_or(SessionError::SessionFinished)?;
        let (card_id, prior) = self.cards[idx].clone();
        if self.pending.contains_key(&card_id) {
            return Err(SessionError::ReviewInFlight(card_id));
        }

        let optimistic = self.scheduler.apply(&prior, quality, now);
        debug!(card_id, quality = quality.score(), "review applied optimistically");

        self.pending.insert(
            card_id,
            PendingReview {
                prior,
                quality,
                reviewed_at: now,
                optimistic: optimistic.clone(),
            },
        );
        self.reviewed.insert(card_id);
        self.cards[idx].1 = optimistic.clone();
        self.current_index += 1;
        self.reviews_completed += 1;
        Ok(optimistic)
    }

    /// Adopts the persisted result of a pending review. Returns whether it
    /// agreed with the optimistic guess.
    pub fn reconcile(
        &mut self,
        card_id: CardId,
        authoritative: CardMemoryState,
    ) -> Result<bool, SessionError> {
        let &idx = self
            .index_by_id
            .get(&card_id)
            .ok_or(SessionError::UnknownCard(card_id))?;
        let pending = self
            .pending
            .remove(&card_id)
            .ok_or(SessionError::NoPendingReview(card_id))?;

        let authoritative = authoritative.sanitized();
        let matched = authoritative == pending.optimistic;
        if !matched {
            warn!(
                card_id,
                optimistic_interval = pending.optimistic.interval,
                authoritative_interval = authoritative.interval,
                "persisted review differs from optimistic result"
            );
        }
        self.cards[idx].1 = authoritative;
        Ok(matched)
    }

    pub fn pending(&self, card_id: CardId) -> Option<&PendingReview> {
        self.pending.get(&card_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_round_finished(&self) -> bool {
        self.current_index >= self.current_round.len()
    }

    /// Starts a new round with the cards due at `now`, typically lapsed
    /// ones whose delay has passed. Returns false if the current round is
    /// still running or nothing is due.
    pub fn next_round(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_round_finished() {
            return false;
        }
        let due = self.build_round(now, SessionMode::Due);
        if due.is_empty() {
            return false;
        }

        self.current_round = due;
        self.current_index = 0;
        self.round_number += 1;
        info!(
            round = self.round_number,
            cards = self.current_round.len(),
            "study session round started"
        );
        true
    }

    /// True when the round is done and no card is due at `now`.
    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.is_round_finished() && self.remaining_due(now) == 0
    }

    pub fn remaining_in_round(&self) -> usize {
        self.current_round.len().saturating_sub(self.current_index)
    }

    pub fn remaining_due(&self, now: DateTime<Utc>) -> usize {
        count_due(&self.cards, now)
    }

    pub fn status(&self, card_id: CardId, now: DateTime<Utc>) -> Option<MasteryStatus> {
        self.index_by_id
            .get(&card_id)
            .map(|&idx| self.classifier.classify(&self.cards[idx].1, now))
    }

    pub fn status_counts(&self, now: DateTime<Utc>) -> HashMap<MasteryStatus, usize> {
        self.classifier.counts(self.cards.iter().map(|(_, state)| state), now)
    }

    /// Ids of cards reviewed at least once in this session.
    pub fn reviewed_cards(&self) -> &HashSet<CardId> {
        &self.reviewed
    }

    pub fn round_number(&self) -> usize {
        self.round_number
    }

    pub fn reviews_completed(&self) -> u64 {
        self.reviews_completed
    }

    pub fn cards(&self) -> &[(CardId, CardMemoryState)] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<(CardId, CardMemoryState)> {
        self.cards
    }
}
