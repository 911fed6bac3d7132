//! JSON import/export of deck scheduling state.
//! A deck file holds the memory state of every card, keyed by card id.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExportError;
use crate::models::{CardId, CardMemoryState};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    pub state: CardMemoryState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckState {
    pub name: String,
    #[serde(default)]
    pub cards: Vec<CardRecord>,
}

impl DeckState {
    /// A deck of `card_count` new cards with ids 1..=card_count.
    pub fn new(name: impl Into<String>, card_count: u32, now: DateTime<Utc>, ease: f64) -> Self {
        let cards = (1..=CardId::from(card_count))
            .map(|id| CardRecord {
                id,
                state: CardMemoryState::new_with_ease(now, ease),
            })
            .collect();
        Self {
            name: name.into(),
            cards,
        }
    }

    pub fn get(&self, id: CardId) -> Option<&CardMemoryState> {
        self.cards.iter().find(|c| c.id == id).map(|c| &c.state)
    }

    /// Replaces a card's state. Returns false if the card is not in the deck.
    pub fn update(&mut self, id: CardId, state: CardMemoryState) -> bool {
        match self.cards.iter_mut().find(|c| c.id == id) {
            Some(record) => {
                record.state = state;
                true
            }
            None => false,
        }
    }

    pub fn to_pairs(&self) -> Vec<(CardId, CardMemoryState)> {
        self.cards.iter().map(|c| (c.id, c.state.clone())).collect()
    }
}

/// Exports a deck to a JSON file at the specified path.
pub fn export_json_to_path(deck: &DeckState, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let json_string = serde_json::to_string_pretty(deck).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json_string).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Imports a deck from a JSON file. Corrupted card states are clamped on read.
pub fn import_json(path: impl AsRef<Path>) -> Result<DeckState, ExportError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let deck: DeckState = serde_json::from_str(&contents).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    info!(deck = %deck.name, cards = deck.cards.len(), path = %path.display(), "deck imported");
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 12, 7, 0, 0).unwrap()
    }

    #[test]
    fn test_new_deck() {
        let deck = DeckState::new("Biology", 3, t0(), 2.5);
        assert_eq!(deck.cards.len(), 3);
        assert_eq!(
            deck.cards.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(deck.get(2), Some(&CardMemoryState::new(t0())));
        assert_eq!(deck.get(4), None);
    }

    #[test]
    fn test_new_deck_edge_counts() {
        assert!(DeckState::new("Empty", 0, t0(), 2.5).cards.is_empty());

        let deck = DeckState::new("Large", 5_000, t0(), 2.5);
        assert_eq!(deck.cards.len(), 5_000);
        assert_eq!(deck.cards.last().map(|c| c.id), Some(5_000));
    }

    #[test]
    fn test_update() {
        let mut deck = DeckState::new("Biology", 2, t0(), 2.5);
        let mut state = CardMemoryState::new(t0());
        state.interval = 6;
        assert!(deck.update(2, state.clone()));
        assert_eq!(deck.get(2), Some(&state));
        assert!(!deck.update(9, state));
    }

    #[test]
    fn test_export_and_import_keep_states() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.json");
        let mut deck = DeckState::new("History", 2, t0(), 2.5);
        deck.update(
            1,
            CardMemoryState {
                interval: 6,
                ease_factor: 2.6,
                repetitions: 2,
                next_review: t0() + chrono::Duration::days(6),
            },
        );

        export_json_to_path(&deck, &path).unwrap();
        let imported = import_json(&path).unwrap();
        assert_eq!(imported, deck);
    }

    #[test]
    fn test_import_clamps_corrupted_states() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.json");
        let json_content = r#"{
  "name": "Chemistry",
  "cards": [
    {
      "id": 4,
      "state": {
        "interval": -3,
        "easeFactor": 1.1,
        "repetitions": 2,
        "nextReview": "2024-02-12T07:00:00Z"
      }
    }
  ]
}"#;
        fs::write(&path, json_content).unwrap();

        let deck = import_json(&path).unwrap();
        let state = deck.get(4).unwrap();
        assert_eq!(state.interval, 0);
        assert_eq!(state.ease_factor, 1.3);
        assert_eq!(state.repetitions, 2);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json("nonexistent_file_xyz123.json");
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_json(&path), Err(ExportError::Json { .. })));
    }
}
