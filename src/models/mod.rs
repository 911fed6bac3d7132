pub mod card_state;
pub mod mastery;
pub mod quality;
pub mod review_event;

pub use card_state::{CardMemoryState, DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR};
pub use mastery::MasteryStatus;
pub use quality::QualityRating;
pub use review_event::ReviewEvent;

/// Identifier of a card in the external store.
pub type CardId = i64;
