//! A single submitted review, as received from the study UI.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CardId, QualityRating};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    pub card_id: CardId,
    pub quality: QualityRating,
    pub reviewed_at: DateTime<Utc>,
    /// Signed minutes east of UTC. Only used for day-bucketed reporting.
    #[serde(default)]
    pub client_day_offset_minutes: i32,
}
