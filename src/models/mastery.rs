//! Derived learning stage of a card. Never stored.
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MasteryStatus {
    /// `next_review` has passed
    Due,
    /// Never successfully reviewed, or lapsed
    Learning,
    Reviewing,
    /// Interval reached the retention horizon
    Mastered,
}

impl MasteryStatus {
    pub const ALL: [MasteryStatus; 4] = [
        MasteryStatus::Due,
        MasteryStatus::Learning,
        MasteryStatus::Reviewing,
        MasteryStatus::Mastered,
    ];
}

impl fmt::Display for MasteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MasteryStatus::Due => "due",
            MasteryStatus::Learning => "learning",
            MasteryStatus::Reviewing => "reviewing",
            MasteryStatus::Mastered => "mastered",
        };
        f.write_str(label)
    }
}
