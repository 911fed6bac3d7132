//! The learner's self-assessment of a single review.
//!
//! The study UI offers exactly four buttons, so only the four canonical SM-2
//! scores are representable. Scores 1 and 2 are rejected rather than rounded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityRating {
    Forgot,
    Struggled,
    GotIt,
    TooEasy,
}

impl QualityRating {
    /// All ratings in button order.
    pub const ALL: [QualityRating; 4] = [
        QualityRating::Forgot,
        QualityRating::Struggled,
        QualityRating::GotIt,
        QualityRating::TooEasy,
    ];

    /// Builds a rating from a raw SM-2 quality score.
    pub fn from_score(score: i64) -> Result<Self, SchedulerError> {
        match score {
            0 => Ok(QualityRating::Forgot),
            3 => Ok(QualityRating::Struggled),
            4 => Ok(QualityRating::GotIt),
            5 => Ok(QualityRating::TooEasy),
            other => Err(SchedulerError::InvalidQuality(other)),
        }
    }

    pub fn score(self) -> u8 {
        match self {
            QualityRating::Forgot => 0,
            QualityRating::Struggled => 3,
            QualityRating::GotIt => 4,
            QualityRating::TooEasy => 5,
        }
    }

    /// A lapse resets the card's progress.
    pub fn is_lapse(self) -> bool {
        self.score() < 3
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityRating::Forgot => "Forgot",
            QualityRating::Struggled => "Struggled",
            QualityRating::GotIt => "Got it",
            QualityRating::TooEasy => "Too easy",
        }
    }
}

impl TryFrom<i64> for QualityRating {
    type Error = SchedulerError;

    fn try_from(score: i64) -> Result<Self, Self::Error> {
        Self::from_score(score)
    }
}

impl FromStr for QualityRating {
    type Err = SchedulerError;

    /// Accepts the button labels in any case, with spaces, dashes or
    /// underscores between words, or one of the four numeric scores.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "forgot" => Ok(QualityRating::Forgot),
            "struggled" => Ok(QualityRating::Struggled),
            "gotit" => Ok(QualityRating::GotIt),
            "tooeasy" => Ok(QualityRating::TooEasy),
            digits if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
                let score = digits
                    .parse::<i64>()
                    .map_err(|_| SchedulerError::InvalidLabel(raw.to_string()))?;
                Self::from_score(score)
            }
            _ => Err(SchedulerError::InvalidLabel(raw.to_string())),
        }
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
