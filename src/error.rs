//! Error types shared across the scheduler, session and file layers.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::CardId;

/// Errors raised at the rating boundary. The scheduling math itself is total.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("invalid quality score {0}: expected one of 0, 3, 4, 5")]
    InvalidQuality(i64),
    #[error("unknown rating label '{0}': expected forgot, struggled, got-it or too-easy")]
    InvalidLabel(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("card {0} already has a review in flight")]
    ReviewInFlight(CardId),
    #[error("card {0} is not part of this session")]
    UnknownCard(CardId),
    #[error("card {0} has no pending review to reconcile")]
    NoPendingReview(CardId),
    #[error("no card left in the current round")]
    SessionFinished,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid deck file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
