//! Tunable scheduler constants.
//!
//! Every field has a default, so an empty JSON object `{}` is a valid config.
//! The ease floor is not tunable; see [`MIN_EASE_FACTOR`].

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR};

/// Interval given to the second consecutive success. The cap may not undercut it.
pub(crate) const SECOND_INTERVAL_DAYS: u32 = 6;
/// Upper bound accepted for `maxIntervalDays` (about a century).
pub const MAX_INTERVAL_LIMIT_DAYS: u32 = 36_500;
/// Upper bound accepted for `lapseDelayMinutes` (one week).
pub const MAX_LAPSE_DELAY_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Delay before a lapsed card is shown again.
    pub lapse_delay_minutes: i64,
    pub max_interval_days: u32,
    /// Interval at which a card counts as mastered.
    pub mastery_threshold_days: u32,
    pub initial_ease_factor: f64,
    pub lapse_ease_penalty: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lapse_delay_minutes: 10,
            max_interval_days: 365,
            mastery_threshold_days: 14,
            initial_ease_factor: DEFAULT_EASE_FACTOR,
            lapse_ease_penalty: 0.2,
        }
    }
}

impl SchedulerConfig {
    /// Reads and validates a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SchedulerConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_LAPSE_DELAY_MINUTES).contains(&self.lapse_delay_minutes) {
            return Err(ConfigError::invalid(
                "lapseDelayMinutes",
                format!(
                    "must be between 0 and {MAX_LAPSE_DELAY_MINUTES}, got {}",
                    self.lapse_delay_minutes
                ),
            ));
        }
        if !(SECOND_INTERVAL_DAYS..=MAX_INTERVAL_LIMIT_DAYS).contains(&self.max_interval_days) {
            return Err(ConfigError::invalid(
                "maxIntervalDays",
                format!(
                    "must be between {SECOND_INTERVAL_DAYS} and {MAX_INTERVAL_LIMIT_DAYS}, got {}",
                    self.max_interval_days
                ),
            ));
        }
        if self.mastery_threshold_days == 0 {
            return Err(ConfigError::invalid(
                "masteryThresholdDays",
                "must be at least 1",
            ));
        }
        if !self.initial_ease_factor.is_finite() || self.initial_ease_factor < MIN_EASE_FACTOR {
            return Err(ConfigError::invalid(
                "initialEaseFactor",
                format!(
                    "must be a number >= {MIN_EASE_FACTOR}, got {}",
                    self.initial_ease_factor
                ),
            ));
        }
        if !self.lapse_ease_penalty.is_finite() || self.lapse_ease_penalty < 0.0 {
            return Err(ConfigError::invalid(
                "lapseEasePenalty",
                format!(
                    "must be a non-negative number, got {}",
                    self.lapse_ease_penalty
                ),
            ));
        }
        Ok(())
    }

    /// Saturates instead of panicking for configs that skipped validation.
    pub fn lapse_delay(&self) -> Duration {
        Duration::try_minutes(self.lapse_delay_minutes.max(0)).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_interval_days, 365);
        assert_eq!(config.mastery_threshold_days, 14);
        assert_eq!(config.lapse_delay(), Duration::minutes(10));
    }

    #[test]
    fn test_limits_are_valid() {
        let config = SchedulerConfig {
            lapse_delay_minutes: MAX_LAPSE_DELAY_MINUTES,
            max_interval_days: MAX_INTERVAL_LIMIT_DAYS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lapse_delay_saturates() {
        let config = SchedulerConfig {
            lapse_delay_minutes: i64::MAX,
            ..Default::default()
        };
        assert_eq!(config.lapse_delay(), Duration::MAX);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{ "maxIntervalDays": 180 }"#).unwrap();
        assert_eq!(config.max_interval_days, 180);
        assert_eq!(config.lapse_delay_minutes, 10);
        assert_eq!(config.initial_ease_factor, 2.5);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let cases = [
            SchedulerConfig {
                lapse_delay_minutes: -1,
                ..Default::default()
            },
            SchedulerConfig {
                lapse_delay_minutes: i64::MAX,
                ..Default::default()
            },
            SchedulerConfig {
                max_interval_days: 5,
                ..Default::default()
            },
            SchedulerConfig {
                max_interval_days: u32::MAX,
                ..Default::default()
            },
            SchedulerConfig {
                mastery_threshold_days: 0,
                ..Default::default()
            },
            SchedulerConfig {
                initial_ease_factor: 1.2,
                ..Default::default()
            },
            SchedulerConfig {
                lapse_ease_penalty: f64::NAN,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid { .. })),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "lapseDelayMinutes": 1, "masteryThresholdDays": 21 }}"#).unwrap();

        let config = SchedulerConfig::from_path(file.path()).unwrap();
        assert_eq!(config.lapse_delay_minutes, 1);
        assert_eq!(config.mastery_threshold_days, 21);
    }

    #[test]
    fn test_from_path_errors() {
        assert!(matches!(
            SchedulerConfig::from_path("definitely/not/here.json"),
            Err(ConfigError::Read { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            SchedulerConfig::from_path(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "maxIntervalDays": 2 }}"#).unwrap();
        assert!(matches!(
            SchedulerConfig::from_path(file.path()),
            Err(ConfigError::Invalid { field: "maxIntervalDays", .. })
        ));
    }
}
