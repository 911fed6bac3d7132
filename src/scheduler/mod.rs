//! Pure scheduling functions. Nothing here performs I/O or reads the clock.
//!
//! - `sm2`: next memory state after a review
//! - `classifier`: derived mastery status
//! - `due_set`: study order for a session
//! - `day_boundary`: learner-local day buckets for reporting

pub mod classifier;
pub mod config;
pub mod day_boundary;
pub mod due_set;
pub mod sm2;

pub use classifier::{StatusClassifier, classify};
pub use config::SchedulerConfig;
pub use day_boundary::{DayBoundaryResolver, DueLabel, resolve_now};
pub use due_set::{SessionMode, count_due, select_for_session};
pub use sm2::{ReviewScheduler, calculate_next_review, format_interval};
