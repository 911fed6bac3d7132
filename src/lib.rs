pub mod error;
pub mod export;
pub mod models;
pub mod scheduler;
pub mod session;

pub use error::{ConfigError, ExportError, SchedulerError, SessionError};
pub use models::{CardId, CardMemoryState, MasteryStatus, QualityRating, ReviewEvent};
pub use scheduler::{
    DayBoundaryResolver, ReviewScheduler, SchedulerConfig, SessionMode, StatusClassifier,
};
pub use session::StudySession;
