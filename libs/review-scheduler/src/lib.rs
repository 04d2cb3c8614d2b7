//! Spaced repetition review scheduler for a personal study application.
//!
//! Provides:
//! - SM-2 scheduling from a 0-5 recall quality (or a correct/incorrect answer)
//! - Due-card ranking and mixed new/review study queues
//! - Per-card and aggregate statistics with mastery levels
//! - Bookmarks and notes stored alongside each card's review record
//! - JSON persistence, written after every change
//!
//! ```no_run
//! use review_scheduler::{ReviewScheduler, SchedulerConfig};
//!
//! let config = SchedulerConfig::from_env()?;
//! let mut scheduler = ReviewScheduler::open(&config);
//! scheduler.record_review(42, 5)?;
//! let queue = scheduler.get_study_queue(&[1, 2, 42], 20);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod algorithm;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod stats;
pub mod storage;
pub mod types;

pub use algorithm::{get_algorithm, SpacedRepetitionAlgorithm};
pub use config::{Algorithm, SchedulerConfig};
pub use error::{ConfigError, LoadWarning, Result, SchedulerError};
pub use scheduler::{ReviewScheduler, SharedScheduler};
pub use stats::{CardStats, OverallStats};
pub use storage::{JsonFileStore, LoadOutcome, MemoryStore, RecordMap, RecordStore};
pub use types::{CardId, CardReviewRecord, MasteryLevel, Quality, Schedule, MAXIMUM_INTERVAL};
