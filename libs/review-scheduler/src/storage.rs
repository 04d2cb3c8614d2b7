//! Durable storage for review records.
//!
//! # Format
//! ```json
//! {
//!   "cards": {
//!     "42": { "card_id": 42, "ease_factor": 2.6, "interval": 1, ... }
//!   },
//!   "last_updated": "2026-01-01T09:00:00+00:00"
//! }
//! ```

use crate::error::{LoadWarning, Result};
use crate::types::{CardId, CardReviewRecord, MINIMUM_EASE};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// All records, keyed by card id.
pub type RecordMap = BTreeMap<CardId, CardReviewRecord>;

/// Persisted document, as read back. `last_updated` is informational and ignored.
#[derive(Debug, Deserialize)]
struct PersistedState {
    cards: RecordMap,
}

/// Records read from storage plus the reason they were discarded, if any.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub records: RecordMap,
    pub warning: Option<LoadWarning>,
}

impl LoadOutcome {
    fn recovered(warning: LoadWarning) -> Self {
        tracing::warn!(%warning, "discarding persisted review state");
        Self {
            records: RecordMap::new(),
            warning: Some(warning),
        }
    }
}

/// Backing storage for the scheduler's record map.
pub trait RecordStore {
    /// Read the full record map. Never fails: unreadable or malformed
    /// content yields an empty map and a warning.
    fn load(&self) -> LoadOutcome;

    /// Replace the stored record map.
    fn save(&mut self, records: &RecordMap) -> Result<()>;
}

/// Encode the record map as a pretty-printed document.
pub fn encode_state(records: &RecordMap) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct Document<'a> {
        cards: &'a RecordMap,
        last_updated: String,
    }

    serde_json::to_string_pretty(&Document {
        cards: records,
        last_updated: Utc::now().to_rfc3339(),
    })
}

/// Decode and validate a document.
pub fn decode_state(content: &str) -> std::result::Result<RecordMap, LoadWarning> {
    let state: PersistedState =
        serde_json::from_str(content).map_err(|e| LoadWarning::Malformed(e.to_string()))?;
    validate(&state.cards)?;
    Ok(state.cards)
}

fn validate(records: &RecordMap) -> std::result::Result<(), LoadWarning> {
    for (key, record) in records {
        let problem = if *key != record.card_id {
            Some(format!("stored under {key} but has card_id {}", record.card_id))
        } else if record.ease_factor.is_nan() || record.ease_factor < MINIMUM_EASE {
            Some(format!("ease factor {} below {MINIMUM_EASE}", record.ease_factor))
        } else if record.interval == 0 {
            Some("interval is zero".to_string())
        } else if record.correct_reviews > record.total_reviews {
            Some(format!(
                "{} correct of {} total reviews",
                record.correct_reviews, record.total_reviews
            ))
        } else if record.total_reviews == 0
            && (record.last_review.is_some() || record.next_review.is_some())
        {
            Some("unreviewed card has review timestamps".to_string())
        } else {
            None
        };

        if let Some(problem) = problem {
            return Err(LoadWarning::Invalid(format!("card {key}: {problem}")));
        }
    }
    Ok(())
}

/// JSON document on the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no review state yet, starting empty");
                return LoadOutcome::default();
            }
            Err(e) => return LoadOutcome::recovered(LoadWarning::Unreadable(e.to_string())),
        };

        match decode_state(&content) {
            Ok(records) => {
                tracing::info!(
                    path = %self.path.display(),
                    cards = records.len(),
                    "loaded review state"
                );
                LoadOutcome {
                    records,
                    warning: None,
                }
            }
            Err(warning) => LoadOutcome::recovered(warning),
        }
    }

    fn save(&mut self, records: &RecordMap) -> Result<()> {
        let content = encode_state(records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write-then-rename so a failed write never truncates existing state
        let temp = self.temp_path();
        fs::write(&temp, content)?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&temp) {
                tracing::warn!(
                    path = %temp.display(),
                    error = %cleanup,
                    "failed to remove temp file"
                );
            }
            return Err(e.into());
        }

        tracing::trace!(path = %self.path.display(), cards = records.len(), "saved review state");
        Ok(())
    }
}

/// In-memory document, for tests and embedders with their own persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document, valid or not.
    pub fn with_document<S: Into<String>>(document: S) -> Self {
        Self {
            document: Some(document.into()),
        }
    }

    /// The last document written, if any.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> LoadOutcome {
        match self.document.as_deref().map(decode_state) {
            None => LoadOutcome::default(),
            Some(Ok(records)) => LoadOutcome {
                records,
                warning: None,
            },
            Some(Err(warning)) => LoadOutcome::recovered(warning),
        }
    }

    fn save(&mut self, records: &RecordMap) -> Result<()> {
        self.document = Some(encode_state(records)?);
        Ok(())
    }
}
