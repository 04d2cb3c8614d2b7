//! Core types for the review scheduler.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a flashcard. Opaque to the scheduler.
pub type CardId = i64;

/// Ease factor assigned to a card that has never been reviewed.
pub const DEFAULT_EASE: f64 = 2.5;

/// Lower bound on the ease factor.
pub const MINIMUM_EASE: f64 = 1.3;

/// Longest interval, in days, the scheduler will assign (about 100 years).
pub const MAXIMUM_INTERVAL: u32 = 36_500;

/// Recall quality for a single review, 0 (blackout) to 5 (perfect recall).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;

    /// Lowest quality that still counts as a correct answer.
    pub const PASSING: u8 = 3;

    /// Clamp any integer rating into 0..=5.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Map a binary answer onto the 0-5 scale.
    /// Correct -> 4 (good response), incorrect -> 1 (recalled after seeing the answer)
    pub fn from_correct(correct: bool) -> Self {
        if correct { Self(4) } else { Self(1) }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_correct(self) -> bool {
        self.0 >= Self::PASSING
    }
}

/// Review history and schedule of one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardReviewRecord {
    pub card_id: CardId,
    #[serde(default = "default_ease")]
    pub ease_factor: f64,
    /// Days until the next review.
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Consecutive successful reviews since the last lapse.
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub correct_reviews: u32,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default)]
    pub notes: String,
}

impl CardReviewRecord {
    /// Fresh record for a card that has never been reviewed.
    pub fn new(card_id: CardId) -> Self {
        Self {
            card_id,
            ease_factor: DEFAULT_EASE,
            interval: 1,
            repetitions: 0,
            next_review: None,
            last_review: None,
            total_reviews: 0,
            correct_reviews: 0,
            is_bookmarked: false,
            notes: String::new(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.total_reviews == 0
    }

    /// Replace learning progress with `initial`, keeping the bookmark and notes.
    pub fn reset(&mut self, initial: CardReviewRecord) {
        let is_bookmarked = self.is_bookmarked;
        let notes = std::mem::take(&mut self.notes);
        *self = Self {
            card_id: self.card_id,
            is_bookmarked,
            notes,
            ..initial
        };
    }
}

fn default_ease() -> f64 {
    DEFAULT_EASE
}

fn default_interval() -> u32 {
    1
}

/// Accepts RFC 3339, naive ISO-8601 (read as UTC), `""` or `null`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
    }
}

/// Parse an ISO-8601 timestamp, with or without a UTC offset. Years past
/// 9999 use chrono's signed form, e.g. `+12026-01-01T00:00:00Z`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Outcome of the SM-2 computation for one review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Schedule {
    pub interval: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
}

/// Learning state derived from a card's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MasteryLevel {
    New,
    Struggling,
    Familiar,
    Learning,
    Mastered,
}

impl MasteryLevel {
    /// Classify a record. Order of checks matters: a long interval wins over
    /// the repetition count.
    pub fn classify(record: &CardReviewRecord) -> Self {
        if record.total_reviews == 0 {
            Self::New
        } else if record.interval >= 21 && record.ease_factor >= 2.5 {
            Self::Mastered
        } else if record.interval >= 7 {
            Self::Learning
        } else if record.repetitions >= 2 {
            Self::Familiar
        } else {
            Self::Struggling
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Struggling => "Struggling",
            Self::Familiar => "Familiar",
            Self::Learning => "Learning",
            Self::Mastered => "Mastered",
        }
    }
}
