//! Test data fixtures.

use chrono::{DateTime, TimeZone, Utc};
use review_scheduler::CardId;

/// Fixed reference time for deterministic schedules.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap()
}

/// Card ids `1..=count`.
pub fn card_ids(count: i64) -> Vec<CardId> {
    (1..=count).collect()
}

/// A state document in the layout written by the earlier study app:
/// naive timestamps and empty strings for missing dates.
pub fn legacy_document() -> &'static str {
    r#"{
  "cards": {
    "1": {
      "card_id": 1,
      "ease_factor": 2.6,
      "interval": 6,
      "repetitions": 2,
      "next_review": "2026-08-20T10:15:00.512000",
      "last_review": "2026-08-14T10:15:00.512000",
      "total_reviews": 2,
      "correct_reviews": 2,
      "is_bookmarked": false,
      "notes": ""
    },
    "2": {
      "card_id": 2,
      "ease_factor": 2.5,
      "interval": 1,
      "repetitions": 0,
      "next_review": "",
      "last_review": "",
      "total_reviews": 0,
      "correct_reviews": 0,
      "is_bookmarked": true,
      "notes": "amino acid mnemonic"
    }
  },
  "last_updated": "2026-08-14T10:15:00.513100"
}"#
}
