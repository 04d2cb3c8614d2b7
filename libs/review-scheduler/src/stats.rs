//! Per-card and aggregate statistics.

use crate::types::{CardId, CardReviewRecord, MasteryLevel};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Derived metrics for a single card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardStats {
    pub card_id: CardId,
    pub total_reviews: u32,
    pub correct_reviews: u32,
    /// Percentage, one decimal.
    pub accuracy: f64,
    /// Two decimals.
    pub ease_factor: f64,
    pub current_interval: u32,
    pub next_review: Option<DateTime<Utc>>,
    pub last_review: Option<DateTime<Utc>>,
    pub is_bookmarked: bool,
    pub mastery_level: MasteryLevel,
}

impl CardStats {
    pub fn from_record(record: &CardReviewRecord) -> Self {
        Self {
            card_id: record.card_id,
            total_reviews: record.total_reviews,
            correct_reviews: record.correct_reviews,
            accuracy: round_to(
                percentage(record.correct_reviews as usize, record.total_reviews as usize),
                1,
            ),
            ease_factor: round_to(record.ease_factor, 2),
            current_interval: record.interval,
            next_review: record.next_review,
            last_review: record.last_review,
            is_bookmarked: record.is_bookmarked,
            mastery_level: MasteryLevel::classify(record),
        }
    }
}

/// Aggregate statistics over a set of cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallStats {
    pub total_cards: usize,
    pub reviewed_cards: usize,
    pub new_cards: usize,
    pub mastered_cards: usize,
    pub struggling_cards: usize,
    pub due_for_review: usize,
    pub total_reviews: usize,
    pub total_correct: usize,
    pub overall_accuracy: f64,
    pub completion_percentage: f64,
}

impl OverallStats {
    /// Fold records into totals. `due_for_review` is supplied by the caller
    /// since it depends on the clock.
    pub fn collect<'a, I>(records: I, due_for_review: usize) -> Self
    where
        I: IntoIterator<Item = &'a CardReviewRecord>,
    {
        let mut stats = Self {
            due_for_review,
            ..Self::default()
        };

        for record in records {
            stats.total_cards += 1;
            if record.is_new() {
                continue;
            }
            stats.reviewed_cards += 1;
            stats.total_reviews += record.total_reviews as usize;
            stats.total_correct += record.correct_reviews as usize;
            match MasteryLevel::classify(record) {
                MasteryLevel::Mastered => stats.mastered_cards += 1,
                MasteryLevel::Struggling => stats.struggling_cards += 1,
                _ => {}
            }
        }

        stats.new_cards = stats.total_cards - stats.reviewed_cards;
        stats.overall_accuracy = round_to(percentage(stats.total_correct, stats.total_reviews), 1);
        stats.completion_percentage =
            round_to(percentage(stats.reviewed_cards, stats.total_cards), 1);
        stats
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
