//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{CardId, CardReviewRecord, Quality, Schedule};

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next schedule after a review. Pure: never mutates the record.
    fn schedule(&self, record: &CardReviewRecord, quality: Quality) -> Schedule;

    /// Initial record for a card seen for the first time.
    fn initial_record(&self, card_id: CardId) -> CardReviewRecord;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        _ => None,
    }
}
