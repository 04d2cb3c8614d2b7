//! SM-2 spaced repetition algorithm.
//!
//! SuperMemo 2 on a 0-5 quality scale:
//! - EF' = max(minimum, EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)))
//! - q < 3 lapses the card: interval 1, repetitions 0
//! - otherwise the first success schedules 1 day, the second 6 days, and
//!   later ones `round(interval * EF')`, capped at `maximum_interval`

use super::SpacedRepetitionAlgorithm;
use crate::types::{
    CardId, CardReviewRecord, Quality, Schedule, DEFAULT_EASE, MAXIMUM_INTERVAL, MINIMUM_EASE,
};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    pub lapse_interval: u32,
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: DEFAULT_EASE,
            minimum_ease: MINIMUM_EASE,
            first_interval: 1,
            second_interval: 6,
            lapse_interval: 1,
            maximum_interval: MAXIMUM_INTERVAL,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_record(&self, card_id: CardId) -> CardReviewRecord {
        CardReviewRecord {
            ease_factor: self.initial_ease,
            ..CardReviewRecord::new(card_id)
        }
    }

    fn schedule(&self, record: &CardReviewRecord, quality: Quality) -> Schedule {
        let ease_factor = self.next_ease(record.ease_factor, quality);

        if !quality.is_correct() {
            return Schedule {
                interval: self.lapse_interval,
                ease_factor,
                repetitions: 0,
            };
        }

        let interval = match record.repetitions {
            0 => self.first_interval,
            1 => self.second_interval,
            // Python-style rounding keeps intervals identical to existing data.
            _ => {
                let grown = (record.interval as f64 * ease_factor).round_ties_even();
                grown.min(self.maximum_interval as f64) as u32
            }
        };

        Schedule {
            interval,
            ease_factor,
            repetitions: record.repetitions + 1,
        }
    }
}

impl Sm2 {
    fn next_ease(&self, ease_factor: f64, quality: Quality) -> f64 {
        let miss = (Quality::MAX - quality.value()) as f64;
        let adjusted = ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
        adjusted.max(self.minimum_ease)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(interval: u32, ease_factor: f64, repetitions: u32) -> CardReviewRecord {
        CardReviewRecord {
            interval,
            ease_factor,
            repetitions,
            total_reviews: repetitions,
            correct_reviews: repetitions,
            ..CardReviewRecord::new(1)
        }
    }

    #[test]
    fn perfect_recall_raises_ease() {
        let sm2 = Sm2::default();
        let result = sm2.schedule(&sm2.initial_record(1), Quality::clamped(5));
        assert!((result.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(result.interval, 1);
        assert_eq!(result.repetitions, 1);
    }

    #[test]
    fn ease_adjustment_per_quality() {
        let sm2 = Sm2::default();
        let base = record(10, 2.5, 3);
        let deltas = [(0, -0.8), (1, -0.54), (2, -0.32), (3, -0.14), (4, 0.0), (5, 0.1)];
        for (q, delta) in deltas {
            let result = sm2.schedule(&base, Quality::clamped(q));
            assert!(
                (result.ease_factor - (2.5 + delta)).abs() < 1e-9,
                "quality {q}: got {}",
                result.ease_factor
            );
        }
    }

    #[test]
    fn first_and_second_success_intervals() {
        let sm2 = Sm2::default();
        assert_eq!(sm2.schedule(&record(1, 1.3, 0), Quality::clamped(3)).interval, 1);
        assert_eq!(sm2.schedule(&record(1, 1.3, 1), Quality::clamped(3)).interval, 6);
        assert_eq!(sm2.schedule(&record(1, 3.0, 1), Quality::clamped(5)).interval, 6);
    }

    #[test]
    fn later_successes_use_updated_ease() {
        let sm2 = Sm2::default();
        // 2.5 + 0.1 = 2.6; 10 * 2.6 = 26, not 10 * 2.5 = 25
        let result = sm2.schedule(&record(10, 2.5, 2), Quality::clamped(5));
        assert_eq!(result.interval, 26);
        assert_eq!(result.repetitions, 3);
    }

    #[test]
    fn lapse_resets_progress() {
        let sm2 = Sm2::default();
        for q in 0..3 {
            let result = sm2.schedule(&record(40, 2.8, 6), Quality::clamped(q));
            assert_eq!(result.interval, 1);
            assert_eq!(result.repetitions, 0);
        }
    }

    #[test]
    fn ease_factor_never_below_minimum() {
        let sm2 = Sm2::default();
        let mut current = sm2.initial_record(1);
        for _ in 0..20 {
            let result = sm2.schedule(&current, Quality::clamped(0));
            assert!(result.ease_factor >= sm2.minimum_ease);
            current.ease_factor = result.ease_factor;
            current.interval = result.interval;
            current.repetitions = result.repetitions;
        }
        assert_eq!(current.ease_factor, sm2.minimum_ease);
    }

    #[test]
    fn interval_growth_is_capped() {
        let sm2 = Sm2::default();
        let result = sm2.schedule(&record(30_000, 2.5, 12), Quality::clamped(5));
        assert_eq!(result.interval, MAXIMUM_INTERVAL);
        assert_eq!(result.repetitions, 13);

        let mut current = sm2.initial_record(1);
        for _ in 0..40 {
            let result = sm2.schedule(&current, Quality::clamped(4));
            assert!(result.interval <= MAXIMUM_INTERVAL);
            current.interval = result.interval;
            current.ease_factor = result.ease_factor;
            current.repetitions = result.repetitions;
        }
        assert_eq!(current.interval, MAXIMUM_INTERVAL);
    }

    #[test]
    fn schedule_does_not_mutate_record() {
        let sm2 = Sm2::default();
        let before = record(6, 2.5, 2);
        let copy = before.clone();
        sm2.schedule(&before, Quality::clamped(5));
        assert_eq!(before, copy);
    }
}
