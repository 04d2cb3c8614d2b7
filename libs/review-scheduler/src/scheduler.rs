//! Review scheduler: per-card records, due queries, study queues and stats.
//!
//! Every mutating operation writes the full record map back to the store
//! before returning. Operations that depend on the clock have an `_at`
//! variant taking an explicit `now`.

use crate::algorithm::SpacedRepetitionAlgorithm;
use crate::config::SchedulerConfig;
use crate::error::{LoadWarning, Result};
use crate::stats::{CardStats, OverallStats};
use crate::storage::{JsonFileStore, LoadOutcome, RecordMap, RecordStore};
use crate::types::{CardId, CardReviewRecord, Quality, Schedule};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Scheduler behind a single writer lock, for multi-request embedders.
pub type SharedScheduler<S = JsonFileStore> = Arc<Mutex<ReviewScheduler<S>>>;

/// Owns every card's review record and the store they persist to.
pub struct ReviewScheduler<S: RecordStore = JsonFileStore> {
    store: S,
    records: RecordMap,
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    review_share: f64,
    default_queue_limit: usize,
    load_warning: Option<LoadWarning>,
}

/// A due card and how it sorts.
struct DueCard {
    card_id: CardId,
    is_new: bool,
    days_overdue: i64,
}

impl ReviewScheduler<JsonFileStore> {
    /// Open the JSON document at `config.data_file`.
    pub fn open(config: &SchedulerConfig) -> Self {
        Self::with_store(JsonFileStore::new(&config.data_file), config)
    }
}

impl<S: RecordStore> ReviewScheduler<S> {
    /// Load state from `store`. Unreadable or malformed state starts empty;
    /// see [`Self::load_warning`].
    pub fn with_store(store: S, config: &SchedulerConfig) -> Self {
        let LoadOutcome { records, warning } = store.load();
        Self {
            store,
            records,
            algorithm: config.algorithm.build(),
            review_share: config.review_share.clamp(0.0, 1.0),
            default_queue_limit: config.default_queue_limit,
            load_warning: warning,
        }
    }

    /// Replace the scheduling algorithm.
    pub fn with_algorithm(mut self, algorithm: Box<dyn SpacedRepetitionAlgorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Why persisted state was discarded at load, if it was.
    pub fn load_warning(&self) -> Option<&LoadWarning> {
        self.load_warning.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read-only view of every record.
    pub fn records(&self) -> &RecordMap {
        &self.records
    }

    pub fn into_shared(self) -> SharedScheduler<S> {
        Arc::new(Mutex::new(self))
    }

    /// Get or create the record for a card. Creation is not persisted until
    /// the next mutating operation.
    pub fn get_record(&mut self, card_id: CardId) -> &CardReviewRecord {
        get_or_create(&mut self.records, self.algorithm.as_ref(), card_id)
    }

    /// The record for a card, without creating one.
    pub fn peek(&self, card_id: CardId) -> Option<&CardReviewRecord> {
        self.records.get(&card_id)
    }

    /// Next schedule for a card if it were reviewed now. Quality is clamped to 0..=5.
    pub fn compute_schedule(&mut self, card_id: CardId, quality: i64) -> Schedule {
        let record = get_or_create(&mut self.records, self.algorithm.as_ref(), card_id);
        self.algorithm.schedule(record, Quality::clamped(quality))
    }

    /// Record a 0-5 review. Out-of-range qualities are clamped.
    pub fn record_review(&mut self, card_id: CardId, quality: i64) -> Result<Schedule> {
        self.record_review_at(card_id, quality, Utc::now())
    }

    pub fn record_review_at(
        &mut self,
        card_id: CardId,
        quality: i64,
        now: DateTime<Utc>,
    ) -> Result<Schedule> {
        self.apply_review(card_id, Quality::clamped(quality), now)
    }

    /// Record a correct/incorrect answer as quality 4 or 1.
    pub fn record_simple_review(&mut self, card_id: CardId, correct: bool) -> Result<Schedule> {
        self.record_simple_review_at(card_id, correct, Utc::now())
    }

    pub fn record_simple_review_at(
        &mut self,
        card_id: CardId,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Result<Schedule> {
        self.apply_review(card_id, Quality::from_correct(correct), now)
    }

    fn apply_review(
        &mut self,
        card_id: CardId,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> Result<Schedule> {
        let record = get_or_create(&mut self.records, self.algorithm.as_ref(), card_id);
        let schedule = self.algorithm.schedule(record, quality);

        record.interval = schedule.interval;
        record.ease_factor = schedule.ease_factor;
        record.repetitions = schedule.repetitions;
        record.last_review = Some(now);
        record.next_review = Some(
            now.checked_add_signed(Duration::days(schedule.interval as i64))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        );
        record.total_reviews += 1;
        if quality.is_correct() {
            record.correct_reviews += 1;
        }

        tracing::debug!(
            card_id,
            quality = quality.value(),
            interval = schedule.interval,
            ease_factor = schedule.ease_factor,
            repetitions = schedule.repetitions,
            "recorded review"
        );

        self.persist()?;
        Ok(schedule)
    }

    /// Cards due now: never-reviewed cards first, then the most overdue.
    pub fn get_due_cards(&mut self, all_card_ids: &[CardId]) -> Vec<CardId> {
        self.get_due_cards_at(all_card_ids, Utc::now())
    }

    pub fn get_due_cards_at(
        &mut self,
        all_card_ids: &[CardId],
        now: DateTime<Utc>,
    ) -> Vec<CardId> {
        let mut due = Vec::new();

        for &card_id in all_card_ids {
            let record = get_or_create(&mut self.records, self.algorithm.as_ref(), card_id);
            match record.next_review {
                None => due.push(DueCard {
                    card_id,
                    is_new: true,
                    days_overdue: 0,
                }),
                Some(next_review) if next_review <= now => due.push(DueCard {
                    card_id,
                    is_new: false,
                    days_overdue: (now - next_review).num_days(),
                }),
                Some(_) => {}
            }
        }

        // Stable: ties keep input order
        due.sort_by_key(|card| (!card.is_new, Reverse(card.days_overdue)));
        due.into_iter().map(|card| card.card_id).collect()
    }

    /// Study queue of at most `limit` due cards, mixing review and new cards.
    pub fn get_study_queue(&mut self, all_card_ids: &[CardId], limit: usize) -> Vec<CardId> {
        self.get_study_queue_at(all_card_ids, limit, Utc::now())
    }

    /// Study queue sized by the configured default limit.
    pub fn get_default_study_queue(&mut self, all_card_ids: &[CardId]) -> Vec<CardId> {
        let limit = self.default_queue_limit;
        self.get_study_queue(all_card_ids, limit)
    }

    pub fn get_study_queue_at(
        &mut self,
        all_card_ids: &[CardId],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<CardId> {
        let mut seen = HashSet::new();
        let due: Vec<CardId> = self
            .get_due_cards_at(all_card_ids, now)
            .into_iter()
            .filter(|card_id| seen.insert(*card_id))
            .collect();

        let (review, new): (Vec<CardId>, Vec<CardId>) = due
            .iter()
            .copied()
            .partition(|id| self.records.get(id).is_some_and(|r| !r.is_new()));

        let review_limit = ((limit as f64 * self.review_share).floor() as usize).min(limit);
        let new_limit = limit - review_limit;

        let mut queue: Vec<CardId> = review
            .into_iter()
            .take(review_limit)
            .chain(new.into_iter().take(new_limit))
            .collect();

        // Backfill from whichever side had spare due cards
        if queue.len() < limit {
            let included: HashSet<CardId> = queue.iter().copied().collect();
            let spare: Vec<CardId> = due
                .into_iter()
                .filter(|card_id| !included.contains(card_id))
                .collect();
            queue.extend(spare.into_iter().take(limit - queue.len()));
        }

        queue.truncate(limit);
        queue
    }

    pub fn get_card_stats(&mut self, card_id: CardId) -> CardStats {
        CardStats::from_record(self.get_record(card_id))
    }

    pub fn get_overall_stats(&mut self, all_card_ids: &[CardId]) -> OverallStats {
        self.get_overall_stats_at(all_card_ids, Utc::now())
    }

    pub fn get_overall_stats_at(
        &mut self,
        all_card_ids: &[CardId],
        now: DateTime<Utc>,
    ) -> OverallStats {
        let due_for_review = self.get_due_cards_at(all_card_ids, now).len();
        let records = all_card_ids
            .iter()
            .filter_map(|card_id| self.records.get(card_id));
        OverallStats::collect(records, due_for_review)
    }

    /// Flip the bookmark flag and return the new state.
    pub fn toggle_bookmark(&mut self, card_id: CardId) -> Result<bool> {
        let record = get_or_create(&mut self.records, self.algorithm.as_ref(), card_id);
        record.is_bookmarked = !record.is_bookmarked;
        let bookmarked = record.is_bookmarked;
        tracing::debug!(card_id, bookmarked, "toggled bookmark");
        self.persist()?;
        Ok(bookmarked)
    }

    /// Bookmarked card ids in ascending order.
    pub fn get_bookmarked_cards(&self) -> Vec<CardId> {
        self.records
            .values()
            .filter(|record| record.is_bookmarked)
            .map(|record| record.card_id)
            .collect()
    }

    /// Replace a card's note.
    pub fn add_note<T: Into<String>>(&mut self, card_id: CardId, note: T) -> Result<()> {
        let record = get_or_create(&mut self.records, self.algorithm.as_ref(), card_id);
        record.notes = note.into();
        tracing::debug!(card_id, len = record.notes.len(), "updated note");
        self.persist()
    }

    pub fn get_note(&mut self, card_id: CardId) -> String {
        self.get_record(card_id).notes.clone()
    }

    /// Forget a card's learning progress. Bookmark and notes survive.
    pub fn reset_card(&mut self, card_id: CardId) -> Result<()> {
        let initial = self.algorithm.initial_record(card_id);
        let record = get_or_create(&mut self.records, self.algorithm.as_ref(), card_id);
        record.reset(initial);
        tracing::debug!(card_id, "reset card");
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.records)
    }
}

fn get_or_create<'a>(
    records: &'a mut RecordMap,
    algorithm: &dyn SpacedRepetitionAlgorithm,
    card_id: CardId,
) -> &'a mut CardReviewRecord {
    records
        .entry(card_id)
        .or_insert_with(|| algorithm.initial_record(card_id))
}
