use std::rc::Rc;
use std::time::Duration;

use crate::diagnostics::{Diagnostic, DiagnosticOrigin, DiagnosticSink};
use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key holding the best score.
pub const BEST_SCORE_KEY: &str = "best_score";

/// Point-in-time view of the score and session counters.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ScoreSummary {
    pub score: u32,
    pub best_score: u32,
    pub length: usize,
    pub consumed: u32,
    pub elapsed: Duration,
}

/// Accumulates points and session statistics, and persists the best score
/// through a [`KeyValueStore`].
///
/// Storage failures never reach the caller. They are reported to the
/// diagnostic sink; a failed initial load also turns persistence off for the
/// rest of the session so an unreadable store is never overwritten.
pub struct ScoreTracker {
    score: u32,
    best_score: u32,
    length: usize,
    consumed: u32,
    elapsed: Duration,
    store: Box<dyn KeyValueStore>,
    persistence_enabled: bool,
    diagnostics: Rc<dyn DiagnosticSink>,
}

impl ScoreTracker {
    /// Creates a tracker and loads the best score from `store`.
    pub fn new(store: Box<dyn KeyValueStore>, diagnostics: Rc<dyn DiagnosticSink>) -> Self {
        let mut tracker = Self {
            score: 0,
            best_score: 0,
            length: 0,
            consumed: 0,
            elapsed: Duration::ZERO,
            store,
            persistence_enabled: true,
            diagnostics,
        };

        match tracker.load_best_score() {
            Ok(best) => tracker.best_score = best,
            Err(error) => {
                tracker.persistence_enabled = false;
                tracker.report(format!(
                    "could not load best score, keeping it in memory only: {error}"
                ));
            }
        }

        tracker
    }

    /// Adds `points` and raises the in-memory best score when exceeded.
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.best_score = self.best_score.max(self.score);
    }

    pub fn record_consumption(&mut self) {
        self.consumed += 1;
    }

    pub fn set_length(&mut self, length: usize) {
        self.length = length;
    }

    /// Adds `elapsed` of play time to the session clock.
    pub fn tick(&mut self, elapsed: Duration) {
        self.elapsed += elapsed;
    }

    /// Writes the best score to storage. Failures are reported, not returned.
    pub fn commit_best_score(&mut self) {
        if !self.persistence_enabled {
            return;
        }

        let value = self.best_score.to_string();
        if let Err(error) = self.store.set(BEST_SCORE_KEY, &value) {
            self.report(format!("failed to save best score: {error}"));
        }
    }

    /// Clears the score and session counters; the best score is kept.
    pub fn reset(&mut self) {
        self.score = 0;
        self.length = 0;
        self.consumed = 0;
        self.elapsed = Duration::ZERO;
    }

    #[must_use]
    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary {
            score: self.score,
            best_score: self.best_score,
            length: self.length,
            consumed: self.consumed,
            elapsed: self.elapsed,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    fn load_best_score(&self) -> Result<u32, StorageError> {
        let Some(raw) = self.store.get(BEST_SCORE_KEY)? else {
            return Ok(0);
        };

        raw.trim()
            .parse::<u32>()
            .map_err(|_| StorageError::InvalidValue {
                key: BEST_SCORE_KEY.to_owned(),
                value: raw.clone(),
            })
    }

    fn report(&self, message: String) {
        self.diagnostics
            .report(Diagnostic::new(DiagnosticOrigin::Storage, message));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;
    use std::time::Duration;

    use super::{ScoreTracker, BEST_SCORE_KEY};
    use crate::diagnostics::{DiagnosticOrigin, MemorySink};
    use crate::error::StorageError;
    use crate::storage::{KeyValueStore, MemoryStore};

    /// Store whose reads and/or writes always fail.
    struct BrokenStore {
        fail_reads: bool,
        writes: Rc<Cell<usize>>,
    }

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(io::Error::other("disk gone").into());
            }
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            Err(io::Error::other("read-only").into())
        }
    }

    fn tracker_with(store: MemoryStore) -> (ScoreTracker, Rc<MemorySink>) {
        let sink = Rc::new(MemorySink::new());
        (ScoreTracker::new(Box::new(store), sink.clone()), sink)
    }

    #[test]
    fn awards_accumulate_and_raise_best() {
        let (mut tracker, _) = tracker_with(MemoryStore::new());

        tracker.award(10);
        tracker.award(5);

        assert_eq!(tracker.score(), 15);
        assert_eq!(tracker.best_score(), 15);
    }

    #[test]
    fn higher_stored_best_is_left_alone() {
        let (mut tracker, _) =
            tracker_with(MemoryStore::with_entries([(BEST_SCORE_KEY, "40")]));

        tracker.award(10);
        tracker.award(5);

        assert_eq!(tracker.score(), 15);
        assert_eq!(tracker.best_score(), 40);
    }

    #[test]
    fn reset_keeps_best_score() {
        let (mut tracker, _) = tracker_with(MemoryStore::new());
        tracker.award(10);
        tracker.award(5);
        tracker.record_consumption();
        tracker.set_length(4);
        tracker.tick(Duration::from_millis(300));

        tracker.reset();

        let summary = tracker.summary();
        assert_eq!(summary.score, 0);
        assert_eq!(summary.best_score, 15);
        assert_eq!(summary.consumed, 0);
        assert_eq!(summary.length, 0);
        assert_eq!(summary.elapsed, Duration::ZERO);
    }

    #[test]
    fn commit_writes_best_score_to_store() {
        let store = MemoryStore::new();
        let (mut tracker, _) = tracker_with(store.clone());

        tracker.award(25);
        assert_eq!(store.get(BEST_SCORE_KEY).expect("memory get"), None);

        tracker.commit_best_score();
        assert_eq!(
            store.get(BEST_SCORE_KEY).expect("memory get").as_deref(),
            Some("25")
        );
    }

    #[test]
    fn garbage_stored_value_is_reported_and_not_overwritten() {
        let store = MemoryStore::with_entries([(BEST_SCORE_KEY, "lots")]);
        let (mut tracker, sink) = tracker_with(store.clone());

        tracker.award(10);
        tracker.commit_best_score();

        assert_eq!(tracker.best_score(), 10);
        assert_eq!(
            store.get(BEST_SCORE_KEY).expect("memory get").as_deref(),
            Some("lots")
        );
        assert_eq!(sink.entries().len(), 1);
        assert_eq!(sink.entries()[0].origin, DiagnosticOrigin::Storage);
    }

    #[test]
    fn unreadable_store_falls_back_to_memory() {
        let writes = Rc::new(Cell::new(0));
        let sink = Rc::new(MemorySink::new());
        let mut tracker = ScoreTracker::new(
            Box::new(BrokenStore {
                fail_reads: true,
                writes: writes.clone(),
            }),
            sink.clone(),
        );

        tracker.award(10);
        tracker.commit_best_score();

        assert_eq!(tracker.best_score(), 10);
        assert_eq!(writes.get(), 0);
        assert_eq!(sink.entries().len(), 1);
    }

    #[test]
    fn failed_write_is_reported_and_play_continues() {
        let writes = Rc::new(Cell::new(0));
        let sink = Rc::new(MemorySink::new());
        let mut tracker = ScoreTracker::new(
            Box::new(BrokenStore {
                fail_reads: false,
                writes: writes.clone(),
            }),
            sink.clone(),
        );

        tracker.award(10);
        tracker.commit_best_score();
        tracker.award(10);

        assert_eq!(writes.get(), 1);
        assert_eq!(tracker.score(), 20);
        assert_eq!(sink.entries().len(), 1);
    }
}
