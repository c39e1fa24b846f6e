use log::warn;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::RoundStats;

/// Durable storage behind the leaderboard. Load failures are not
/// signalled: missing or corrupt data reads as an empty leaderboard.
pub trait LeaderboardStorage {
    fn load(&self) -> Vec<RoundStats>;
    fn save(&self, entries: &[RoundStats]) -> std::io::Result<()>;
}

/// JSON document under the application data directory, surviving process
/// restarts.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("leaderboard.json"),
        }
    }
}

impl LeaderboardStorage for JsonFileStorage {
    fn load(&self) -> Vec<RoundStats> {
        if let Ok(contents) = fs::read_to_string(&self.path) {
            if let Ok(entries) = serde_json::from_str(&contents) {
                return entries;
            }
        }
        Vec::new()
    }

    fn save(&self, entries: &[RoundStats]) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, contents)
    }
}

/// Session-only storage, used when no durable backend is available and as
/// the test fake.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<Vec<RoundStats>>,
}

impl LeaderboardStorage for MemoryStorage {
    fn load(&self) -> Vec<RoundStats> {
        self.entries.borrow().clone()
    }

    fn save(&self, entries: &[RoundStats]) -> std::io::Result<()> {
        *self.entries.borrow_mut() = entries.to_vec();
        Ok(())
    }
}

/// Bounded, sorted record of past rounds: at most five entries, descending
/// by score, ties keeping insertion order.
pub struct LeaderboardStore {
    storage: Box<dyn LeaderboardStorage>,
    entries: Vec<RoundStats>,
}

impl LeaderboardStore {
    pub const MAX_ENTRIES: usize = 5;

    pub fn new(storage: Box<dyn LeaderboardStorage>) -> Self {
        let entries = storage.load();
        Self { storage, entries }
    }

    /// Inserts, resorts, trims to the top five, and persists. A failed
    /// save keeps the in-memory list serving for the rest of the session.
    pub fn record(&mut self, entry: RoundStats) -> &[RoundStats] {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(Self::MAX_ENTRIES);

        if let Err(err) = self.storage.save(&self.entries) {
            warn!(
                target: "leaderboard",
                "Could not persist leaderboard, continuing in-memory: {}",
                err
            );
        }

        &self.entries
    }

    pub fn top_entries(&self) -> &[RoundStats] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use std::time::Duration;
    use uuid::Uuid;

    fn entry(score: u32, moves: u32) -> RoundStats {
        RoundStats {
            score,
            completion_time: Duration::from_secs(30),
            moves,
            difficulty: Difficulty::Medium,
            timestamp: 1_700_000_000,
            playthrough_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_record_sorts_descending_by_score() {
        let mut store = LeaderboardStore::new(Box::new(MemoryStorage::default()));
        store.record(entry(500, 20));
        store.record(entry(900, 5));
        store.record(entry(700, 10));

        let scores: Vec<u32> = store.top_entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 700, 500]);
    }

    #[test]
    fn test_record_trims_to_five_entries() {
        let mut store = LeaderboardStore::new(Box::new(MemoryStorage::default()));
        for score in [100, 200, 300, 400, 500, 600, 700] {
            store.record(entry(score, 1));
        }

        let scores: Vec<u32> = store.top_entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![700, 600, 500, 400, 300]);
    }

    #[test]
    fn test_low_scoring_sixth_entry_is_dropped() {
        let mut store = LeaderboardStore::new(Box::new(MemoryStorage::default()));
        for score in [900, 800, 700, 600, 500] {
            store.record(entry(score, 1));
        }
        store.record(entry(10, 99));

        let scores: Vec<u32> = store.top_entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 800, 700, 600, 500]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut store = LeaderboardStore::new(Box::new(MemoryStorage::default()));
        let first = entry(500, 1);
        let second = entry(500, 2);
        store.record(first.clone());
        store.record(second.clone());

        assert_eq!(store.top_entries()[0].playthrough_id, first.playthrough_id);
        assert_eq!(store.top_entries()[1].playthrough_id, second.playthrough_id);
    }

    #[test]
    fn test_entries_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = LeaderboardStore::new(Box::new(JsonFileStorage::new(dir.path())));
        store.record(entry(750, 12));
        store.record(entry(850, 8));

        let reopened = LeaderboardStore::new(Box::new(JsonFileStorage::new(dir.path())));
        let scores: Vec<u32> = reopened.top_entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![850, 750]);
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_leaderboard() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("leaderboard.json"), "][ nope").unwrap();

        let store = LeaderboardStore::new(Box::new(JsonFileStorage::new(dir.path())));
        assert!(store.top_entries().is_empty());
    }

    #[test]
    fn test_missing_file_reads_as_empty_leaderboard() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(Box::new(JsonFileStorage::new(dir.path())));
        assert!(store.top_entries().is_empty());
    }

    struct FailingStorage;

    impl LeaderboardStorage for FailingStorage {
        fn load(&self) -> Vec<RoundStats> {
            Vec::new()
        }

        fn save(&self, _entries: &[RoundStats]) -> std::io::Result<()> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "storage unavailable",
            ))
        }
    }

    #[test]
    fn test_save_failure_degrades_to_in_memory() {
        let mut store = LeaderboardStore::new(Box::new(FailingStorage));
        let recorded = store.record(entry(640, 14)).to_vec();

        assert_eq!(recorded.len(), 1);
        assert_eq!(store.top_entries().len(), 1);
        assert_eq!(store.top_entries()[0].score, 640);
    }
}
