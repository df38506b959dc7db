//! Best-score persistence
//!
//! The simulation reads the best score once at startup and emits
//! `GameEvent::BestScoreImproved` whenever it rises. A [`ScoreStore`] is the
//! collaborator on the other end:
//! - `load_best_score` never fails; anything unreadable counts as 0
//! - `store_best_score` is fire-and-forget and only ever raises the stored value

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use serde::{Deserialize, Serialize};

use crate::sim::EventSink;

/// Durable home of the best score
pub trait ScoreStore {
    /// Stored best score, 0 if nothing usable is stored
    fn load_best_score(&self) -> u32;

    /// Store `value` if it beats what is stored. Errors are logged, not returned.
    fn store_best_score(&mut self, value: u32);
}

/// On-disk / LocalStorage record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScoreRecord {
    pub best_score: u32,
}

impl BestScoreRecord {
    /// Parse either the JSON record or a bare integer
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(value) = raw.parse::<u32>() {
            return Some(Self { best_score: value });
        }
        serde_json::from_str(raw).ok()
    }
}

/// Volatile store for tests and sessions without storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u32,
    writes: u32,
}

impl MemoryStore {
    pub fn new(best: u32) -> Self {
        Self { best, writes: 0 }
    }

    /// Number of writes that actually changed the value
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn load_best_score(&self) -> u32 {
        self.best
    }

    fn store_best_score(&mut self, value: u32) {
        if value > self.best {
            self.best = value;
            self.writes += 1;
        }
    }
}

/// Adapter that persists best-score events into any store
pub struct PersistBestScore<'a, S: ScoreStore + ?Sized>(pub &'a mut S);

impl<S: ScoreStore + ?Sized> EventSink for PersistBestScore<'_, S> {
    fn on_best_score_improved(&mut self, value: u32) {
        self.0.store_best_score(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameEvent, dispatch};

    #[test]
    fn test_memory_store_only_raises() {
        let mut store = MemoryStore::new(10);
        store.store_best_score(4);
        assert_eq!(store.load_best_score(), 10);
        store.store_best_score(11);
        assert_eq!(store.load_best_score(), 11);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_record_parse_formats() {
        assert_eq!(BestScoreRecord::parse("17"), Some(BestScoreRecord { best_score: 17 }));
        assert_eq!(
            BestScoreRecord::parse(r#"{"best_score": 5}"#),
            Some(BestScoreRecord { best_score: 5 })
        );
        assert_eq!(BestScoreRecord::parse("-3"), None);
        assert_eq!(BestScoreRecord::parse("garbage"), None);
    }

    #[test]
    fn test_persist_adapter() {
        let mut store = MemoryStore::default();
        let events = [
            GameEvent::Score { score: 1 },
            GameEvent::BestScoreImproved(1),
            GameEvent::Score { score: 2 },
            GameEvent::BestScoreImproved(2),
        ];
        dispatch(&events, &mut PersistBestScore(&mut store));
        assert_eq!(store.load_best_score(), 2);
        assert_eq!(store.writes(), 2);
    }
}
