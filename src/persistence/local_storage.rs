//! LocalStorage store for the browser build
//!
//! Reads both the bare integer older pages stored under `bestScore`
//! and the JSON record this crate writes.

use super::{BestScoreRecord, ScoreStore};

#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

impl LocalStorageStore {
    pub const DEFAULT_KEY: &'static str = "bestScore";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    fn read(&self) -> Option<BestScoreRecord> {
        let raw = Self::storage()?.get_item(&self.key).ok()??;
        BestScoreRecord::parse(&raw)
    }
}

impl ScoreStore for LocalStorageStore {
    fn load_best_score(&self) -> u32 {
        match self.read() {
            Some(record) => {
                log::info!("Loaded best score {}", record.best_score);
                record.best_score
            }
            None => {
                log::info!("No best score found, starting fresh");
                0
            }
        }
    }

    fn store_best_score(&mut self, value: u32) {
        if self.read().is_some_and(|r| r.best_score >= value) {
            return;
        }
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score not saved");
            return;
        };
        if let Ok(json) = serde_json::to_string(&BestScoreRecord { best_score: value }) {
            if storage.set_item(&self.key, &json).is_err() {
                log::warn!("Failed to save best score");
            } else {
                log::info!("Best score {} saved", value);
            }
        }
    }
}
