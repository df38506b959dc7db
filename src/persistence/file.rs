//! JSON file store for native builds
//!
//! Writes go to `<path>.tmp` first and are renamed over the real file so a
//! crash mid-write never leaves a truncated record behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{BestScoreRecord, ScoreStore};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> io::Result<Option<BestScoreRecord>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(BestScoreRecord::parse(&raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, record: &BestScoreRecord) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }
}

impl ScoreStore for JsonFileStore {
    fn load_best_score(&self) -> u32 {
        match self.read() {
            Ok(Some(record)) => {
                log::info!("Loaded best score {} from {}", record.best_score, self.path.display());
                record.best_score
            }
            Ok(None) => {
                log::info!("No usable best score at {}, starting at 0", self.path.display());
                0
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn store_best_score(&mut self, value: u32) {
        // Read-modify-write: never lower what another session stored
        let stored = match self.read() {
            Ok(record) => record.map_or(0, |r| r.best_score),
            Err(e) => {
                log::warn!("Not saving best score, failed to read {}: {}", self.path.display(), e);
                return;
            }
        };
        if value <= stored {
            return;
        }
        match self.write(&BestScoreRecord { best_score: value }) {
            Ok(()) => log::info!("Best score {} saved", value),
            Err(e) => log::error!("Failed to save best score to {}: {}", self.path.display(), e),
        }
    }
}
