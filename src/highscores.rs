//! Run leaderboard
//!
//! One entry per finished run, ranked by final score and then by how far the
//! run got. Persisted to LocalStorage in the browser.

use serde::{Deserialize, Serialize};

use crate::report::RunSummary;

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub score: i64,
    pub levels_cleared: u32,
    /// Whole-run accuracy (percent)
    pub accuracy: u32,
    /// Unix timestamp (ms) when the run ended
    pub timestamp: f64,
}

impl RunRecord {
    fn from_run(run: &RunSummary, timestamp: f64) -> Self {
        Self {
            score: run.final_score(),
            levels_cleared: run.levels_cleared(),
            accuracy: run.accuracy(),
            timestamp,
        }
    }

    fn rank_key(&self) -> (i64, u32) {
        (self.score, self.levels_cleared)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<RunRecord>,
}

impl HighScores {
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "scalpel_rush_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Only runs that ended with a positive score make the board
    fn qualifies(&self, record: &RunRecord) -> bool {
        if record.score <= 0 {
            return false;
        }
        self.entries.len() < MAX_HIGH_SCORES
            || self
                .entries
                .last()
                .is_some_and(|last| record.rank_key() > last.rank_key())
    }

    /// Record a finished run. Returns the 1-based rank, or None if it did
    /// not place. Ties rank below the earlier run.
    pub fn record_run(&mut self, run: &RunSummary, timestamp: f64) -> Option<usize> {
        if !run.is_over() {
            log::warn!("Ignoring unfinished run ({} levels)", run.levels.len());
            return None;
        }

        let record = RunRecord::from_run(run, timestamp);
        if !self.qualifies(&record) {
            return None;
        }

        let key = record.rank_key();
        let index = self.entries.partition_point(|e| e.rank_key() >= key);
        self.entries.insert(index, record);
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Run placed #{} with {} points", index + 1, key.0);
        Some(index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load the board from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let loaded = crate::platform::web::read_storage(Self::STORAGE_KEY).and_then(|json| {
            serde_json::from_str::<HighScores>(&json).map_err(crate::SimError::from)
        });
        match loaded {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::info!("{e}, starting a fresh leaderboard");
                Self::new()
            }
        }
    }

    /// Save the board to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let saved = serde_json::to_string(self)
            .map_err(crate::SimError::from)
            .and_then(|json| crate::platform::web::write_storage(Self::STORAGE_KEY, &json));
        if let Err(e) = saved {
            log::warn!("{e}");
        }
    }
}
