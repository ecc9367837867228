//! Run summaries and the progression store
//!
//! The store picks the cosmetic collectible skin and receives a summary once
//! per finished run. [`RunHistory`] keeps the best runs in memory and can be
//! saved as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::state::{DeathCause, RunStats};

/// Maximum number of runs to keep
pub const MAX_RUNS: usize = 10;

/// Skin used when nothing was unlocked
pub const DEFAULT_SKIN: &str = "weed";

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    /// Distance units travelled
    pub distance: u64,
    /// Distance plus bonus points
    pub score: u64,
    /// Simulation frames played
    pub frames: u64,
    /// `None` while the run is still going
    pub cause: Option<DeathCause>,
    /// Weed pickups collected
    pub weed: u32,
    pub best_combo: u32,
    pub shield_activations: u32,
    pub magnet_activations: u32,
    pub stats: RunStats,
}

/// External collaborator that owns persistent progress
pub trait ProgressionStore {
    /// Cosmetic variant for weed pickups
    fn collectible_skin(&self) -> &str;
    /// Called exactly once per finished run
    fn record_run(&mut self, summary: &RunSummary);
}

/// Best runs by distance, plus the unlocked skin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunHistory {
    pub entries: Vec<RunSummary>,
    pub skin: String,
    /// Every run ever recorded, qualifying or not
    pub total_runs: u64,
}

impl Default for RunHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl RunHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            skin: DEFAULT_SKIN.to_string(),
            total_runs: 0,
        }
    }

    pub fn with_skin(skin: impl Into<String>) -> Self {
        Self {
            skin: skin.into(),
            ..Self::new()
        }
    }

    /// Check if a distance earns a place in the history
    pub fn qualifies(&self, distance: u64) -> bool {
        if distance == 0 {
            return false;
        }
        if self.entries.len() < MAX_RUNS {
            return true;
        }
        self.entries.last().is_none_or(|e| distance > e.distance)
    }

    /// Rank a distance would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, distance: u64) -> Option<usize> {
        if !self.qualifies(distance) {
            return None;
        }
        let rank = self.entries.iter().position(|e| distance > e.distance);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run, keeping entries sorted by distance.
    /// Returns the rank achieved or None if it didn't qualify.
    pub fn add(&mut self, summary: RunSummary) -> Option<usize> {
        self.total_runs += 1;
        if !self.qualifies(summary.distance) {
            return None;
        }

        let pos = self.entries.iter().position(|e| summary.distance > e.distance);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, summary);
                i + 1
            }
            None => {
                self.entries.push(summary);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_RUNS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best_distance(&self) -> Option<u64> {
        self.entries.first().map(|e| e.distance)
    }

    /// Load from a JSON file, starting fresh when it is missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<RunHistory>(&json) {
                Ok(history) => {
                    log::info!("Loaded {} runs from {}", history.entries.len(), path.display());
                    history
                }
                Err(e) => {
                    log::warn!("Ignoring run history at {}: {e}", path.display());
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No run history found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Run history saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ProgressionStore for RunHistory {
    fn collectible_skin(&self) -> &str {
        &self.skin
    }

    fn record_run(&mut self, summary: &RunSummary) {
        let distance = summary.distance;
        match self.add(summary.clone()) {
            Some(rank) => log::info!("Run of {distance} ranked #{rank}"),
            None => log::debug!("Run of {distance} did not place"),
        }
    }
}

/// Run history written back to disk after every recorded run
#[derive(Debug, Clone)]
pub struct SavedHistory {
    pub history: RunHistory,
    path: PathBuf,
}

impl SavedHistory {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            history: RunHistory::load(&path),
            path,
        }
    }
}

impl ProgressionStore for SavedHistory {
    fn collectible_skin(&self) -> &str {
        self.history.collectible_skin()
    }

    fn record_run(&mut self, summary: &RunSummary) {
        self.history.record_run(summary);
        if let Err(e) = self.history.save(&self.path) {
            log::warn!("Failed to save run history to {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(distance: u64) -> RunSummary {
        RunSummary {
            seed: distance,
            distance,
            score: distance,
            frames: distance * 10,
            cause: Some(DeathCause::Fell),
            weed: 0,
            best_combo: 0,
            shield_activations: 0,
            magnet_activations: 0,
            stats: RunStats::default(),
        }
    }

    #[test]
    fn test_zero_distance_never_qualifies() {
        let history = RunHistory::new();
        assert!(!history.qualifies(0));
        assert_eq!(history.potential_rank(0), None);
    }

    #[test]
    fn test_entries_sorted_and_truncated() {
        let mut history = RunHistory::new();
        for d in 1..=12 {
            history.add(run(d * 10));
        }
        assert_eq!(history.entries.len(), MAX_RUNS);
        assert_eq!(history.best_distance(), Some(120));
        assert_eq!(history.entries.last().map(|e| e.distance), Some(30));
        assert!(!history.qualifies(30));
        assert_eq!(history.potential_rank(35), Some(10));
        assert_eq!(history.total_runs, 12);
    }

    #[test]
    fn test_add_returns_rank() {
        let mut history = RunHistory::new();
        assert_eq!(history.add(run(50)), Some(1));
        assert_eq!(history.add(run(100)), Some(1));
        assert_eq!(history.add(run(75)), Some(2));
        assert_eq!(history.add(run(10)), Some(4));
    }

    #[test]
    fn test_store_contract() {
        let mut history = RunHistory::with_skin("gold");
        assert_eq!(history.collectible_skin(), "gold");
        history.record_run(&run(42));
        assert_eq!(history.entries.len(), 1);
        assert_eq!(history.entries[0].cause, Some(DeathCause::Fell));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("street_runner_history_{}.json", std::process::id()));
        let mut history = RunHistory::new();
        history.add(run(64));
        history.save(&path).unwrap();
        let loaded = RunHistory::load(&path);
        assert_eq!(loaded.entries, history.entries);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_saved_history_persists_each_run() {
        let path = std::env::temp_dir().join(format!("street_runner_saved_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let mut store = SavedHistory::open(&path);
        store.record_run(&run(30));
        let reopened = SavedHistory::open(&path);
        assert_eq!(reopened.history.best_distance(), Some(30));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_starts_fresh() {
        let loaded = RunHistory::load("/nonexistent/street_runner/history.json");
        assert!(loaded.is_empty());
        assert_eq!(loaded.skin, DEFAULT_SKIN);
    }
}
