//! Best score tracking
//!
//! A single best score, loaded once per session and persisted whenever a
//! finished round beats it.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Check if a finished round's score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0 && score > self.best
    }

    /// Record a finished round's score. Returns true if it set a new record.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        log::info!("New high score {} (was {})", score, self.best);
        self.best = score;
        true
    }

    /// Load the stored high score, starting fresh on any failure
    pub fn load(store: &dyn Storage) -> Self {
        match store.load_high_score() {
            Ok(Some(best)) => {
                log::info!("Loaded high score {}", best);
                Self::new(best)
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load high score: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn Storage) {
        match store.save_high_score(self.best) {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}
