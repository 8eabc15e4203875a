//! Score tracking
//!
//! Current score for the run plus the high score, which is written through to
//! the persistent store whenever it is beaten. Persistence is best effort: a
//! failed read counts as 0 and a failed write is skipped.

use serde::{Deserialize, Serialize};

use crate::persistence::HighScoreStore;

/// Read-only view for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub current: u32,
    pub high_score: u32,
}

pub struct ScoreTracker {
    current: u32,
    high_score: u32,
    store: Box<dyn HighScoreStore>,
}

impl ScoreTracker {
    /// Create a tracker and load the stored high score
    pub fn new(store: Box<dyn HighScoreStore>) -> Self {
        let mut tracker = Self {
            current: 0,
            high_score: 0,
            store,
        };
        tracker.reset();
        tracker
    }

    /// Zero the current score and reload the high score. The high score never
    /// drops below what this process has already seen.
    pub fn reset(&mut self) {
        self.current = 0;
        let stored = match self.store.load_high_score() {
            Ok(score) => score,
            Err(e) => {
                log::warn!("Could not load high score, using 0: {}", e);
                0
            }
        };
        self.high_score = self.high_score.max(stored);
    }

    /// Add points. Returns true when this set a new high score.
    pub fn award(&mut self, points: u32) -> bool {
        self.current = self.current.saturating_add(points);
        if self.current <= self.high_score {
            return false;
        }

        self.high_score = self.current;
        if let Err(e) = self.store.save_high_score(self.high_score) {
            log::warn!("Could not save high score {}: {}", self.high_score, e);
        }
        true
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            current: self.current,
            high_score: self.high_score,
        }
    }
}

impl std::fmt::Debug for ScoreTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreTracker")
            .field("current", &self.current)
            .field("high_score", &self.high_score)
            .finish_non_exhaustive()
    }
}
