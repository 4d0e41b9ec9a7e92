//! Best-score tracking
//!
//! The best score is a single integer in the settings store. It only ever
//! grows: a run overwrites it when it beats the stored value.

use crate::consts::HIGHSCORE_KEY;
use crate::persistence::{KeyValueStore, StoreError};

/// Result of recording a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighScoreOutcome {
    /// Best score after this run
    pub high_score: u32,
    /// This run set the record
    pub new_record: bool,
}

/// High score accessor over a settings store
pub struct HighScore;

impl HighScore {
    /// Stored best score (0 if never set)
    pub fn load(store: &dyn KeyValueStore) -> u32 {
        store.get_int(HIGHSCORE_KEY).clamp(0, u32::MAX as i64) as u32
    }

    /// Record a finished run, writing and flushing only on a new record.
    ///
    /// On a flush error the in-memory store already holds the new value.
    pub fn record(
        store: &mut dyn KeyValueStore,
        score: u32,
    ) -> Result<HighScoreOutcome, StoreError> {
        let stored = Self::load(store);
        if score <= stored {
            return Ok(HighScoreOutcome {
                high_score: stored,
                new_record: false,
            });
        }

        store.set_int(HIGHSCORE_KEY, score as i64);
        store.flush()?;
        log::info!("New high score: {} (was {})", score, stored);
        Ok(HighScoreOutcome {
            high_score: score,
            new_record: true,
        })
    }

    /// Label text for a best score
    pub fn label(high_score: u32) -> String {
        format!("High Score: {}", high_score)
    }
}
