//! Score clock, difficulty curve and high-score persistence.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::ArcadeError;
use crate::games::DifficultyRule;

/// Whole seconds between the anchor frame and `now_ms`. Never negative.
pub fn elapsed_score(anchor_ms: f64, now_ms: f64) -> u32 {
    let secs = ((now_ms - anchor_ms) / 1000.0).floor();
    if secs.is_finite() && secs > 0.0 { secs.min(u32::MAX as f64) as u32 } else { 0 }
}

/// Difficulty level for an elapsed score: 1 at the start, one more every
/// `secs_per_level` seconds, capped.
pub fn difficulty_for(rule: &DifficultyRule, elapsed: u32) -> u32 {
    let cap = rule.cap.max(1);
    let step = rule.secs_per_level.max(1);
    (1 + elapsed / step).min(cap)
}

/// Durable storage for one integer per game.
pub trait HighScoreStore {
    /// Stored value for `key`, or 0 when nothing was stored yet.
    fn read_high_score(&self, key: &str) -> Result<u32, ArcadeError>;
    fn write_high_score(&mut self, key: &str, value: u32) -> Result<(), ArcadeError>;
}

/// In-memory store. Clones share the same map, so a test can keep a handle and
/// inspect what the game loop wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    scores: Rc<RefCell<HashMap<String, u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: u32) -> Self {
        self.scores.borrow_mut().insert(key.to_owned(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.scores.borrow().get(key).copied()
    }
}

impl HighScoreStore for MemoryStore {
    fn read_high_score(&self, key: &str) -> Result<u32, ArcadeError> {
        Ok(self.get(key).unwrap_or(0))
    }

    fn write_high_score(&mut self, key: &str, value: u32) -> Result<(), ArcadeError> {
        self.scores.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }
}

/// High-score policy on top of a store: reads default to 0 on failure, writes
/// only happen when a session beats the stored value, failures are logged.
pub struct HighScoreBook {
    store: Box<dyn HighScoreStore>,
    prefix: String,
}

impl HighScoreBook {
    pub fn new(store: Box<dyn HighScoreStore>) -> Self {
        Self::with_prefix(store, "")
    }

    pub fn with_prefix(store: Box<dyn HighScoreStore>, prefix: impl Into<String>) -> Self {
        Self { store, prefix: prefix.into() }
    }

    pub fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn best(&self, key: &str) -> u32 {
        let full = self.key(key);
        match self.store.read_high_score(&full) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %full, %err, "high score unreadable, using 0");
                0
            }
        }
    }

    /// Record a finished session. Returns the high score after the update.
    pub fn record(&mut self, key: &str, final_score: u32) -> u32 {
        let previous = self.best(key);
        if final_score <= previous {
            return previous;
        }
        let full = self.key(key);
        match self.store.write_high_score(&full, final_score) {
            Ok(()) => debug!(key = %full, previous, best = final_score, "new high score"),
            Err(err) => warn!(key = %full, %err, "high score not persisted"),
        }
        final_score
    }
}

impl std::fmt::Debug for HighScoreBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScoreBook").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}
