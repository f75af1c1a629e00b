//! Scoring, leveling, and the drop-speed curve

use std::time::Duration;

/// Base points for clearing 1-4 rows at once, multiplied by the level at the
/// time of the clear. Multi-row clears reward super-linearly.
const BASE_SCORE: [u64; 5] = [0, 100, 300, 500, 800];

/// Flat bonus per row of hard-drop distance
const HARD_DROP_BONUS: u64 = 2;

/// Interval between automatic descents at level 1
const BASE_INTERVAL_MS: u64 = 1000;
/// Interval shrink per level gained
const INTERVAL_STEP_MS: u64 = 100;
/// Automatic descent never gets faster than this
const MIN_INTERVAL_MS: u64 = 100;

/// Score, level and line tracking
#[derive(Debug, Clone)]
pub struct Score {
    pub points: u64,
    pub level: u32,
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Credit a line clear. Points use the level in effect when the rows were
    /// completed; the level is recomputed afterwards (every 10 lines).
    pub fn add_clear(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        let base = BASE_SCORE[rows.min(BASE_SCORE.len() - 1)];
        self.points += base * self.level as u64;
        self.lines += rows as u32;
        self.level = self.lines / 10 + 1;
    }

    /// Credit hard-drop distance (2 points per row)
    pub fn add_hard_drop(&mut self, rows: u32) {
        self.points += HARD_DROP_BONUS * rows as u64;
    }

    /// Time budget between automatic descents: non-increasing in level,
    /// floored so descent never becomes instantaneous
    pub fn drop_interval(&self) -> Duration {
        let ms = BASE_INTERVAL_MS
            .saturating_sub((self.level as u64 - 1) * INTERVAL_STEP_MS)
            .max(MIN_INTERVAL_MS);
        Duration::from_millis(ms)
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}
