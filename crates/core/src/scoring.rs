//! Scoring module - line clear points, levels and gravity speed
//!
//! Every multiplier and threshold lives in [`ScoringConfig`]; the defaults are
//! the classic Nintendo table with a level every ten lines.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::{
    DROP_INTERVALS, DROP_INTERVAL_FLOOR_MS, GAME_OVER_PENALTY, HARD_DROP_REWARD_PER_CELL,
    LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_REWARD,
};

/// Scoring and speed tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base points indexed by rows cleared in one lock (index 0 = no rows).
    /// Clears larger than the table use its last entry.
    pub line_scores: Vec<u32>,
    /// Lines needed to advance one level.
    pub lines_per_level: u32,
    /// Gravity interval in milliseconds, indexed by level.
    pub drop_intervals_ms: Vec<u32>,
    /// Interval used past the table, and the lower bound for every entry.
    pub min_drop_interval_ms: u32,
    /// Shaping reward for each row moved by a soft drop.
    pub soft_drop_reward: i64,
    /// Shaping reward for each row travelled by a hard drop.
    pub hard_drop_reward_per_cell: i64,
    /// Subtracted from the reward of the call that ends the game.
    pub game_over_penalty: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            line_scores: LINE_SCORES.to_vec(),
            lines_per_level: LINES_PER_LEVEL,
            drop_intervals_ms: DROP_INTERVALS.to_vec(),
            min_drop_interval_ms: DROP_INTERVAL_FLOOR_MS,
            soft_drop_reward: SOFT_DROP_REWARD,
            hard_drop_reward_per_cell: HARD_DROP_REWARD_PER_CELL,
            game_over_penalty: GAME_OVER_PENALTY,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.line_scores.is_empty() {
            return Err(EngineError::Configuration(
                "line_scores must not be empty".to_string(),
            ));
        }
        if self.line_scores.windows(2).any(|w| w[0] > w[1]) {
            return Err(EngineError::Configuration(
                "line_scores must be non-decreasing".to_string(),
            ));
        }
        if self.lines_per_level == 0 {
            return Err(EngineError::Configuration(
                "lines_per_level must be positive".to_string(),
            ));
        }
        if self.min_drop_interval_ms == 0 {
            return Err(EngineError::Configuration(
                "min_drop_interval_ms must be positive".to_string(),
            ));
        }
        if self.drop_intervals_ms.windows(2).any(|w| w[0] < w[1]) {
            return Err(EngineError::Configuration(
                "drop_intervals_ms must be non-increasing".to_string(),
            ));
        }
        for (name, value) in [
            ("soft_drop_reward", self.soft_drop_reward),
            ("hard_drop_reward_per_cell", self.hard_drop_reward_per_cell),
            ("game_over_penalty", self.game_over_penalty),
        ] {
            if value < 0 {
                return Err(EngineError::Configuration(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Points for clearing `lines` rows in one lock at `level`.
    pub fn line_clear_points(&self, lines: usize, level: u32) -> u32 {
        if lines == 0 {
            return 0;
        }
        let idx = lines.min(self.line_scores.len() - 1);
        self.line_scores[idx].saturating_mul(level.saturating_add(1))
    }

    /// Level reached after `total_lines` cleared lines.
    pub fn level_for_lines(&self, total_lines: u32) -> u32 {
        total_lines / self.lines_per_level
    }

    /// Gravity interval for a level, never below `min_drop_interval_ms`.
    pub fn drop_interval_ms(&self, level: u32) -> u32 {
        self.drop_intervals_ms
            .get(level as usize)
            .copied()
            .unwrap_or(self.min_drop_interval_ms)
            .max(self.min_drop_interval_ms)
    }
}
