//! Engine configuration.
//!
//! Deserializable from JSON with every field optional; missing fields take the
//! standard-game defaults.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::scoring::ScoringConfig;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, DEFAULT_PREVIEW, MAX_PREVIEW};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u16,
    pub height: u16,
    /// Number of upcoming pieces exposed in observations.
    pub preview_count: usize,
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            preview_count: DEFAULT_PREVIEW,
            scoring: ScoringConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_size(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        Board::validate_dimensions(self.width, self.height)?;
        if !(1..=MAX_PREVIEW).contains(&self.preview_count) {
            return Err(EngineError::Configuration(format!(
                "preview_count must be in 1..={MAX_PREVIEW}, got {}",
                self.preview_count
            )));
        }
        self.scoring.validate()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| EngineError::Configuration(format!("invalid config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
