//! Rules configuration
//!
//! Timing and lock parameters can be tuned from a JSON file. Every field has a
//! default, so a partial file (or `{}`) is valid. Values are clamped into sane
//! ranges by [`RulesConfig::sanitized`] instead of being rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    COOP_PLACEMENT_MS, DEFAULT_ARR_MS, DEFAULT_DAS_MS, FLIP_JAM_FLASH_MS, GROUNDED_CEILING_MS,
    LIFE_LOSS_ANIM_MS, LINE_CLEAR_MS, LOCK_DEGRADE_AFTER, LOCK_DEGRADE_STEP_MS, LOCK_DELAY_MIN_MS,
    LOCK_DELAY_MS, LOCK_MOVE_LIMIT, LOCK_RESET_COOLDOWN_MS, SOFT_DROP_INTERVAL_MS, TETRIS_CLEAR_MS,
};

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rules JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub das_ms: u32,
    pub arr_ms: u32,
    pub soft_drop_interval_ms: u32,
    pub lock_delay_ms: u32,
    pub lock_reset_cooldown_ms: u32,
    /// Resets allowed before the lock delay starts to shrink
    pub lock_degrade_after: u32,
    pub lock_degrade_step_ms: u32,
    pub lock_delay_min_ms: u32,
    pub lock_move_limit: u32,
    pub grounded_ceiling_ms: u32,
    pub line_clear_ms: u32,
    pub tetris_clear_ms: u32,
    pub flip_jam_flash_ms: u32,
    pub life_loss_anim_ms: u32,
    pub coop_placement_ms: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            soft_drop_interval_ms: SOFT_DROP_INTERVAL_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            lock_reset_cooldown_ms: LOCK_RESET_COOLDOWN_MS,
            lock_degrade_after: LOCK_DEGRADE_AFTER,
            lock_degrade_step_ms: LOCK_DEGRADE_STEP_MS,
            lock_delay_min_ms: LOCK_DELAY_MIN_MS,
            lock_move_limit: LOCK_MOVE_LIMIT,
            grounded_ceiling_ms: GROUNDED_CEILING_MS,
            line_clear_ms: LINE_CLEAR_MS,
            tetris_clear_ms: TETRIS_CLEAR_MS,
            flip_jam_flash_ms: FLIP_JAM_FLASH_MS,
            life_loss_anim_ms: LIFE_LOSS_ANIM_MS,
            coop_placement_ms: COOP_PLACEMENT_MS,
        }
    }
}

impl RulesConfig {
    /// Parse and sanitize a JSON document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: RulesConfig = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Load and sanitize a JSON rules file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Clamp every field into its playable range
    pub fn sanitized(mut self) -> Self {
        self.das_ms = self.das_ms.min(1_000);
        self.arr_ms = self.arr_ms.min(500);
        self.soft_drop_interval_ms = self.soft_drop_interval_ms.clamp(1, 1_000);
        self.lock_delay_ms = self.lock_delay_ms.clamp(1, 5_000);
        self.lock_delay_min_ms = self.lock_delay_min_ms.clamp(1, self.lock_delay_ms);
        self.lock_reset_cooldown_ms = self.lock_reset_cooldown_ms.min(self.lock_delay_ms);
        self.lock_move_limit = self.lock_move_limit.clamp(1, 100);
        self.grounded_ceiling_ms = self.grounded_ceiling_ms.max(self.lock_delay_ms);
        self.line_clear_ms = self.line_clear_ms.clamp(1, 5_000);
        self.tetris_clear_ms = self.tetris_clear_ms.clamp(1, 5_000);
        self.flip_jam_flash_ms = self.flip_jam_flash_ms.min(5_000);
        self.life_loss_anim_ms = self.life_loss_anim_ms.clamp(1, 5_000);
        self.coop_placement_ms = self.coop_placement_ms.clamp(1_000, 120_000);
        self
    }

    /// Lock delay after `resets` grounded resets
    pub fn lock_delay_after_resets(&self, resets: u32) -> u32 {
        let over = resets.saturating_sub(self.lock_degrade_after);
        self.lock_delay_ms
            .saturating_sub(over.saturating_mul(self.lock_degrade_step_ms))
            .max(self.lock_delay_min_ms)
    }

    /// Clear animation length for a clear of `lines`
    pub fn clear_ms(&self, lines: usize) -> u32 {
        if lines >= 4 {
            self.tetris_clear_ms
        } else {
            self.line_clear_ms
        }
    }
}
