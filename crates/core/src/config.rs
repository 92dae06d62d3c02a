//! Engine configuration.
//!
//! Defaults reproduce classic 2048. Hosts can override any field directly
//! or pick them up from the environment with [`EngineConfig::from_env`].

use crate::error::ConfigError;
use crate::types::{
    RankLadder, DEFAULT_HEIGHT, DEFAULT_RANK_COUNT, DEFAULT_WIDTH, INITIAL_TILES, MAX_RANK_COUNT,
    STREAK_MIN_VALUE,
};

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    /// Number of rungs on the rank ladder (11 = values 2 through 2048)
    pub rank_count: u8,
    /// Smallest merged value that can extend a streak
    pub streak_min_value: u32,
    /// Seed for the default spawn RNG
    pub seed: u64,
    /// Tiles placed by `new_game`
    pub initial_tiles: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rank_count: DEFAULT_RANK_COUNT,
            streak_min_value: STREAK_MIN_VALUE,
            seed: 1,
            initial_tiles: INITIAL_TILES,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    ///
    /// Reads `TILE_MERGE_WIDTH`, `TILE_MERGE_HEIGHT`, `TILE_MERGE_RANKS` and
    /// `TILE_MERGE_SEED`. Missing or unparsable values keep their default.
    pub fn from_env() -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            width: parsed("TILE_MERGE_WIDTH").unwrap_or(defaults.width),
            height: parsed("TILE_MERGE_HEIGHT").unwrap_or(defaults.height),
            rank_count: parsed("TILE_MERGE_RANKS").unwrap_or(defaults.rank_count),
            seed: parsed("TILE_MERGE_SEED").unwrap_or(defaults.seed),
            ..defaults
        }
    }

    pub fn with_size(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn size(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn ladder(&self) -> RankLadder {
        RankLadder::new(self.rank_count)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.rank_count == 0 || self.rank_count > MAX_RANK_COUNT {
            return Err(ConfigError::RankCount {
                actual: self.rank_count,
                max: MAX_RANK_COUNT,
            });
        }
        if self.initial_tiles as usize > self.size() {
            return Err(ConfigError::TooManyInitialTiles {
                initial: self.initial_tiles,
                size: self.size(),
            });
        }
        Ok(())
    }
}
