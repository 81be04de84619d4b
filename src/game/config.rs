use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest allowed arena side, wall frame included
pub const MIN_ARENA_SIDE: usize = 4;

/// Configuration for a round
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the arena, wall frame included
    pub grid_width: usize,
    /// Height of the arena, wall frame included
    pub grid_height: usize,

    // Rewards handed to learning policies
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for hitting a wall or itself
    pub death_penalty: f32,
    /// Reward for any other move
    pub step_reward: f32,

    /// End the round after this many ticks even if snakes survive
    pub max_ticks: Option<u64>,
    /// Seed for the round's random generator; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 20,
            food_reward: 10.0,
            death_penalty: -10.0,
            step_reward: 0.0,
            max_ticks: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom arena size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small arena for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder-style tick cap
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the arena leaves at least a 2x2 interior
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < MIN_ARENA_SIDE || self.grid_height < MIN_ARENA_SIDE {
            return Err(ConfigError::ArenaTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        Ok(())
    }
}
