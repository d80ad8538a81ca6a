//! Run configuration.
//!
//! Everything here has a default matching the classic ruleset; a JSON file
//! may override any subset of fields.

use std::{fs, path::Path};

use dungeon::constants::MAX_GRID_SIDE;
use error::{GameError, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid columns, fixed for the whole run
    pub width: i32,
    /// Grid rows, fixed for the whole run
    pub height: i32,
    pub player_max_hp: i32,
    pub enemy_max_hp: i32,
    /// Enemy count per floor is drawn uniformly from `min_enemies..=max_enemies`
    pub min_enemies: i32,
    pub max_enemies: i32,
    /// Random draws allowed per enemy before placement gives up
    pub placement_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 30,
            player_max_hp: 20,
            enemy_max_hp: 8,
            min_enemies: 5,
            max_enemies: 10,
            placement_attempts: 1000,
        }
    }
}

impl GameConfig {
    /// Load overrides from a JSON file and validate the result
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "grid must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(GameError::InvalidConfig(format!(
                "grid may be at most {}x{}, got {}x{}",
                MAX_GRID_SIDE, MAX_GRID_SIDE, self.width, self.height
            )));
        }
        if self.player_max_hp <= 0 || self.enemy_max_hp <= 0 {
            return Err(GameError::InvalidConfig(
                "hit points must be positive".to_string(),
            ));
        }
        if self.min_enemies < 1 || self.min_enemies > self.max_enemies {
            return Err(GameError::InvalidConfig(format!(
                "enemy range {}..={} is empty or starts below 1",
                self.min_enemies, self.max_enemies
            )));
        }
        if self.placement_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "placement_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
