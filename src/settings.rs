//! Game settings
//!
//! Loaded from a JSON file; anything missing falls back to the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BOARD_SIZE, MAX_BOARD_SIZE, MIN_TILE_VALUE, TARGET_TILE_VALUE};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("board size {size} is outside 2..={max}")]
    BoardSize { size: usize, max: usize },
    #[error("minimum tile value {0} must be a power of two of at least 2")]
    MinTile(u32),
    #[error("target tile {target} must be a power of two above the minimum tile {min}")]
    TargetTile { target: u32, min: u32 },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Edge length of the N×N board
    pub board_size: usize,
    /// Value of every spawned tile
    pub min_tile_value: u32,
    /// Tile value that triggers the win announcement
    pub target_tile: u32,
    /// Spawn a tile even when the move changed nothing (older behaviour)
    pub spawn_on_noop: bool,
    /// Fixed run seed; a random one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            min_tile_value: MIN_TILE_VALUE,
            target_tile: TARGET_TILE_VALUE,
            spawn_on_noop: false,
            seed: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(2..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(SettingsError::BoardSize {
                size: self.board_size,
                max: MAX_BOARD_SIZE,
            });
        }
        if self.min_tile_value < 2 || !self.min_tile_value.is_power_of_two() {
            return Err(SettingsError::MinTile(self.min_tile_value));
        }
        if !self.target_tile.is_power_of_two() || self.target_tile <= self.min_tile_value {
            return Err(SettingsError::TargetTile {
                target: self.target_tile,
                min: self.min_tile_value,
            });
        }
        Ok(())
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from `path`
    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read settings from `path`, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{} ({}), using default settings", e, path.display());
                Self::default()
            }
        }
    }
}
