//! Slide Merge - a grid-based "slide and merge" puzzle engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board, move resolution, spawning, game over)
//! - `renderer`: Plain-text board rendering for terminals
//! - `platform`: Input mapping from key names to directions
//! - `settings`: Data-driven game configuration

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{Board, Direction, GameState, StepOutcome, Tile, TileStatus, resolve, step};

/// Game configuration constants
pub mod consts {
    /// Default board edge length (N for an N×N grid)
    pub const BOARD_SIZE: usize = 4;
    /// Largest board edge length accepted from settings
    pub const MAX_BOARD_SIZE: usize = 16;
    /// Value of every freshly spawned tile
    pub const MIN_TILE_VALUE: u32 = 2;
    /// Tile value that announces a win
    pub const TARGET_TILE_VALUE: u32 = 2048;
    /// Largest power of two a `u32` tile can hold; tiles this big no longer merge
    pub const MAX_TILE_VALUE: u32 = 1 << 31;
}

