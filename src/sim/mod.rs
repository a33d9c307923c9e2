//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Moves are resolved synchronously, one at a time
//! - Seeded RNG only (spawn cell choice is the single source of chance)
//! - Stable iteration order (lanes in coordinate order)
//! - No rendering or platform dependencies

pub mod resolve;
pub mod spawn;
pub mod state;
pub mod step;
pub mod terminal;

pub use resolve::{merged_tiles, resolve, resolve_lane};
pub use spawn::SpawnAllocator;
pub use state::{
    Axis, Board, BoardError, Direction, GameEvent, GamePhase, GameState, Tile, TileId, TileStatus,
};
pub use step::{AUTOPLAY_PREFERENCE, StepOutcome, autoplay_direction, step};
pub use terminal::{can_move, is_terminal, legal_directions};
