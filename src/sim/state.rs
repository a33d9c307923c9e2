//! Board state and core game types
//!
//! Boards are immutable snapshots: the engine consumes one and hands back the
//! next. Everything the application layer needs between moves lives in
//! `GameState`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::spawn::SpawnAllocator;
use crate::settings::Settings;

/// Opaque tile identity, stable from spawn until the tile is consumed by a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile_{}", self.0)
    }
}

/// What happened to a tile during the most recent resolution pass.
///
/// Only meaningful as an animation hint; reset at the start of every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileStatus {
    /// Changed cell this pass, or was just spawned
    Moved,
    /// Absorbed an equal tile this pass (merge-locked until the next pass)
    Merged,
    /// Stayed where it was
    #[default]
    Stationary,
}

/// A single numbered piece on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub x: usize,
    pub y: usize,
    pub value: u32,
    #[serde(default)]
    pub status: TileStatus,
}

impl Tile {
    pub fn new(id: TileId, x: usize, y: usize, value: u32) -> Self {
        Self {
            id,
            x,
            y,
            value,
            status: TileStatus::default(),
        }
    }

    #[inline]
    pub fn pos(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}

/// Axis a slide travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Slide direction requested by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }

    /// Signed step along the axis (-1 toward the origin, +1 away from it)
    pub fn step(self) -> i32 {
        match self {
            Direction::Up | Direction::Left => -1,
            Direction::Down | Direction::Right => 1,
        }
    }

    /// Coordinate of `tile` along the slide axis
    #[inline]
    pub fn along(self, tile: &Tile) -> usize {
        match self.axis() {
            Axis::Horizontal => tile.x,
            Axis::Vertical => tile.y,
        }
    }

    /// Coordinate of `tile` orthogonal to the slide axis (its group key)
    #[inline]
    pub fn lane(self, tile: &Tile) -> usize {
        match self.axis() {
            Axis::Horizontal => tile.y,
            Axis::Vertical => tile.x,
        }
    }

    /// Destination edge on the slide axis
    #[inline]
    pub fn edge(self, size: usize) -> usize {
        if self.step() < 0 { 0 } else { size - 1 }
    }

    /// The cell one step away from the destination edge.
    ///
    /// `coord` must not be the far edge; callers only ask for the cell behind
    /// a tile that has another tile behind it.
    #[inline]
    pub fn behind(self, coord: usize) -> usize {
        if self.step() < 0 { coord + 1 } else { coord - 1 }
    }

    /// Move `tile` to `coord` along the slide axis
    #[inline]
    pub(crate) fn place(self, tile: &mut Tile, coord: usize) {
        match self.axis() {
            Axis::Horizontal => tile.x = coord,
            Axis::Vertical => tile.y = coord,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ways an externally supplied board can be malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board size must be at least 1")]
    ZeroSize,
    #[error("{id} at ({x}, {y}) lies outside a {size}x{size} board")]
    OutOfBounds {
        id: TileId,
        x: usize,
        y: usize,
        size: usize,
    },
    #[error("{first} and {second} both occupy ({x}, {y})")]
    Overlap {
        first: TileId,
        second: TileId,
        x: usize,
        y: usize,
    },
    #[error("duplicate tile id {0}")]
    DuplicateId(TileId),
    #[error("{id} has value {value}, which is not a power of two")]
    InvalidValue { id: TileId, value: u32 },
    #[error("{id} has value {value}, below the minimum tile value {min}")]
    BelowMinimum { id: TileId, value: u32, min: u32 },
    #[error("board is {size}x{size} but the game is configured for {expected}x{expected}")]
    SizeMismatch { size: usize, expected: usize },
}

/// An N×N board snapshot.
///
/// Tile order carries no game meaning; it only keeps rendering stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    tiles: Vec<Tile>,
}

#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    tiles: Vec<Tile>,
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        Board::from_tiles(raw.size, raw.tiles)
    }
}

impl Board {
    /// An empty board
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            tiles: Vec::new(),
        }
    }

    /// Build a board from arbitrary tiles, rejecting anything the engine would
    /// treat as a precondition violation
    pub fn from_tiles(size: usize, tiles: Vec<Tile>) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::ZeroSize);
        }

        let mut ids = HashSet::with_capacity(tiles.len());
        let mut cells: Vec<Option<TileId>> = vec![None; size * size];

        for tile in &tiles {
            if tile.x >= size || tile.y >= size {
                return Err(BoardError::OutOfBounds {
                    id: tile.id,
                    x: tile.x,
                    y: tile.y,
                    size,
                });
            }
            if !tile.value.is_power_of_two() {
                return Err(BoardError::InvalidValue {
                    id: tile.id,
                    value: tile.value,
                });
            }
            if !ids.insert(tile.id) {
                return Err(BoardError::DuplicateId(tile.id));
            }
            let cell = &mut cells[tile.y * size + tile.x];
            if let Some(first) = *cell {
                return Err(BoardError::Overlap {
                    first,
                    second: tile.id,
                    x: tile.x,
                    y: tile.y,
                });
            }
            *cell = Some(tile.id);
        }

        Ok(Self { size, tiles })
    }

    /// Reject tiles smaller than the game's spawn value
    pub fn check_min_value(&self, min: u32) -> Result<(), BoardError> {
        match self.tiles.iter().find(|t| t.value < min) {
            Some(t) => Err(BoardError::BelowMinimum {
                id: t.id,
                value: t.value,
                min,
            }),
            None => Ok(()),
        }
    }

    /// Assemble a board the engine produced itself (no validation)
    pub(crate) fn from_parts(size: usize, tiles: Vec<Tile>) -> Self {
        Self { size, tiles }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// No empty cell remains
    pub fn is_full(&self) -> bool {
        self.tiles.len() >= self.size * self.size
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.x == x && t.y == y)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut occupied = vec![false; self.size * self.size];
        for tile in &self.tiles {
            occupied[tile.y * self.size + tile.x] = true;
        }
        occupied
            .iter()
            .enumerate()
            .filter(|(_, taken)| !**taken)
            .map(|(i, _)| (i % self.size, i / self.size))
            .collect()
    }

    /// Highest tile value (0 on an empty board)
    pub fn max_value(&self) -> u32 {
        self.tiles.iter().map(|t| t.value).max().unwrap_or(0)
    }

    pub fn value_sum(&self) -> u64 {
        self.tiles.iter().map(|t| u64::from(t.value)).sum()
    }

    /// Sorted `(x, y, value)` triples; ids and statuses are ignored
    pub fn layout(&self) -> Vec<(usize, usize, u32)> {
        let mut layout: Vec<_> = self.tiles.iter().map(|t| (t.x, t.y, t.value)).collect();
        layout.sort_unstable();
        layout
    }

    /// Same tiles in the same cells with the same values
    pub fn same_layout(&self, other: &Board) -> bool {
        self.size == other.size && self.layout() == other.layout()
    }

    /// Largest tile id on the board
    pub fn max_id(&self) -> Option<TileId> {
        self.tiles.iter().map(|t| t.id).max()
    }

    /// Consume the board and return it with `tile` appended
    pub fn with_tile(mut self, tile: Tile) -> Self {
        self.tiles.push(tile);
        self
    }
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting moves
    Playing,
    /// No move changes the board; waiting for a restart
    GameOver,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The move changed nothing and was discarded
    MoveRejected { direction: Direction },
    /// `id` absorbed an equal tile and now holds `value`
    TileMerged {
        id: TileId,
        x: usize,
        y: usize,
        value: u32,
    },
    /// A new tile appeared
    TileSpawned {
        id: TileId,
        x: usize,
        y: usize,
        value: u32,
    },
    /// The target tile was reached for the first time this game
    TargetReached { value: u32 },
    /// No further move is possible
    GameOver { max_tile: u32 },
}

/// A running game: the current board plus the seeded spawn source
#[derive(Debug, Clone)]
pub struct GameState {
    /// Settings the game was started with
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Accepted moves so far
    pub moves: u64,
    pub(crate) board: Board,
    pub(crate) spawner: SpawnAllocator,
    pub(crate) target_announced: bool,
}

impl GameState {
    /// Start a game, taking the seed from settings or drawing a random one
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        Self::with_seed(settings, seed)
    }

    /// Start a game with an explicit seed
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        let mut spawner = SpawnAllocator::new(seed, settings.min_tile_value);
        let board = spawner.seed_board(settings.board_size);
        log::info!(
            "New {}x{} game with seed {}",
            settings.board_size,
            settings.board_size,
            seed
        );
        Self::assemble(settings, seed, board, spawner)
    }

    /// Continue from a prepared board (fixtures, puzzles, tests).
    ///
    /// The board must match the configured size and hold no tile below the
    /// minimum tile value.
    pub fn from_board(settings: Settings, seed: u64, board: Board) -> Result<Self, BoardError> {
        if board.size() != settings.board_size {
            return Err(BoardError::SizeMismatch {
                size: board.size(),
                expected: settings.board_size,
            });
        }
        board.check_min_value(settings.min_tile_value)?;

        let mut spawner = SpawnAllocator::new(seed, settings.min_tile_value);
        spawner.reserve_ids_through(board.max_id());
        Ok(Self::assemble(settings, seed, board, spawner))
    }

    fn assemble(settings: Settings, seed: u64, board: Board, spawner: SpawnAllocator) -> Self {
        let target_announced = board.max_value() >= settings.target_tile;
        let mut state = Self {
            settings,
            seed,
            phase: GamePhase::Playing,
            moves: 0,
            board,
            spawner,
            target_announced,
        };
        if super::is_terminal(&state.board) {
            state.phase = GamePhase::GameOver;
        }
        state
    }

    /// Seed for the next restart: the following seed in sequence when the
    /// run was seeded from settings, a random one otherwise
    pub fn restart_seed(&self) -> u64 {
        match self.settings.seed {
            Some(_) => self.seed.wrapping_add(1),
            None => rand::random(),
        }
    }

    /// Throw the current game away and start over
    pub fn restart(&mut self, seed: u64) {
        *self = Self::with_seed(self.settings.clone(), seed);
        log::info!("Game restarted with seed: {}", seed);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// For score display
    pub fn max_tile_value(&self) -> u32 {
        self.board.max_value()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
