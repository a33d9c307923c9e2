//! Spawn allocator
//!
//! Owns the seeded RNG and the tile id counter. Ids are handed out in
//! increasing order and never reused within a game.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Board, Tile, TileId, TileStatus};

#[derive(Debug, Clone)]
pub struct SpawnAllocator {
    rng: Pcg32,
    next_id: u64,
    tile_value: u32,
}

impl SpawnAllocator {
    /// `tile_value` is the value every spawned tile starts with
    pub fn new(seed: u64, tile_value: u32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tile_value,
        }
    }

    /// Allocate a new tile id
    pub fn next_tile_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Make sure ids handed out from now on are above `max_id`
    pub fn reserve_ids_through(&mut self, max_id: Option<TileId>) {
        if let Some(TileId(max)) = max_id {
            self.next_id = self.next_id.max(max + 1);
        }
    }

    /// Pick a uniformly random empty cell and create a tile there.
    ///
    /// Returns `None` on a full board. The board itself is not touched.
    pub fn spawn(&mut self, board: &Board) -> Option<Tile> {
        let empty = board.empty_cells();
        if empty.is_empty() {
            return None;
        }

        let (x, y) = empty[self.rng.random_range(0..empty.len())];
        let mut tile = Tile::new(self.next_tile_id(), x, y, self.tile_value);
        tile.status = TileStatus::Moved;
        log::debug!("Spawned {} ({}) at ({}, {})", tile.id, tile.value, x, y);
        Some(tile)
    }

    /// A fresh board holding a single spawned tile
    pub fn seed_board(&mut self, size: usize) -> Board {
        let board = Board::empty(size);
        match self.spawn(&board) {
            Some(tile) => board.with_tile(tile),
            None => board,
        }
    }
}
