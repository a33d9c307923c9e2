//! Move resolution
//!
//! The tricky part of the game: sliding every tile toward one edge, merging
//! equal neighbours at most once each, without ever letting two tiles share a
//! cell.
//!
//! Tiles are grouped into lanes (rows for horizontal slides, columns for
//! vertical ones) and each lane is walked leading-edge first. A tile can then
//! only be blocked by a tile that already reached its final cell this pass,
//! which is what makes chained slides come out right: `[2, 2, 2]` sliding
//! left becomes `[4, 2]`, never `[8]` or `[2, 4]`.

use std::collections::BTreeMap;

use super::state::{Board, Direction, Tile, TileStatus};
use crate::consts::MAX_TILE_VALUE;

/// Resolve one slide of the whole board.
///
/// Deterministic and infallible. Statuses from the previous pass are
/// discarded. Returns a board with the same layout when nothing could move;
/// the caller decides what a no-op move means.
pub fn resolve(board: Board, direction: Direction) -> Board {
    let size = board.size();
    let before = board.len();

    let mut lanes: BTreeMap<usize, Vec<Tile>> = BTreeMap::new();
    for mut tile in board.into_tiles() {
        tile.status = TileStatus::default();
        lanes.entry(direction.lane(&tile)).or_default().push(tile);
    }

    let mut resolved = Vec::with_capacity(before);
    for (_, lane) in lanes {
        resolved.extend(resolve_lane(lane, direction, size));
    }

    log::trace!(
        "resolve {}: {} tiles -> {} tiles",
        direction,
        before,
        resolved.len()
    );

    Board::from_parts(size, resolved)
}

/// Resolve a single lane. Every tile must share the lane coordinate for
/// `direction`.
///
/// Returned tiles are ordered leading-edge first.
pub fn resolve_lane(mut lane: Vec<Tile>, direction: Direction, size: usize) -> Vec<Tile> {
    lane.sort_by_key(|t| direction.along(t));
    if direction.step() > 0 {
        lane.reverse();
    }

    let mut placed: Vec<Tile> = Vec::with_capacity(lane.len());
    for mut tile in lane {
        let origin = direction.along(&tile);

        // Only the most recently placed tile can be in the way: everything
        // before it is packed against the edge.
        match placed.last_mut() {
            None => {
                let target = direction.edge(size);
                direction.place(&mut tile, target);
                tile.status = if target == origin {
                    TileStatus::Stationary
                } else {
                    TileStatus::Moved
                };
            }
            Some(blocker) if can_merge(blocker, &tile) => {
                blocker.value *= 2;
                blocker.status = TileStatus::Merged;
                continue;
            }
            Some(blocker) => {
                // Stopped by another tile, so it stays put as far as the
                // presentation layer is concerned
                let target = direction.behind(direction.along(blocker));
                direction.place(&mut tile, target);
                tile.status = TileStatus::Stationary;
            }
        }
        placed.push(tile);
    }

    placed
}

/// `incoming` may fold into `blocker`.
///
/// Merge-locked tiles never merge twice in one pass, and tiles already at
/// `MAX_TILE_VALUE` stay as they are since doubling them would not fit.
#[inline]
fn can_merge(blocker: &Tile, incoming: &Tile) -> bool {
    blocker.value == incoming.value
        && blocker.status != TileStatus::Merged
        && blocker.value < MAX_TILE_VALUE
}

/// Tiles that absorbed another tile in the pass that produced `board`
pub fn merged_tiles(board: &Board) -> impl Iterator<Item = &Tile> {
    board
        .tiles()
        .iter()
        .filter(|t| t.status == TileStatus::Merged)
}
