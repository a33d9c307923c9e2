//! Game-over detection

use super::resolve::resolve;
use super::state::{Board, Direction};

/// Whether sliding `board` toward `direction` changes its layout
pub fn can_move(board: &Board, direction: Direction) -> bool {
    !resolve(board.clone(), direction).same_layout(board)
}

/// Directions that would change the board, in `Direction::ALL` order
pub fn legal_directions(board: &Board) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&d| can_move(board, d))
        .collect()
}

/// True when no move can change the board.
///
/// A board with an empty cell is never terminal: some tile can always slide
/// into it, or a spawn can fill it.
pub fn is_terminal(board: &Board) -> bool {
    if !board.is_full() {
        return false;
    }
    Direction::ALL.into_iter().all(|d| !can_move(board, d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Tile, TileId};

    fn grid<const N: usize>(rows: [[u32; N]; N]) -> Board {
        let tiles = rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, v)| **v != 0)
                    .map(move |(x, &v)| (x, y, v))
            })
            .enumerate()
            .map(|(i, (x, y, v))| Tile::new(TileId(i as u64 + 1), x, y, v))
            .collect();
        Board::from_tiles(N, tiles).unwrap()
    }

    #[test]
    fn test_checkerboard_is_terminal() {
        let board = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(is_terminal(&board));
        assert!(legal_directions(&board).is_empty());
    }

    #[test]
    fn test_full_board_with_vertical_pair_is_not_terminal() {
        let board = grid([[2, 4, 2, 4], [2, 8, 4, 2], [4, 2, 8, 4], [8, 4, 2, 8]]);
        assert!(board.is_full());
        assert!(!is_terminal(&board));
        assert_eq!(legal_directions(&board), vec![Direction::Up, Direction::Down]);
    }

    #[test]
    fn test_board_with_empty_cell_is_never_terminal() {
        let board = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
        assert!(!board.is_full());
        assert!(!is_terminal(&board));
    }

    #[test]
    fn test_blocked_direction_is_not_legal() {
        let board = grid([[2, 4, 0], [0, 0, 0], [0, 0, 0]]);
        assert!(!can_move(&board, Direction::Left));
        assert!(!can_move(&board, Direction::Up));
        assert!(can_move(&board, Direction::Right));
        assert!(can_move(&board, Direction::Down));
    }
}
