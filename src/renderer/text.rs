//! Plain-text board drawing

use std::fmt::Write;

use crate::sim::{Board, GameState};

/// Narrowest cell, wide enough for "2048"
const MIN_CELL_WIDTH: usize = 4;

/// Draw the board as a boxed grid, one text row per board row
pub fn render_board(board: &Board) -> String {
    let size = board.size();
    let width = board.max_value().to_string().len().max(MIN_CELL_WIDTH);

    let mut cells = vec![None; size * size];
    for tile in board.tiles() {
        cells[tile.y * size + tile.x] = Some(tile.value);
    }

    let border = format!("+{}\n", format!("{}+", "-".repeat(width + 2)).repeat(size));
    let mut out = String::with_capacity(border.len() * (size * 2 + 1));
    out.push_str(&border);
    for row in cells.chunks(size.max(1)) {
        out.push('|');
        for cell in row {
            // Writing to a String cannot fail
            let _ = match cell {
                Some(value) => write!(out, " {:>width$} |", value),
                None => write!(out, " {:>width$} |", "."),
            };
        }
        out.push('\n');
        out.push_str(&border);
    }
    out
}

/// One-line status for the current game
pub fn render_status(state: &GameState) -> String {
    let mut line = format!(
        "moves: {}  max tile: {}",
        state.moves,
        state.max_tile_value()
    );
    if state.is_game_over() {
        line.push_str("  GAME OVER (r to restart, q to quit)");
    }
    line
}
