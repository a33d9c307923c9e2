//! Key name → game input mapping

use crate::sim::Direction;

/// Non-move commands a front end can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
    Quit,
}

/// Map a key name to a slide direction.
///
/// Accepts DOM key names (`ArrowUp`), WASD, vi keys and the plain words, in
/// any case. Anything else is ignored.
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key.trim().to_lowercase().as_str() {
        "arrowup" | "up" | "w" | "k" => Some(Direction::Up),
        "arrowdown" | "down" | "s" | "j" => Some(Direction::Down),
        "arrowleft" | "left" | "a" | "h" => Some(Direction::Left),
        "arrowright" | "right" | "d" | "l" => Some(Direction::Right),
        _ => None,
    }
}

/// Map a key name to any command, moves included
pub fn command_for_key(key: &str) -> Option<Command> {
    if let Some(direction) = direction_for_key(key) {
        return Some(Command::Move(direction));
    }
    match key.trim().to_lowercase().as_str() {
        "r" | "restart" => Some(Command::Restart),
        "q" | "quit" | "escape" => Some(Command::Quit),
        _ => None,
    }
}
