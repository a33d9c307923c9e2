//! Platform abstraction layer
//!
//! The engine only ever sees `Direction` values. Whatever produces them
//! (terminal, browser keyboard hook, on-screen arrows) maps its raw input
//! through here.

pub mod input;

pub use input::{Command, command_for_key, direction_for_key};
