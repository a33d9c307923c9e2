//! Board rendering
//!
//! Pixel layout, colours and animation belong to whichever front end embeds
//! the engine. This module only draws boards as text for terminals and logs.

pub mod text;

pub use text::{render_board, render_status};
