//! `flipbook-othello` implements the Othello game rules on bitboards.
//!
//! The crate is organized in two levels:
//!
//!  - [`bitboard`] contains the raw mask operations: counting, iteration,
//!    and the three bit permutations that generate the 8 board symmetries.
//!  - [`Board`] implements the game itself: move generation and
//!    application, symmetry normalization, the textual position ID, and
//!    the per-square classification consumed by renderers.
//!
//! Moves are written in [`Field`] notation: a column letter and a row
//! digit ("d3"), or `--` for a pass.

pub mod bitboard;

mod board;
mod field;
mod utils;

pub use bitboard::Bitboard;
pub use board::*;
pub use field::*;

/// The number of spaces on one edge of an Othello board.
pub const EDGE_LENGTH: usize = 8;

/// The number of spaces on an Othello board.
pub const NUM_SPACES: usize = 64;
