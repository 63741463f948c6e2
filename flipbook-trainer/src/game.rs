//! A played game: the sequence of positions plus header metadata.
//!
//! Records come from an external game-record reader; the book treats
//! them as read-only. [`Game::from_moves`] builds one directly from a
//! move sequence, which is what tests and direct book insertion use.

use flipbook_othello::{Board, Field, IllegalMove, Player};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("player {0} is not playing this game")]
pub struct UnknownPlayer(pub String);

/// An ordered sequence of positions, one per ply, from the starting
/// position through the final one, plus header key/value metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Game {
    pub boards: Vec<Board>,
    pub metadata: BTreeMap<String, String>,
}

impl Game {
    /// Replay a move sequence from the starting position.
    pub fn from_moves(moves: &[Field]) -> Result<Self, IllegalMove> {
        let mut board = Board::new();
        let mut boards = vec![board];

        for &mv in moves {
            board = board.do_move(mv)?;
            boards.push(board);
        }

        Ok(Self {
            boards,
            metadata: BTreeMap::new(),
        })
    }

    /// Which color `player_name` played, from the header metadata.
    pub fn color_of(&self, player_name: &str) -> Result<Player, UnknownPlayer> {
        if self.metadata.get("Black").map(String::as_str) == Some(player_name) {
            return Ok(Player::Black);
        }
        if self.metadata.get("White").map(String::as_str) == Some(player_name) {
            return Ok(Player::White);
        }
        Err(UnknownPlayer(player_name.to_owned()))
    }

    /// Whether this game was played from a randomized "xot" opening.
    pub fn is_xot(&self) -> bool {
        self.metadata.get("Variant").map(String::as_str) == Some("xot")
    }
}
