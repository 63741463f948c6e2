//! The opening book: a map from canonical position to its designated
//! best reply, with strict internal-consistency rules and a procedure
//! for checking a played game against it.
//!
//! The book only ever stores canonical IDs; every lookup normalizes its
//! argument first, and callers denormalize answers back into play
//! orientation when comparing against a real game.

use crate::game::Game;
use crate::store::{BookData, BookStore, Opening, StoreError};
use flipbook_othello::{Board, Field, IllegalMove, Player};
use log::debug;
use thiserror::Error;

/// A single consistency failure found by [`OpeningBook::validate`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("board {board_id}: invalid ID")]
    MalformedKey { board_id: String },
    #[error("board {board_id}: invalid best_child ID")]
    MalformedChild { board_id: String },
    #[error("board {board_id}: key is not normalized")]
    KeyNotNormalized { board_id: String },
    #[error("board {board_id}: best_child is not normalized")]
    ChildNotNormalized { board_id: String },
    #[error("board {board_id}: best_child is not a valid child")]
    ChildNotReachable { board_id: String },
    #[error("board {board_id}: partial coverage of replies to {child_id}")]
    PartialCoverage { board_id: String, child_id: String },
}

#[derive(Debug, Error)]
pub enum BookError {
    #[error("book failed validation with {} violation(s)", .0.len())]
    Invalid(Vec<Violation>),
    #[error("board {board_id}: conflicting best_child (have {existing}, got {new})")]
    Conflict {
        board_id: String,
        existing: String,
        new: String,
    },
    #[error("we don't check {0} games")]
    UnsupportedVariant(String),
    #[error(transparent)]
    Move(#[from] IllegalMove),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of checking one game against the book. Checking stops at the
/// first ply that is not simply correct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Every ply of the committed color matched the book.
    Clean,
    /// The book has no answer for this position. The caller may supply
    /// one with [`OpeningBook::upsert`] and check again.
    NotFound { ply: usize, board: Board },
    /// The played move differs from the book line. `correct` is the
    /// book's answer in the same orientation as play.
    Deviation {
        ply: usize,
        board: Board,
        played: Board,
        correct: Board,
    },
    /// The opponent passed unexpectedly; plies beyond it are not checked.
    OpponentPass { ply: usize },
}

#[derive(Clone, Debug, Default)]
pub struct OpeningBook {
    data: BookData,
}

impl OpeningBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: BookData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &BookData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.openings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.openings.is_empty()
    }

    /// Read the book from a store.
    pub fn load_from(store: &impl BookStore) -> Result<Self, BookError> {
        Ok(Self {
            data: store.load()?,
        })
    }

    /// Validate and then write the book to a store. An inconsistent book
    /// is never persisted.
    pub fn save_to(&self, store: &mut impl BookStore) -> Result<(), BookError> {
        self.validate().map_err(BookError::Invalid)?;
        store.save(&self.data)?;
        Ok(())
    }

    /// The book's answer for a position, in canonical form, if any.
    ///
    /// A stored ID that no longer decodes is treated as a miss here;
    /// [`OpeningBook::validate`] reports it.
    pub fn lookup(&self, board: &Board) -> Option<Board> {
        let board_id = board.normalized_id();
        let opening = self.data.openings.get(&board_id)?;
        Board::from_id(&opening.best_child).ok()
    }

    /// Record `best_child` as the answer for `board`. Both are
    /// normalized before storage; a child with no replies for its own
    /// side is recorded after its forced pass. Re-recording the same
    /// answer is a no-op; recording a different one is an error.
    pub fn upsert(&mut self, board: &Board, best_child: &Board) -> Result<(), BookError> {
        let board_id = board.normalized_id();
        let child_id = if best_child.has_moves() {
            best_child.normalized_id()
        } else {
            best_child.pass().normalized_id()
        };

        if let Some(existing) = self.data.openings.get(&board_id) {
            if existing.best_child != child_id {
                return Err(BookError::Conflict {
                    board_id,
                    existing: existing.best_child.clone(),
                    new: child_id,
                });
            }
            return Ok(());
        }

        debug!("book: {} -> {}", board_id, child_id);
        self.data.openings.insert(
            board_id,
            Opening {
                best_child: child_id,
            },
        );
        Ok(())
    }

    /// Record every move `color` makes along a line played out from the
    /// starting position.
    pub fn insert_line(&mut self, moves: &[Field], color: Player) -> Result<(), BookError> {
        let mut board = Board::new();

        for &mv in moves {
            let child = board.do_move(mv)?;
            if board.turn == color && !mv.is_pass() {
                self.upsert(&board, &child)?;
            }
            board = child;
        }

        Ok(())
    }

    /// Check every entry: both IDs must decode to positions already in
    /// canonical form, the stored child must be reachable from the key
    /// by one legal move (with an implied pass when the reply side has
    /// none), and the replies to every stored answer must be covered
    /// all-or-nothing by further keys.
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        for (board_id, opening) in &self.data.openings {
            let board = match Board::from_id(board_id) {
                Ok(board) => board,
                Err(_) => {
                    violations.push(Violation::MalformedKey {
                        board_id: board_id.clone(),
                    });
                    continue;
                }
            };
            if !board.is_normalized() {
                violations.push(Violation::KeyNotNormalized {
                    board_id: board_id.clone(),
                });
            }

            let child = match Board::from_id(&opening.best_child) {
                Ok(child) => child,
                Err(_) => {
                    violations.push(Violation::MalformedChild {
                        board_id: board_id.clone(),
                    });
                    continue;
                }
            };
            if !child.is_normalized() {
                violations.push(Violation::ChildNotNormalized {
                    board_id: board_id.clone(),
                });
            }

            if !board.normalized_children_ids().contains(&opening.best_child) {
                violations.push(Violation::ChildNotReachable {
                    board_id: board_id.clone(),
                });
            }
        }

        // All-or-nothing coverage: either every reply to a stored answer
        // has an entry, or none do.
        for (board_id, opening) in &self.data.openings {
            let child = match Board::from_id(&opening.best_child) {
                Ok(child) => child,
                Err(_) => continue,
            };

            let reply_ids = child.normalized_children_ids();
            let present = reply_ids
                .iter()
                .filter(|id| self.data.openings.contains_key(*id))
                .count();
            if present != 0 && present != reply_ids.len() {
                violations.push(Violation::PartialCoverage {
                    board_id: board_id.clone(),
                    child_id: opening.best_child.clone(),
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Walk a game ply by ply and compare every move of `color` against
    /// the book, stopping at the first ply that is not simply correct.
    pub fn check_game(&self, game: &Game, color: Player) -> Result<CheckOutcome, BookError> {
        if game.is_xot() {
            return Err(BookError::UnsupportedVariant("xot".to_owned()));
        }

        for (offset, pair) in game.boards.windows(2).enumerate() {
            let (board, played) = (pair[0], pair[1]);
            let ply = offset + 1;

            if board.turn != color {
                continue;
            }

            if played.turn != !color {
                debug!("move {}: not checking beyond a passed turn", ply);
                return Ok(CheckOutcome::OpponentPass { ply });
            }

            let best_child = match self.lookup(&board) {
                Some(best_child) => best_child,
                None => {
                    debug!("move {}: not found", ply);
                    return Ok(CheckOutcome::NotFound { ply, board });
                }
            };

            // Compare in the same effective form the book stores: a
            // successor with no replies is represented after its
            // forced pass.
            let effective = if played.has_moves() {
                played
            } else {
                played.pass()
            };
            if effective.normalized().0 != best_child {
                debug!("move {}: wrong", ply);
                let correct = board.denormalize_child(&best_child).ok_or_else(|| {
                    BookError::Invalid(vec![Violation::ChildNotReachable {
                        board_id: board.normalized_id(),
                    }])
                })?;
                return Ok(CheckOutcome::Deviation {
                    ply,
                    board,
                    played,
                    correct,
                });
            }

            debug!("move {}: correct", ply);
        }

        Ok(CheckOutcome::Clean)
    }
}
