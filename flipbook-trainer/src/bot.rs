//! Depth-bounded alpha-beta engine used to pick or validate moves.

use flipbook_othello::Board;
use thiserror::Error;

/// Scale applied to exact end-of-game scores so they dominate any
/// heuristic value and are never pruned as merely "good".
pub const EXACT_SCORE_FACTOR: i32 = 1000;

/// The widest possible search window.
pub const MIN_HEURISTIC: i32 = -64 * EXACT_SCORE_FACTOR;
pub const MAX_HEURISTIC: i32 = 64 * EXACT_SCORE_FACTOR;

/// The four corner squares.
const CORNER_MASK: u64 = 0x8100000000000081;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("board has no children")]
pub struct NoMovesError;

/// A fixed-depth negamax searcher. Stateless apart from its depth.
#[derive(Clone, Copy, Debug)]
pub struct Bot {
    depth: u32,
}

impl Bot {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }

    /// Static evaluation from the mover's perspective: mobility
    /// difference plus three times the corner-disc difference.
    pub fn heuristic(board: &Board) -> i32 {
        let me_corners = (u64::from(board.me) & CORNER_MASK).count_ones() as i32;
        let opp_corners = (u64::from(board.opp) & CORNER_MASK).count_ones() as i32;

        let me_moves = i32::from(board.moves().count_occupied());
        let opp_moves = i32::from(board.pass().moves().count_occupied());

        me_moves - opp_moves + 3 * (me_corners - opp_corners)
    }

    /// Score a position from the mover's perspective with a full window.
    pub fn search(&self, board: &Board) -> i32 {
        self.alpha_beta(board, MIN_HEURISTIC, MAX_HEURISTIC, self.depth)
    }

    fn alpha_beta(&self, board: &Board, mut alpha: i32, beta: i32, depth: u32) -> i32 {
        if depth == 0 {
            return Self::heuristic(board);
        }

        let children = board.children();

        if children.is_empty() {
            let passed = board.pass();
            if !passed.has_moves() {
                // Game over: the score is exact.
                return EXACT_SCORE_FACTOR * board.exact_score();
            }
            // A forced pass does not consume a depth unit.
            return -self.alpha_beta(&passed, -beta, -alpha, depth);
        }

        for child in &children {
            let score = -self.alpha_beta(child, -beta, -alpha, depth - 1);

            // Fail high: the opponent will not allow this line.
            if score >= beta {
                return beta;
            }

            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    /// The child the engine prefers, searching each child in generation
    /// order with the best score so far as the lower bound. Ties keep
    /// the earliest-generated child.
    pub fn best_child(&self, board: &Board) -> Result<Board, NoMovesError> {
        let children = board.children();
        let mut best = *children.first().ok_or(NoMovesError)?;
        let mut best_score = MIN_HEURISTIC;

        for child in &children {
            let score = -self.alpha_beta(child, -MAX_HEURISTIC, -best_score, self.depth);

            if score > best_score {
                best_score = score;
                best = *child;
            }
        }

        Ok(best)
    }
}
