//! Implements the Othello board: move generation and application,
//! symmetry normalization, and the textual position ID.
//!
//! A [`Board`] is a value type: applying a move yields a new board and
//! never mutates the receiver. Discs are stored relative to the side to
//! move (`me` / `opp`), with [`Board::black`] and [`Board::white`]
//! translating back to absolute colors.

use crate::bitboard::{Bitboard, INVERSE_ROTATION};
use crate::field::Field;
use crate::utils;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// One of the two players in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Player {
    #[default]
    Black,
    White,
}

impl std::ops::Not for Player {
    type Output = Self;

    /// Gets the other player.
    fn not(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

/// What one square holds, as consumed by renderers: a disc of either
/// color, a legal move for the side to move, or nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
    Playable,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("unexpected id length")]
    Length,
    #[error("unexpected turn value")]
    Turn,
    #[error("unexpected base 16 char in discs")]
    Discs,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("move index out of bounds: {0}")]
    OutOfBounds(u8),
    #[error("invalid move: square {0} is occupied")]
    Occupied(Field),
    #[error("invalid move: {0} flips no discs")]
    NoCapture(Field),
}

/// The complete state of an Othello position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    /// Discs of the side to move.
    pub me: Bitboard,
    /// Discs of the other side.
    pub opp: Bitboard,
    /// Which color the side to move is.
    pub turn: Player,
}

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One axis of the bit-parallel move scan: smear the mover's discs over
/// `mask` in both shift directions, then step once more to land on the
/// candidate squares.
fn axis_moves(me: u64, mask: u64, shift: u32) -> u64 {
    let mut flip_l = mask & (me << shift);
    flip_l |= mask & (flip_l << shift);
    let mask_l = mask & (mask << shift);
    flip_l |= mask_l & (flip_l << (2 * shift));
    flip_l |= mask_l & (flip_l << (2 * shift));

    let mut flip_r = mask & (me >> shift);
    flip_r |= mask & (flip_r >> shift);
    let mask_r = mask & (mask >> shift);
    flip_r |= mask_r & (flip_r >> (2 * shift));
    flip_r |= mask_r & (flip_r >> (2 * shift));

    (flip_l << shift) | (flip_r >> shift)
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The starting position: four center discs, black to move.
    pub fn new() -> Self {
        Self {
            me: Bitboard::from(1u64 << 28 | 1 << 35),
            opp: Bitboard::from(1u64 << 27 | 1 << 36),
            turn: Player::Black,
        }
    }

    /// Build a board directly from mover/opponent masks and the turn.
    pub fn from_discs(me: Bitboard, opp: Bitboard, turn: Player) -> Self {
        Self { me, opp, turn }
    }

    /// The black player's discs.
    pub fn black(&self) -> Bitboard {
        match self.turn {
            Player::Black => self.me,
            Player::White => self.opp,
        }
    }

    /// The white player's discs.
    pub fn white(&self) -> Bitboard {
        match self.turn {
            Player::Black => self.opp,
            Player::White => self.me,
        }
    }

    /// Count the discs of one color.
    pub fn count(&self, color: Player) -> u8 {
        match color {
            Player::Black => self.black().count_occupied(),
            Player::White => self.white().count_occupied(),
        }
    }

    /// Disc difference from the mover's perspective.
    pub fn exact_score(&self) -> i32 {
        i32::from(self.me.count_occupied()) - i32::from(self.opp.count_occupied())
    }

    /// The textual position ID: a turn tag (`B`/`W`) followed by the
    /// black and white masks as 16 hex digits each.
    pub fn to_id(&self) -> String {
        let tag = match self.turn {
            Player::Black => 'B',
            Player::White => 'W',
        };
        format!(
            "{}{:016x}{:016x}",
            tag,
            u64::from(self.black()),
            u64::from(self.white())
        )
    }

    /// Decode a textual position ID.
    pub fn from_id(id: &str) -> Result<Self, IdError> {
        if id.len() != 33 {
            return Err(IdError::Length);
        }

        let turn = match id.as_bytes()[0] {
            b'B' => Player::Black,
            b'W' => Player::White,
            _ => return Err(IdError::Turn),
        };

        let parse_mask = |range| -> Result<u64, IdError> {
            let digits: &str = id.get(range).ok_or(IdError::Discs)?;
            // from_str_radix tolerates a leading sign; only hex digits
            // are valid here.
            if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(IdError::Discs);
            }
            u64::from_str_radix(digits, 16).map_err(|_| IdError::Discs)
        };
        let black = Bitboard::from(parse_mask(1..17)?);
        let white = Bitboard::from(parse_mask(17..33)?);

        let (me, opp) = match turn {
            Player::Black => (black, white),
            Player::White => (white, black),
        };
        Ok(Self { me, opp, turn })
    }

    /// Get a mask of the legal moves for the side to move.
    ///
    /// Each of the four axes is scanned with doubling shifts, so a run of
    /// up to six opponent discs is covered in O(log) bit operations. The
    /// horizontal and diagonal axes mask off the edge columns to prevent
    /// wraparound.
    pub fn moves(&self) -> Bitboard {
        const EDGE_MASK: u64 = 0x7E7E7E7E7E7E7E7E;

        let me: u64 = self.me.into();
        let opp: u64 = self.opp.into();
        let edge = opp & EDGE_MASK;

        let mut moves = axis_moves(me, edge, 1);
        moves |= axis_moves(me, edge, 7);
        moves |= axis_moves(me, edge, 9);
        moves |= axis_moves(me, opp, 8);

        Bitboard::from(moves & !(me | opp))
    }

    /// Whether the side to move has at least one legal move.
    pub fn has_moves(&self) -> bool {
        !self.moves().is_empty()
    }

    /// Pass the turn: discs stay, sides swap.
    pub fn pass(&self) -> Self {
        Self {
            me: self.opp,
            opp: self.me,
            turn: !self.turn,
        }
    }

    /// The discs flipped by placing on `index`, or an empty mask if the
    /// placement captures nothing.
    fn flipped_discs(&self, index: u8) -> u64 {
        let me: u64 = self.me.into();
        let opp: u64 = self.opp.into();
        let col = i32::from(index % 8);
        let row = i32::from(index / 8);

        let mut flipped = 0u64;
        for (dx, dy) in DIRECTIONS {
            let mut steps = 1;
            loop {
                let cur_col = col + dx * steps;
                let cur_row = row + dy * steps;
                if !(0..8).contains(&cur_col) || !(0..8).contains(&cur_row) {
                    break;
                }

                let cur = 8 * cur_row + cur_col;
                if opp & (1 << cur) != 0 {
                    steps += 1;
                    continue;
                }

                if me & (1 << cur) != 0 && steps >= 2 {
                    for step in 1..steps {
                        let flip = i32::from(index) + step * (8 * dy + dx);
                        flipped |= 1 << flip;
                    }
                }
                break;
            }
        }
        flipped
    }

    /// Build the successor after placing on `index` and flipping `flipped`.
    fn place(&self, index: u8, flipped: u64) -> Self {
        let new_opp = u64::from(self.me) | flipped | (1 << index);
        let new_me = u64::from(self.opp) & !new_opp;
        Self {
            me: Bitboard::from(new_me),
            opp: Bitboard::from(new_opp),
            turn: !self.turn,
        }
    }

    /// Apply a move for the side to move, yielding the successor position.
    ///
    /// A pass is always accepted; it is the caller's responsibility to
    /// only pass when no moves exist. A placement fails if the square is
    /// out of bounds or occupied, or if it flips no discs.
    pub fn do_move(&self, mv: Field) -> Result<Self, IllegalMove> {
        let index = match mv {
            Field::Pass => return Ok(self.pass()),
            Field::Square(index) => index,
        };

        if index >= 64 {
            return Err(IllegalMove::OutOfBounds(index));
        }
        if (self.me | self.opp).get(index) {
            return Err(IllegalMove::Occupied(mv));
        }

        let flipped = self.flipped_discs(index);
        if flipped == 0 {
            return Err(IllegalMove::NoCapture(mv));
        }
        Ok(self.place(index, flipped))
    }

    /// All successor positions, in ascending order of move square index.
    /// The order is part of the contract: search and book checking rely
    /// on it for reproducible results.
    pub fn children(&self) -> Vec<Self> {
        self.moves()
            .squares()
            .map(|index| self.place(index, self.flipped_discs(index)))
            .collect()
    }

    /// Reduce to canonical form: the lexicographically smallest image of
    /// this position under the 8 board symmetries, comparing the mover
    /// mask first and then the opponent mask. Returns the canonical board
    /// and the rotation that produced it; the identity rotation wins ties.
    pub fn normalized(&self) -> (Self, u8) {
        let mut best = *self;
        let mut best_rotation = 0;

        for rotation in 1..8 {
            let me = self.me.rotate(rotation);
            let opp = self.opp.rotate(rotation);
            if (me, opp) < (best.me, best.opp) {
                best = Self {
                    me,
                    opp,
                    turn: self.turn,
                };
                best_rotation = rotation;
            }
        }
        (best, best_rotation)
    }

    /// Undo the rotation recorded by [`Board::normalized`].
    pub fn denormalized(&self, rotation: u8) -> Self {
        assert!(rotation < 8);
        let inverse = INVERSE_ROTATION[rotation as usize];
        Self {
            me: self.me.rotate(inverse),
            opp: self.opp.rotate(inverse),
            turn: self.turn,
        }
    }

    /// Whether this board already is its own canonical form.
    pub fn is_normalized(&self) -> bool {
        self.normalized().0 == *self
    }

    /// The canonical ID of this position.
    pub fn normalized_id(&self) -> String {
        self.normalized().0.to_id()
    }

    /// The canonical IDs of all positions reachable by one legal move.
    /// A child with no replies for its own side is recorded after its
    /// forced pass, so book entries always answer the position that is
    /// actually faced next.
    pub fn normalized_children_ids(&self) -> BTreeSet<String> {
        self.children()
            .iter()
            .map(|child| {
                if child.has_moves() {
                    child.normalized_id()
                } else {
                    child.pass().normalized_id()
                }
            })
            .collect()
    }

    /// Find the child of this board, in play orientation, whose canonical
    /// form matches `canonical_child`. Returns `None` if no move leads
    /// there.
    pub fn denormalize_child(&self, canonical_child: &Self) -> Option<Self> {
        self.children().into_iter().find(|child| {
            let effective = if child.has_moves() {
                *child
            } else {
                child.pass()
            };
            effective.normalized().0 == *canonical_child
        })
    }

    /// Classify every square for rendering: disc color, legal move for
    /// the side to move, or empty.
    pub fn cells(&self) -> [Cell; 64] {
        let black = self.black();
        let white = self.white();
        let moves = self.moves();

        let mut cells = [Cell::Empty; 64];
        for (index, cell) in cells.iter_mut().enumerate() {
            let index = index as u8;
            *cell = if black.get(index) {
                Cell::Black
            } else if white.get(index) {
                Cell::White
            } else if moves.get(index) {
                Cell::Playable
            } else {
                Cell::Empty
            };
        }
        cells
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::format_grid(
            self.cells().iter().map(|cell| match cell {
                Cell::Black => '#',
                Cell::White => 'O',
                Cell::Playable => '*',
                Cell::Empty => '.',
            }),
            f,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn board(me: u64, opp: u64, turn: Player) -> Board {
        Board::from_discs(Bitboard::from(me), Bitboard::from(opp), turn)
    }

    /// Per-square, per-direction move scan to check the bit-parallel one.
    fn brute_force_moves(b: &Board) -> u64 {
        let me: u64 = b.me.into();
        let opp: u64 = b.opp.into();
        let mut moves = 0u64;

        for index in 0..64u8 {
            if (me | opp) & (1 << index) != 0 {
                continue;
            }
            for (dx, dy) in DIRECTIONS {
                let mut col = i32::from(index % 8) + dx;
                let mut row = i32::from(index / 8) + dy;
                let mut seen_opp = false;
                while (0..8).contains(&col) && (0..8).contains(&row) {
                    let cur = 8 * row + col;
                    if opp & (1 << cur) != 0 {
                        seen_opp = true;
                    } else {
                        if me & (1 << cur) != 0 && seen_opp {
                            moves |= 1 << index;
                        }
                        break;
                    }
                    col += dx;
                    row += dy;
                }
            }
        }
        moves
    }

    #[test]
    fn board_init() {
        let b = Board::new();
        assert_eq!(b.turn, Player::Black);
        assert_eq!(b.me, Bitboard::from(1u64 << 28 | 1 << 35));
        assert_eq!(b.opp, Bitboard::from(1u64 << 27 | 1 << 36));
    }

    #[test]
    fn board_black_white() {
        let b = board(1, 2, Player::Black);
        assert_eq!(u64::from(b.black()), 1);
        assert_eq!(u64::from(b.white()), 2);

        let w = board(1, 2, Player::White);
        assert_eq!(u64::from(w.black()), 2);
        assert_eq!(u64::from(w.white()), 1);
    }

    #[test]
    fn board_to_id() {
        assert_eq!(Board::new().to_id(), "B00000008100000000000001008000000");
    }

    #[test]
    fn board_from_id_ok() {
        assert_eq!(
            Board::from_id("B00000000000000010000000000000002"),
            Ok(board(1, 2, Player::Black)),
        );
        assert_eq!(
            Board::from_id("W00000000000000010000000000000002"),
            Ok(board(2, 1, Player::White)),
        );
        let full = Board::from_id("Bffffffffffffffffffffffffffffffff").unwrap();
        assert_eq!(u64::from(full.me), u64::MAX);
        assert_eq!(u64::from(full.opp), u64::MAX);
    }

    #[test]
    fn board_from_id_fail() {
        assert_eq!(Board::from_id("foo"), Err(IdError::Length));
        assert_eq!(
            Board::from_id("123456789012345678901234567890123"),
            Err(IdError::Turn),
        );
        assert_eq!(
            Board::from_id("B0000000X000000000000000000000000"),
            Err(IdError::Discs),
        );
        assert_eq!(
            Board::from_id("B00000000000000000000000000X00000"),
            Err(IdError::Discs),
        );
        // A sign prefix is not a hex digit, even though integer parsing
        // would swallow it.
        assert_eq!(
            Board::from_id("B+fffffffffffffff0000000000000000"),
            Err(IdError::Discs),
        );
        assert_eq!(
            Board::from_id("B0000000000000000-000000000000001"),
            Err(IdError::Discs),
        );
        assert_eq!(IdError::Length.to_string(), "unexpected id length");
        assert_eq!(IdError::Turn.to_string(), "unexpected turn value");
        assert_eq!(
            IdError::Discs.to_string(),
            "unexpected base 16 char in discs"
        );
    }

    #[test]
    fn id_round_trip() {
        for b in [Board::new(), Board::new().pass(), board(0x1234, 0x8000, Player::White)] {
            assert_eq!(Board::from_id(&b.to_id()), Ok(b));
        }
    }

    #[test]
    fn initial_moves() {
        let moves: Vec<u8> = Board::new().moves().squares().collect();
        assert_eq!(moves, vec![19, 26, 37, 44]);
    }

    #[test]
    fn do_move_d3() {
        let child = Board::new().do_move(Field::from_str("d3").unwrap()).unwrap();
        assert_eq!(child.turn, Player::White);
        // Black gains d3 and the flipped d4.
        assert_eq!(
            child.black(),
            Bitboard::from(1u64 << 19 | 1 << 27 | 1 << 28 | 1 << 35),
        );
        assert_eq!(child.white(), Bitboard::from(1u64 << 36));
    }

    #[test]
    fn do_move_pass() {
        let b = Board::new();
        let passed = b.do_move(Field::Pass).unwrap();
        assert_eq!(passed.turn, Player::White);
        assert_eq!(passed.me, b.opp);
        assert_eq!(passed.opp, b.me);
        assert_eq!(passed, b.pass());
    }

    #[test]
    fn do_move_illegal() {
        let b = Board::new();
        assert_eq!(
            b.do_move(Field::Square(64)),
            Err(IllegalMove::OutOfBounds(64)),
        );
        assert_eq!(
            b.do_move(Field::Square(27)),
            Err(IllegalMove::Occupied(Field::Square(27))),
        );
        // a1 is empty but captures nothing.
        assert_eq!(
            b.do_move(Field::Square(0)),
            Err(IllegalMove::NoCapture(Field::Square(0))),
        );
    }

    #[test]
    fn children_ascending() {
        let b = Board::new();
        let children = b.children();
        let expected: Vec<Board> = [19u8, 26, 37, 44]
            .iter()
            .map(|&i| b.do_move(Field::Square(i)).unwrap())
            .collect();
        assert_eq!(children, expected);
    }

    /// Play a full game with a first-legal-move policy, checking the
    /// move generator against the brute-force scan and the disc-count
    /// invariant at every ply.
    #[test]
    fn playout_invariants() {
        let mut b = Board::new();
        let mut passed = false;

        loop {
            assert_eq!(u64::from(b.moves()), brute_force_moves(&b));
            assert_eq!(b.me & b.opp, Bitboard::default());

            let moves = b.moves();
            if moves.is_empty() {
                if passed {
                    break;
                }
                let after = b.pass();
                assert_eq!(after.count(Player::Black), b.count(Player::Black));
                assert_eq!(after.count(Player::White), b.count(Player::White));
                b = after;
                passed = true;
                continue;
            }

            let total = b.count(Player::Black) + b.count(Player::White);
            let index = moves.squares().next().unwrap();
            b = b.do_move(Field::Square(index)).unwrap();
            assert_eq!(b.count(Player::Black) + b.count(Player::White), total + 1);
            passed = false;
        }
    }

    const PATTERN_CANONICAL: u64 = 0x000061928C88FF00;
    const PATTERN_ROTATIONS: [(u64, u8); 8] = [
        (0x22120A0E1222221E, 6),
        (0x4448507048444478, 7),
        (0x1E2222120E0A1222, 4),
        (0x7844444870504844, 5),
        (0x000086493111FF00, 1),
        (0x00FF113149860000, 3),
        (0x000061928C88FF00, 0),
        (0x00FF888C92610000, 2),
    ];

    #[test]
    fn board_normalized() {
        for turn in [Player::Black, Player::White] {
            for (bits, rotation) in PATTERN_ROTATIONS {
                assert_eq!(
                    board(bits, 0, turn).normalized(),
                    (board(PATTERN_CANONICAL, 0, turn), rotation),
                );
                assert_eq!(
                    board(0, bits, turn).normalized(),
                    (board(0, PATTERN_CANONICAL, turn), rotation),
                );
            }
        }
    }

    #[test]
    fn board_denormalized_round_trip() {
        for turn in [Player::Black, Player::White] {
            for (bits, _) in PATTERN_ROTATIONS {
                for b in [board(bits, 0, turn), board(0, bits, turn)] {
                    let (normalized, rotation) = b.normalized();
                    assert_eq!(normalized.denormalized(rotation), b);
                }
            }
        }
    }

    #[test]
    fn initial_normalizes_to_identity() {
        let (normalized, rotation) = Board::new().normalized();
        assert_eq!(rotation, 0);
        assert_eq!(normalized, Board::new());
        assert!(Board::new().is_normalized());
    }

    #[test]
    fn denormalize_child_finds_played_move() {
        let b = Board::new();
        // All four opening moves share one canonical form, so the earliest
        // child is the answer for every one of them.
        let first = b.children()[0];
        for child in b.children() {
            let canonical = child.normalized().0;
            assert_eq!(b.denormalize_child(&canonical), Some(first));
        }
        assert_eq!(b.denormalize_child(&Board::new()), None);
    }

    #[test]
    fn cells_classification() {
        let cells = Board::new().cells();
        let mut expected = [Cell::Empty; 64];
        expected[28] = Cell::Black;
        expected[35] = Cell::Black;
        expected[27] = Cell::White;
        expected[36] = Cell::White;
        for i in [19, 26, 37, 44] {
            expected[i] = Cell::Playable;
        }
        assert_eq!(cells, expected);
    }

    #[test]
    fn exact_score_and_count() {
        let b = board(0b111, 0b1000, Player::Black);
        assert_eq!(b.count(Player::Black), 3);
        assert_eq!(b.count(Player::White), 1);
        assert_eq!(b.exact_score(), 2);
        assert_eq!(b.pass().exact_score(), -2);
    }
}
