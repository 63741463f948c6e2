//! Low-level bitboard operations.
//!
//! Under the hood, all these operations work on u64 masks. By convention,
//! bit 0 is square a1 in the upper-left of the board, and the mapping is
//! row-major: `bit = row * 8 + col`.

use crate::utils;
use derive_more::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, From, Into, Not,
};
use std::fmt::{self, Display, Formatter};

/// Holds a single bit per location on an Othello board.
/// Wraps [`u64`] for efficient bit-twiddling, but avoids mixing with numerics.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    PartialOrd,
    Ord,
    Default,
    From,
    Into,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
pub struct Bitboard(u64);

/// For each board symmetry, the symmetry that undoes it.
///
/// Symmetries compose as horizontal mirror, then vertical mirror, then
/// transpose, selected by the low three bits of the index. All of them are
/// their own inverse except 5 and 6, which invert onto each other.
pub const INVERSE_ROTATION: [u8; 8] = [0, 1, 2, 3, 4, 6, 5, 7];

impl Bitboard {
    /// Count the number of occupied spaces in the bitboard.
    #[inline]
    pub fn count_occupied(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Return true if this bitboard is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Return true if the square at `index` is set.
    #[inline]
    pub fn get(self, index: u8) -> bool {
        self.0 & (1 << index) != 0
    }

    /// Iterate over the set square indexes in ascending order.
    #[inline]
    pub fn squares(self) -> Squares {
        Squares(self.0)
    }

    /// Mirror the board left-to-right: reverse the bits within each row.
    #[inline]
    pub fn mirror_horizontal(self) -> Self {
        const K1: u64 = 0x5555555555555555;
        const K2: u64 = 0x3333333333333333;
        const K4: u64 = 0x0F0F0F0F0F0F0F0F;

        let mut x = self.0;
        x = ((x >> 1) & K1) | ((x & K1) << 1);
        x = ((x >> 2) & K2) | ((x & K2) << 2);
        x = ((x >> 4) & K4) | ((x & K4) << 4);
        Self(x)
    }

    /// Mirror the board top-to-bottom: reverse the order of the rows.
    #[inline]
    pub fn mirror_vertical(self) -> Self {
        Self(self.0.swap_bytes())
    }

    /// Mirror the board across the main diagonal (a1-h8).
    #[inline]
    pub fn transpose(self) -> Self {
        const K1: u64 = 0x5500550055005500;
        const K2: u64 = 0x3333000033330000;
        const K4: u64 = 0x0F0F0F0F00000000;

        let mut x = self.0;
        let mut t = K4 & (x ^ (x << 28));
        x ^= t ^ (t >> 28);
        t = K2 & (x ^ (x << 14));
        x ^= t ^ (t >> 14);
        t = K1 & (x ^ (x << 7));
        x ^= t ^ (t >> 7);
        Self(x)
    }

    /// Apply one of the 8 symmetries of the board, selected by the low three
    /// bits of `rotation`: 1 = horizontal mirror, 2 = vertical mirror,
    /// 4 = transpose, applied in that order.
    pub fn rotate(self, rotation: u8) -> Self {
        let mut x = self;
        if rotation & 1 != 0 {
            x = x.mirror_horizontal();
        }
        if rotation & 2 != 0 {
            x = x.mirror_vertical();
        }
        if rotation & 4 != 0 {
            x = x.transpose();
        }
        x
    }
}

impl Display for Bitboard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        utils::format_grid(
            (0..64).map(|index| match self.get(index) {
                false => '.',
                true => '#',
            }),
            f,
        )
    }
}

/// Iterator over the set square indexes in a [`Bitboard`], in ascending order.
#[derive(Clone, Copy, Debug)]
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }

        let index = self.0.trailing_zeros() as u8;
        self.0 ^= 1 << index;
        Some(index)
    }
}

impl ExactSizeIterator for Squares {
    fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}
