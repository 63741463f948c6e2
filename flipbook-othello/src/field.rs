//! Field notation for moves: a column letter and a row digit ("d3"),
//! or the literal token `--` for a pass.

use crate::NUM_SPACES;
use std::fmt::{self, Display, Formatter, Write};
use thiserror::Error;

/// A move in an Othello game: pass, or place a disc on a square.
///
/// Square indexes are row-major: `index = row * 8 + col`, so "a1" is 0
/// and "h8" is 63.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Field {
    Pass,
    Square(u8),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid field: {0}")]
    Invalid(String),
    #[error("field index out of bounds: {0}")]
    IndexOutOfBounds(u8),
}

impl Field {
    /// Convert from a square index, rejecting indexes outside the board.
    pub fn from_index(index: u8) -> Result<Self, FieldError> {
        if index as usize >= NUM_SPACES {
            return Err(FieldError::IndexOutOfBounds(index));
        }
        Ok(Self::Square(index))
    }

    /// The square index of a placement move, or `None` for a pass.
    pub fn index(self) -> Option<u8> {
        match self {
            Self::Pass => None,
            Self::Square(index) => Some(index),
        }
    }

    #[inline]
    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }
}

/// Build a [`Field`] from two-character notation ("d3"; "--").
/// The column letter is case-insensitive.
impl std::str::FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "--" {
            return Ok(Self::Pass);
        }

        let invalid = || FieldError::Invalid(s.to_owned());

        let mut chars = s.chars();
        let col_char = chars.next().ok_or_else(invalid)?.to_ascii_lowercase();
        let col = "abcdefgh".find(col_char).ok_or_else(invalid)?;
        let row_char = chars.next().ok_or_else(invalid)?;
        let row = "12345678".find(row_char).ok_or_else(invalid)?;

        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::Square((row * 8 + col) as u8))
    }
}

/// Convert this [`Field`] into string notation ("d3" / "--").
impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("--"),
            Self::Square(index) => {
                let col = "abcdefgh"
                    .chars()
                    .nth((index % 8) as usize)
                    .ok_or(fmt::Error)?;
                let row = "12345678"
                    .chars()
                    .nth((index / 8) as usize)
                    .ok_or(fmt::Error)?;
                f.write_char(col)?;
                f.write_char(row)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn field_from_str_success() {
        assert_eq!(Field::from_str("--"), Ok(Field::Pass));
        assert_eq!(Field::from_str("a1"), Ok(Field::Square(0)));
        assert_eq!(Field::from_str("h8"), Ok(Field::Square(63)));
        assert_eq!(Field::from_str("d3"), Ok(Field::Square(19)));
        assert_eq!(Field::from_str("D3"), Ok(Field::Square(19)));
    }

    #[test]
    fn field_from_str_fail() {
        for bad in ["", "a", "a9", "i5", "5a", "a12", "aa", "++"] {
            assert_eq!(Field::from_str(bad), Err(FieldError::Invalid(bad.into())));
        }
    }

    #[test]
    fn field_from_index_bounds() {
        assert_eq!(Field::from_index(63), Ok(Field::Square(63)));
        assert_eq!(Field::from_index(64), Err(FieldError::IndexOutOfBounds(64)));
    }

    // Every one of the 65 tokens survives a round trip through parsing.
    #[test]
    fn field_round_trip() {
        let mut tokens = vec!["--".to_owned()];
        for row in "12345678".chars() {
            for col in "abcdefgh".chars() {
                tokens.push(format!("{}{}", col, row));
            }
        }

        for token in tokens {
            assert_eq!(Field::from_str(&token).unwrap().to_string(), token);
        }
    }
}
