//! Board intersections of the 9x10 Xiangqi grid.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// One of the 90 intersections, indexed `rank * 9 + file`.
///
/// Files run `a..=i` from Red's left, ranks `0..=9` from Red's back rank.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Number of files.
    pub const FILES: u8 = 9;
    /// Number of ranks.
    pub const RANKS: u8 = 10;
    /// Total number of squares.
    pub const COUNT: usize = 90;

    /// Create a square from a file (0..9) and rank (0..10).
    pub const fn new(file: u8, rank: u8) -> Option<Square> {
        if file < Self::FILES && rank < Self::RANKS {
            Some(Square(rank * Self::FILES + file))
        } else {
            None
        }
    }

    /// Create a square from a raw index (0..90).
    pub const fn from_index(index: u8) -> Option<Square> {
        if (index as usize) < Self::COUNT {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Create a square from an index already known to be in range.
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!((index as usize) < Self::COUNT);
        Square(index)
    }

    /// Parse coordinate notation like `e0`.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let (file_byte, rank_byte) = (bytes[0], bytes[1]);
        if !(b'a'..=b'i').contains(&file_byte) || !rank_byte.is_ascii_digit() {
            return None;
        }
        Square::new(file_byte - b'a', rank_byte - b'0')
    }

    /// Return the zero-based index (0..90).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Return the file (0..9).
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % Self::FILES
    }

    /// Return the rank (0..10).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / Self::FILES
    }
}

impl FromStr for Square {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| ParseError::InvalidSquare {
            found: s.to_string(),
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}
