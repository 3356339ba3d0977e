//! Xiangqi move representation, bit-packed into a u16.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::square::Square;

const ORIGIN_MASK: u16 = 0x007F;
const DEST_SHIFT: u32 = 7;

/// A move encoded in 16 bits.
///
/// ```text
/// bits  0-6:  origin square      (0-89)
/// bits  7-13: destination square (0-89)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Null move sentinel (a0 to a0). Never a legal move.
    pub const NULL: Move = Move(0);

    /// Create a move from origin to destination.
    pub const fn new(origin: Square, dest: Square) -> Move {
        Move((origin.index() as u16) | ((dest.index() as u16) << DEST_SHIFT))
    }

    /// Return the origin square.
    #[inline]
    pub const fn origin(self) -> Square {
        Square::from_index_unchecked((self.0 & ORIGIN_MASK) as u8)
    }

    /// Return the destination square.
    #[inline]
    pub const fn dest(self) -> Square {
        Square::from_index_unchecked(((self.0 >> DEST_SHIFT) & ORIGIN_MASK) as u8)
    }

    /// Return the raw u16 encoding.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Whether this is the null sentinel.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidMove {
            found: s.to_string(),
        };
        if s.len() != 4 || !s.is_ascii() {
            return Err(invalid());
        }
        let origin = Square::from_algebraic(&s[..2]).ok_or_else(invalid)?;
        let dest = Square::from_algebraic(&s[2..]).ok_or_else(invalid)?;
        Ok(Move::new(origin, dest))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin(), self.dest())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Move(null)")
        } else {
            write!(f, "Move({self})")
        }
    }
}

/// Move buffer filled by rule collaborators.
pub type MoveList = Vec<Move>;
