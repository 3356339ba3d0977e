//! Xiangqi piece kinds.

use std::fmt;

/// The kind of a Xiangqi piece, without color information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Soldier = 0,
    Advisor = 1,
    Elephant = 2,
    Horse = 3,
    Cannon = 4,
    Chariot = 5,
    General = 6,
}

impl PieceKind {
    /// Total number of piece kinds.
    pub const COUNT: usize = 7;

    /// All piece kinds in index order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Soldier,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Cannon,
        PieceKind::Chariot,
        PieceKind::General,
    ];

    /// Return the index (0..6).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Conventional material value in centipawn-like units.
    ///
    /// The general is priced far above everything else so that capturing
    /// it always orders first.
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Soldier => 100,
            PieceKind::Advisor => 200,
            PieceKind::Elephant => 200,
            PieceKind::Horse => 400,
            PieceKind::Cannon => 450,
            PieceKind::Chariot => 900,
            PieceKind::General => 6_000,
        }
    }

    /// Return the FEN character for this piece kind (lowercase).
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::Soldier => 'p',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Cannon => 'c',
            PieceKind::Chariot => 'r',
            PieceKind::General => 'k',
        }
    }

    /// Parse a FEN character (case-insensitive) into a piece kind.
    pub fn from_fen_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Soldier),
            'a' => Some(PieceKind::Advisor),
            'b' | 'e' => Some(PieceKind::Elephant),
            'n' | 'h' => Some(PieceKind::Horse),
            'c' => Some(PieceKind::Cannon),
            'r' => Some(PieceKind::Chariot),
            'k' => Some(PieceKind::General),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn general_outranks_every_other_kind() {
        for kind in &PieceKind::ALL[..PieceKind::COUNT - 1] {
            assert!(PieceKind::General.value() > kind.value());
        }
    }

    #[test]
    fn fen_char_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_fen_char(kind.fen_char()), Some(kind));
            assert_eq!(
                PieceKind::from_fen_char(kind.fen_char().to_ascii_uppercase()),
                Some(kind)
            );
        }
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }
}
