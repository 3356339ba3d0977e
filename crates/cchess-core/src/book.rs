//! Opening book collaborator and an in-memory implementation.

use std::collections::HashMap;

use crate::board::Board;
use crate::chess_move::Move;

/// Memorized opening theory.
pub trait OpeningBook<B: Board> {
    /// Book move for the current position, if any.
    fn probe(&self, board: &B) -> Option<Move>;

    /// Whether the book loaded successfully and may be consulted.
    fn is_valid(&self) -> bool {
        true
    }
}

/// Book keyed by [`Board::hash`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBook {
    entries: HashMap<u64, Move>,
}

impl MemoryBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `mv` as the book reply for positions hashing to `key`.
    pub fn insert(&mut self, key: u64, mv: Move) {
        self.entries.insert(key, mv);
    }

    /// Record `mv` as the book reply for the board's current position.
    pub fn insert_position<B: Board>(&mut self, board: &B, mv: Move) {
        self.insert(board.hash(), mv);
    }

    /// Number of positions in the book.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the book has no positions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<B: Board> OpeningBook<B> for MemoryBook {
    fn probe(&self, board: &B) -> Option<Move> {
        self.entries.get(&board.hash()).copied()
    }

    fn is_valid(&self) -> bool {
        !self.entries.is_empty()
    }
}
