//! Killer move table for quiet move ordering.

use cchess_core::Move;

use crate::search::negamax::MAX_PLY;

/// Two killer moves per ply: quiet moves that recently caused beta cutoffs.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    /// Create an empty killer table.
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    /// Forget every killer.
    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }

    /// Store a killer move at the given ply.
    ///
    /// Shifts slot 0 to slot 1 if the new move differs from slot 0.
    pub fn store(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY || mv.is_null() {
            return;
        }
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }

    /// Killers at `ply`, newest first. Empty slots are skipped.
    pub fn at(&self, ply: usize) -> impl Iterator<Item = Move> + '_ {
        self.slots
            .get(ply)
            .into_iter()
            .flat_map(|pair| pair.iter().copied())
            .filter(|mv| !mv.is_null())
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}
