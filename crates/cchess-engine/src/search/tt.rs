//! Always-replace transposition table.
//!
//! One slot per index, no buckets and no aging: a store simply overwrites
//! whatever occupied the slot. The full 64-bit key is kept so index
//! collisions are rejected on probe.

use cchess_core::Move;

use crate::search::negamax::MATE_THRESHOLD;

/// Default table size in megabytes.
pub const DEFAULT_HASH_MB: usize = 16;

/// How a stored score relates to the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The stored score is exact.
    Exact,
    /// The stored score is a lower bound (failed high).
    Lower,
    /// The stored score is an upper bound (failed low).
    Upper,
}

impl Bound {
    /// Classify a fail-soft score against the window it was searched with.
    pub fn classify(score: i32, alpha: i32, beta: i32) -> Bound {
        if score <= alpha {
            Bound::Upper
        } else if score < beta {
            Bound::Exact
        } else {
            Bound::Lower
        }
    }

    /// Whether a score with this bound decides the window `(alpha, beta)`.
    pub fn proves(self, score: i32, alpha: i32, beta: i32) -> bool {
        match self {
            Bound::Exact => true,
            Bound::Lower => score >= beta,
            Bound::Upper => score <= alpha,
        }
    }
}

/// Result of a successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    /// Best move found when the entry was stored.
    pub best_move: Move,
    /// Score, already converted back to the probing node's ply.
    pub score: i32,
    /// Remaining depth (target depth minus ply) the entry was searched to.
    pub depth: i32,
    /// Bound kind of `score`.
    pub bound: Bound,
}

/// Convert a search score to TT-storable form.
///
/// Mate scores depend on the distance from the root; they are stored as
/// distance from the node instead so the entry is valid on any path.
pub fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply
    } else if score < -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// Reverse [`score_to_tt`] for a probe at `ply`.
pub fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply
    } else if score < -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

#[derive(Clone, Copy)]
struct Slot {
    key: u64,
    entry: Option<TtEntry>,
}

impl Slot {
    const EMPTY: Slot = Slot {
        key: 0,
        entry: None,
    };
}

/// Fixed-capacity position cache.
///
/// While a journal is open every store remembers the slot it replaced, so a
/// whole iteration's writes can be undone with [`rollback`](Self::rollback).
pub struct TranspositionTable {
    slots: Box<[Slot]>,
    mask: usize,
    journal: Option<Vec<(usize, Slot)>>,
}

impl TranspositionTable {
    /// Create a table using roughly `mb` megabytes (rounded down to a power
    /// of two slot count, at least one slot).
    pub fn new(mb: usize) -> Self {
        let bytes = mb.max(1) * 1024 * 1024;
        let wanted = (bytes / std::mem::size_of::<Slot>()).max(1);
        let count = if wanted.is_power_of_two() {
            wanted
        } else {
            wanted.next_power_of_two() >> 1
        };
        Self::with_slots(count)
    }

    /// Create a table with exactly `count` slots (rounded up to a power of two).
    pub fn with_slots(count: usize) -> Self {
        let count = count.max(1).next_power_of_two();
        Self {
            slots: vec![Slot::EMPTY; count].into_boxed_slice(),
            mask: count - 1,
            journal: None,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Invalidate every entry and drop any open journal.
    pub fn flush(&mut self) {
        self.slots.fill(Slot::EMPTY);
        self.journal = None;
    }

    /// Start recording stores so they can be undone.
    pub fn begin_journal(&mut self) {
        self.journal = Some(Vec::new());
    }

    /// Keep every store made since [`begin_journal`](Self::begin_journal).
    pub fn commit(&mut self) {
        self.journal = None;
    }

    /// Restore every slot written since [`begin_journal`](Self::begin_journal).
    /// Returns the number of stores undone.
    pub fn rollback(&mut self) -> usize {
        let Some(journal) = self.journal.take() else {
            return 0;
        };
        let undone = journal.len();
        for (index, previous) in journal.into_iter().rev() {
            self.slots[index] = previous;
        }
        undone
    }

    /// Number of live entries.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Look up `key`, converting mate scores to the probing `ply`.
    pub fn probe(&self, key: u64, ply: i32) -> Option<TtEntry> {
        let slot = &self.slots[self.index(key)];
        if slot.key != key {
            return None;
        }
        slot.entry.map(|e| TtEntry {
            score: score_from_tt(e.score, ply),
            ..e
        })
    }

    /// Store an entry, overwriting the slot unconditionally.
    pub fn store(&mut self, key: u64, ply: i32, entry: TtEntry) {
        let index = self.index(key);
        if let Some(journal) = &mut self.journal {
            journal.push((index, self.slots[index]));
        }
        self.slots[index] = Slot {
            key,
            entry: Some(TtEntry {
                score: score_to_tt(entry.score, ply),
                ..entry
            }),
        };
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("capacity", &self.capacity())
            .finish()
    }
}
