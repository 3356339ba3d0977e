//! Move ordering: priority moves, general-last, MVV-LVA.

use cchess_core::{Board, Evaluator, Move, PieceKind};

/// Most priority moves a node seeds: the hash move and two killers.
const PRIORITY_SLOTS: usize = 3;

/// Per-node ordering context.
///
/// Holds the node's priority list (hash move first, then killers) and ranks
/// a generated move list by the key
/// `(priority rank, general moves last, quiet after captures, -victim, attacker)`.
/// The sort is stable, so moves that tie keep generation order and the
/// ordering is a strict total order.
#[derive(Debug, Default)]
pub struct MoveOrderer {
    priority: Vec<Move>,
}

impl MoveOrderer {
    /// Create an ordering context with an empty priority list.
    pub fn new() -> Self {
        Self {
            priority: Vec::with_capacity(PRIORITY_SLOTS),
        }
    }

    /// Append `mv` to the priority list unless it is null or already present.
    pub fn prioritize(&mut self, mv: Move) {
        if !mv.is_null() && !self.priority.contains(&mv) {
            self.priority.push(mv);
        }
    }

    /// Position of `mv` in the priority list, or the list length if absent.
    fn rank(&self, mv: Move) -> usize {
        self.priority
            .iter()
            .position(|&p| p == mv)
            .unwrap_or(self.priority.len())
    }

    /// Sort `moves` best-first for the position on `board`.
    pub fn sort<B, E>(&self, moves: &mut [Move], board: &B, evaluator: &E)
    where
        B: Board,
        E: Evaluator<B> + ?Sized,
    {
        moves.sort_by_cached_key(|&mv| {
            let mover = board.piece_at(mv.origin());
            let victim = board.piece_at(mv.dest());
            let general = mover.is_some_and(|p| p.kind == PieceKind::General);
            let (victim_value, attacker_value) = match victim {
                Some(v) => (
                    evaluator.piece_value(v.kind),
                    mover.map_or(0, |p| evaluator.piece_value(p.kind)),
                ),
                None => (0, 0),
            };
            (
                self.rank(mv),
                general,
                victim.is_none(),
                -victim_value,
                attacker_value,
            )
        });
    }
}

/// Whether `mv` lands on an occupied square.
pub fn is_capture<B: Board + ?Sized>(board: &B, mv: Move) -> bool {
    board.piece_at(mv.dest()).is_some()
}
