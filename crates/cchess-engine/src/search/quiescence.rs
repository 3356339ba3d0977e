//! Quiescence search: resolve captures and check evasions past the horizon.

use cchess_core::{Board, Evaluator, Lawyer, MoveList};

use crate::search::negamax::{ABORTED, MATE_SCORE, MAX_PLY};
use crate::search::ordering::{MoveOrderer, is_capture};
use crate::search::pv::PrincipalVariation;
use crate::search::{NodeFlags, SearchContext};

impl<B, L, E> SearchContext<'_, B, L, E>
where
    B: Board,
    L: Lawyer<B>,
    E: Evaluator<B>,
{
    /// Horizon node. Entered only from [`search`](Self::search), which has
    /// already polled for aborts and rejected illegal positions.
    ///
    /// Quiescence lines are not spliced into the principal variation.
    pub(crate) fn quiescence(&mut self, alpha: i32, beta: i32, ply: i32, depth: i32, flags: NodeFlags) -> i32 {
        if ply as usize >= MAX_PLY {
            return self.static_eval() - ply;
        }

        let mut orderer = MoveOrderer::new();
        if self.config.quiescence_hash {
            if let Some(entry) = self.tt.probe(self.board.hash(), ply) {
                if entry.depth >= depth - ply && entry.bound.proves(entry.score, alpha, beta) {
                    self.stats.hash_cutoffs += 1;
                    return entry.score;
                }
                orderer.prioritize(entry.best_move);
            }
        }

        if flags.null_ok && self.config.quiescence_null && !flags.legal_only {
            // One ply after a pass, no further quiescence: if the opponent
            // still cannot get below beta the position is already quiet.
            let mut ignored = PrincipalVariation::new();
            self.board.make_null_move();
            let value = -self.search(
                &mut ignored,
                -beta,
                1 - beta,
                ply + 1,
                ply + 2,
                NodeFlags {
                    legal_only: false,
                    null_ok: false,
                    verify: false,
                    quiescence: false,
                },
            );
            self.board.unmake_move();
            if self.aborted() {
                return ABORTED;
            }
            if value >= beta {
                return self.static_eval() - ply;
            }
        }

        let mut moves = MoveList::new();
        self.lawyer
            .generate_moves(&*self.board, &mut moves, flags.legal_only);
        if moves.is_empty() {
            return -(MATE_SCORE - ply);
        }
        for killer in self.killers.at(ply as usize) {
            orderer.prioritize(killer);
        }
        orderer.sort(&mut moves, &*self.board, self.evaluator);

        let side = self.board.side_to_move();
        if !self.lawyer.in_check(&*self.board, side) {
            moves.retain(|&mv| is_capture(&*self.board, mv));
        }
        if moves.is_empty() {
            return self.static_eval() - ply;
        }

        let children = NodeFlags {
            legal_only: false,
            null_ok: flags.null_ok,
            verify: false,
            quiescence: true,
        };
        let mut line = PrincipalVariation::new();
        let value = self.dispatch(&mut line, &moves, alpha, beta, ply, depth, children);
        if self.aborted() {
            return ABORTED;
        }

        if let Some(best) = line.first_move() {
            if value >= beta && !is_capture(&*self.board, best) {
                self.killers.store(ply as usize, best);
            }
            if self.config.quiescence_hash {
                self.store(ply, depth, alpha, beta, best, value);
            }
        }
        value
    }
}
