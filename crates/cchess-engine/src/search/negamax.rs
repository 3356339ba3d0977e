//! Fail-soft move loops: alpha-beta and NegaScout.

use cchess_core::{Board, Evaluator, Lawyer, Move};

use crate::search::pv::PrincipalVariation;
use crate::search::{NodeFlags, SearchContext};

/// Window bound and the score of a position whose side to move can capture
/// the opposing general.
pub const INF: i32 = 30_000;

/// Score of being checkmated at the root. Mate at ply `p` scores `-(MATE_SCORE - p)`.
pub const MATE_SCORE: i32 = 20_000;

/// Scores beyond this magnitude are mate scores.
pub const MATE_THRESHOLD: i32 = 19_000;

/// Maximum search ply (bounds quiescence and the killer table).
pub const MAX_PLY: usize = 128;

/// Returned by every frame that observes an abort. Never trusted by callers.
pub const ABORTED: i32 = 0;

impl<B, L, E> SearchContext<'_, B, L, E>
where
    B: Board,
    L: Lawyer<B>,
    E: Evaluator<B>,
{
    /// Fail-soft negamax over an ordered move list.
    ///
    /// Scans while the best score is below beta, raising alpha to the best
    /// score before each child. A list whose every move is illegal scores as
    /// checkmate.
    pub(crate) fn alpha_beta(
        &mut self,
        pv: &mut PrincipalVariation,
        moves: &[Move],
        mut alpha: i32,
        beta: i32,
        ply: i32,
        depth: i32,
        flags: NodeFlags,
    ) -> i32 {
        let mut best = -INF;
        let mut best_line = PrincipalVariation::new();

        for &mv in moves {
            if best >= beta {
                break;
            }
            alpha = alpha.max(best);

            let mut line = PrincipalVariation::starting_with(mv);
            self.board.make_move(mv);
            let value = -self.search(&mut line, -beta, -alpha, ply + 1, depth, flags);
            self.board.unmake_move();
            if self.aborted() {
                return ABORTED;
            }

            if value > best {
                best = value;
                best_line = line;
            }
        }

        if best == -INF {
            return -(MATE_SCORE - ply);
        }
        pv.append(best_line);
        best
    }

    /// NegaScout: the first move gets the full window, later moves a
    /// zero-width probe at `(a, a + 1)` that is re-searched with `(t, beta)`
    /// when it lands strictly inside the window.
    ///
    /// The re-search is skipped when the child is a static leaf, whose value
    /// does not depend on the window.
    pub(crate) fn nega_scout(
        &mut self,
        pv: &mut PrincipalVariation,
        moves: &[Move],
        alpha: i32,
        beta: i32,
        ply: i32,
        depth: i32,
        flags: NodeFlags,
    ) -> i32 {
        let mut a = alpha;
        let mut b = beta;
        let mut best = -INF;
        let mut best_line = PrincipalVariation::new();
        let static_child = ply + 1 >= depth && !(self.config.quiescence && flags.quiescence);

        for (i, &mv) in moves.iter().enumerate() {
            if a >= beta {
                break;
            }

            let mut line = PrincipalVariation::starting_with(mv);
            self.board.make_move(mv);
            let mut t = -self.search(&mut line, -b, -a, ply + 1, depth, flags);
            if i > 0 && a < t && t < beta && !static_child && !self.aborted() {
                let probe = t;
                line = PrincipalVariation::starting_with(mv);
                t = (-self.search(&mut line, -beta, -probe, ply + 1, depth, flags)).max(probe);
            }
            self.board.unmake_move();
            if self.aborted() {
                return ABORTED;
            }

            if t > best {
                best = t;
                best_line = line;
            }
            a = a.max(t);
            b = a + 1;
        }

        if best == -INF {
            return -(MATE_SCORE - ply);
        }
        pv.append(best_line);
        best
    }
}
