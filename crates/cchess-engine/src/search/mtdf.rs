//! MTD(f): minimax value by repeated zero-window searches.

use cchess_core::{Board, Evaluator, Lawyer};

use crate::search::negamax::{ABORTED, INF};
use crate::search::pv::PrincipalVariation;
use crate::search::{NodeFlags, SearchContext};

impl<B, L, E> SearchContext<'_, B, L, E>
where
    B: Board,
    L: Lawyer<B>,
    E: Evaluator<B>,
{
    /// Converge on the root value at `depth`, starting from `guess`.
    ///
    /// Each pass is a zero-window search at `(beta - 1, beta)` that either
    /// raises the lower bound or lowers the upper bound. The returned line is
    /// the one from the last pass that failed high, since its first move is
    /// proven to reach the final value.
    pub(crate) fn mtdf(&mut self, pv: &mut PrincipalVariation, guess: i32, depth: i32) -> i32 {
        let mut g = guess;
        let mut lower = -INF;
        let mut upper = INF;
        let mut proven: Option<PrincipalVariation> = None;
        let mut last = PrincipalVariation::new();

        while lower < upper {
            let beta = if g == lower { g + 1 } else { g };
            let mut line = PrincipalVariation::new();
            g = self.search(&mut line, beta - 1, beta, 0, depth, NodeFlags::ROOT);
            if self.aborted() {
                return ABORTED;
            }
            if g < beta {
                upper = g;
            } else {
                lower = g;
                proven = Some(line.clone());
            }
            last = line;
        }

        pv.append(proven.unwrap_or(last));
        g
    }
}
