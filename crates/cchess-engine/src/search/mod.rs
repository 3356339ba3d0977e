//! Game-tree search: the per-node protocol and the parts it is built from.

pub mod control;
pub mod heuristics;
mod mtdf;
pub mod negamax;
pub mod ordering;
pub mod pv;
mod quiescence;
pub mod tt;

use cchess_core::{Board, Evaluator, Lawyer, Move, MoveList};
use tracing::debug;

use crate::config::{SearchAlgorithm, SearchConfig};
use control::{AbortReason, SearchControl};
use heuristics::KillerTable;
use negamax::{ABORTED, INF, MATE_SCORE};
use ordering::{MoveOrderer, is_capture};
use pv::{CutoffKind, PrincipalVariation, PvEntry};
use tt::{Bound, TranspositionTable, TtEntry};

/// Counters for one search episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered, quiescence included.
    pub nodes: u64,
    /// Nodes answered straight from the transposition table.
    pub hash_cutoffs: u64,
    /// Nodes pruned by an unverified null move.
    pub null_cutoffs: u64,
}

/// Switches handed from a node to its children.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeFlags {
    /// Generate only fully legal moves; forbids null moves.
    pub legal_only: bool,
    /// A null move may be tried at this node.
    pub null_ok: bool,
    /// Null moves in this subtree are verified.
    pub verify: bool,
    /// The horizon may extend into quiescence.
    pub quiescence: bool,
}

impl NodeFlags {
    pub(crate) const ROOT: NodeFlags = NodeFlags {
        legal_only: false,
        null_ok: true,
        verify: true,
        quiescence: true,
    };
}

/// Everything a node needs, threaded through the recursion.
pub(crate) struct SearchContext<'a, B, L, E> {
    pub board: &'a mut B,
    pub lawyer: &'a L,
    pub evaluator: &'a E,
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerTable,
    pub config: &'a SearchConfig,
    pub control: &'a SearchControl,
    pub stats: &'a mut SearchStats,
    /// First abort observed in this context; never cleared.
    pub abort: AbortReason,
}

impl<B, L, E> SearchContext<'_, B, L, E>
where
    B: Board,
    L: Lawyer<B>,
    E: Evaluator<B>,
{
    /// Search the root to `depth` with the configured algorithm.
    ///
    /// `guess` seeds MTD(f) and is ignored by the full-window searches.
    pub(crate) fn search_root(&mut self, pv: &mut PrincipalVariation, depth: i32, guess: i32) -> i32 {
        match self.config.algorithm {
            SearchAlgorithm::Mtdf => self.mtdf(pv, guess, depth),
            SearchAlgorithm::AlphaBeta | SearchAlgorithm::NegaScout => {
                self.search(pv, -INF, INF, 0, depth, NodeFlags::ROOT)
            }
        }
    }

    /// Whether this context has observed an abort.
    #[inline]
    pub(crate) fn aborted(&self) -> bool {
        self.abort != AbortReason::None
    }

    /// Latch the first abort reported by the timer or the abort handle.
    fn should_abort(&mut self) -> bool {
        if self.aborted() {
            return true;
        }
        let reason = self.control.poll();
        if reason == AbortReason::None {
            return false;
        }
        debug!(?reason, nodes = self.stats.nodes, "search aborted");
        self.abort = reason;
        true
    }

    /// Static evaluation from the side to move's point of view.
    pub(crate) fn static_eval(&self) -> i32 {
        self.evaluator.evaluate(&*self.board, self.lawyer)
    }

    /// The side that just moved left its general en prise.
    fn general_capturable(&self) -> bool {
        let side = self.board.side_to_move();
        self.lawyer.in_check(&*self.board, !side)
    }

    /// Search one node with window `(alpha, beta)`.
    ///
    /// `pv` holds the line leading here; the best continuation is spliced
    /// onto it, and its last entry is tagged when this node ends the line.
    /// `depth` is the target depth of the whole search, so the node is a
    /// leaf once `ply >= depth`.
    pub(crate) fn search(
        &mut self,
        pv: &mut PrincipalVariation,
        mut alpha: i32,
        mut beta: i32,
        ply: i32,
        mut depth: i32,
        flags: NodeFlags,
    ) -> i32 {
        // Check stop condition (timer or external abort)
        if self.should_abort() {
            return ABORTED;
        }
        self.stats.nodes += 1;

        // Previous move left the general en prise
        if self.general_capturable() {
            pv.mark(CutoffKind::Misc);
            return INF;
        }

        // Leaf node: static evaluation or quiescence
        if ply >= depth {
            if self.config.quiescence && flags.quiescence {
                return self.quiescence(alpha, beta, ply, depth, flags);
            }
            return self.static_eval() - ply;
        }

        let mut orderer = MoveOrderer::new();
        let mut null_ok = flags.null_ok && self.config.null_move;

        // Probe transposition table
        if self.config.use_table {
            if let Some(entry) = self.tt.probe(self.board.hash(), ply) {
                if entry.depth >= depth - ply {
                    if entry.bound.proves(entry.score, alpha, beta) {
                        self.stats.hash_cutoffs += 1;
                        pv.push(PvEntry::new(entry.best_move, CutoffKind::Hash));
                        return entry.score;
                    }
                    // Narrow the window to the stored bound
                    if self.config.hash_adjust && alpha < entry.score && entry.score < beta {
                        match entry.bound {
                            Bound::Upper => beta = entry.score,
                            Bound::Lower => alpha = entry.score,
                            Bound::Exact => {}
                        }
                        null_ok = false;
                    }
                }
                orderer.prioritize(entry.best_move);
            }
        }

        // Null move: pass and search the opponent with a reduced depth
        let verify = flags.verify && self.config.effective_verify();
        let mut verifying = false;
        if ply > 0 && !flags.legal_only && null_ok && (!verify || depth - ply > 2) {
            let mut ignored = PrincipalVariation::new();
            let reduced = depth - self.config.null_reduction();
            self.board.make_null_move();
            let value = -self.search(
                &mut ignored,
                -beta,
                1 - beta,
                ply + 1,
                reduced,
                NodeFlags {
                    legal_only: false,
                    null_ok: false,
                    ..flags
                },
            );
            self.board.unmake_move();
            if self.aborted() {
                return ABORTED;
            }
            if value > beta {
                if verify {
                    // Search this node one ply shallower with plain null
                    // moves below; a fail-low there means zugzwang.
                    depth -= 1;
                    verifying = true;
                } else {
                    self.stats.null_cutoffs += 1;
                    pv.mark(CutoffKind::Null);
                    return value;
                }
            }
        }

        // Generate and order moves
        for killer in self.killers.at(ply as usize) {
            orderer.prioritize(killer);
        }

        let mut moves = MoveList::new();
        self.lawyer
            .generate_moves(&*self.board, &mut moves, flags.legal_only);
        // No moves: checkmate
        if moves.is_empty() {
            pv.mark(CutoffKind::Mate);
            return -(MATE_SCORE - ply);
        }
        orderer.sort(&mut moves, &*self.board, self.evaluator);

        let children = NodeFlags {
            legal_only: false,
            null_ok: true,
            verify: verify && !verifying,
            quiescence: flags.quiescence,
        };
        // Search children with the configured move loop
        let mut line = PrincipalVariation::new();
        let mut value = self.dispatch(&mut line, &moves, alpha, beta, ply, depth, children);

        // Verification failed low: zugzwang suspected, re-search at full depth
        if verifying && value < beta && !self.aborted() {
            depth += 1;
            line.clear();
            value = self.dispatch(
                &mut line,
                &moves,
                alpha,
                beta,
                ply,
                depth,
                NodeFlags {
                    verify: true,
                    ..children
                },
            );
        }
        if self.aborted() {
            return ABORTED;
        }

        // Record killer and store in transposition table
        match line.first_move() {
            Some(best) => {
                if value >= beta && !is_capture(&*self.board, best) {
                    self.killers.store(ply as usize, best);
                }
                if self.config.use_table {
                    self.store(ply, depth, alpha, beta, best, value);
                }
                pv.append(line);
            }
            // Every generated move was illegal.
            None => pv.mark(CutoffKind::Mate),
        }
        value
    }

    /// Run the configured move-loop over an ordered list.
    fn dispatch(
        &mut self,
        pv: &mut PrincipalVariation,
        moves: &[Move],
        alpha: i32,
        beta: i32,
        ply: i32,
        depth: i32,
        flags: NodeFlags,
    ) -> i32 {
        match self.config.algorithm {
            SearchAlgorithm::NegaScout => self.nega_scout(pv, moves, alpha, beta, ply, depth, flags),
            SearchAlgorithm::AlphaBeta | SearchAlgorithm::Mtdf => {
                self.alpha_beta(pv, moves, alpha, beta, ply, depth, flags)
            }
        }
    }

    fn store(&mut self, ply: i32, depth: i32, alpha: i32, beta: i32, best: Move, score: i32) {
        let entry = TtEntry {
            best_move: best,
            score,
            depth: depth - ply,
            bound: Bound::classify(score, alpha, beta),
        };
        self.tt.store(self.board.hash(), ply, entry);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::control::{AbortHandle, Unlimited};
    use cchess_core::{RandomEval, RandomGame, RandomGameParams, RandomRules};

    /// Owns everything a [`SearchContext`] borrows.
    pub(crate) struct Harness {
        pub game: RandomGame,
        pub tt: TranspositionTable,
        pub killers: KillerTable,
        pub config: SearchConfig,
        pub control: SearchControl,
        pub abort: AbortHandle,
        pub stats: SearchStats,
    }

    impl Harness {
        pub(crate) fn new(params: RandomGameParams, config: SearchConfig) -> Self {
            let abort = AbortHandle::new();
            Self {
                game: RandomGame::new(params),
                tt: TranspositionTable::with_slots(1 << 14),
                killers: KillerTable::new(),
                config,
                control: SearchControl::new(Arc::new(Unlimited), abort.clone()),
                abort,
                stats: SearchStats::default(),
            }
        }

        pub(crate) fn ctx(&mut self) -> SearchContext<'_, RandomGame, RandomRules, RandomEval> {
            SearchContext {
                board: &mut self.game,
                lawyer: &RandomRules,
                evaluator: &RandomEval,
                tt: &mut self.tt,
                killers: &mut self.killers,
                config: &self.config,
                control: &self.control,
                stats: &mut self.stats,
                abort: AbortReason::None,
            }
        }

        pub(crate) fn first_move(&self) -> Move {
            let mut moves = MoveList::new();
            RandomRules.generate_moves(&self.game, &mut moves, false);
            moves[0]
        }
    }

    pub(crate) fn alphabeta() -> SearchConfig {
        SearchConfig {
            algorithm: SearchAlgorithm::AlphaBeta,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn leaf_returns_biased_static_eval() {
        let mut h = Harness::new(RandomGameParams::default(), alphabeta());
        let mv = h.first_move();
        h.game.make_move(mv);
        let mut ctx = h.ctx();
        let expected = ctx.static_eval() - 1;
        let mut pv = PrincipalVariation::starting_with(mv);
        assert_eq!(ctx.search(&mut pv, -INF, INF, 1, 1, NodeFlags::ROOT), expected);
        assert_eq!(ctx.stats.nodes, 1);
    }

    #[test]
    fn king_capturable_child_scores_inf_and_tags_misc() {
        let params = RandomGameParams {
            illegal_percent: 100,
            ..RandomGameParams::default()
        };
        let mut h = Harness::new(params, alphabeta());
        let mv = h.first_move();
        h.game.make_move(mv);
        let mut ctx = h.ctx();
        let mut pv = PrincipalVariation::starting_with(mv);
        let score = ctx.search(&mut pv, -INF, INF, 1, 3, NodeFlags::ROOT);
        assert_eq!(score, INF);
        assert_eq!(pv.cutoff(), CutoffKind::Misc);
        assert_eq!(pv.len(), 1);
    }

    #[test]
    fn all_moves_illegal_is_checkmate() {
        let params = RandomGameParams {
            illegal_percent: 100,
            ..RandomGameParams::default()
        };
        let mut h = Harness::new(params, alphabeta());
        let mut ctx = h.ctx();
        let mut pv = PrincipalVariation::new();
        let score = ctx.search(&mut pv, -INF, INF, 0, 2, NodeFlags::ROOT);
        assert_eq!(score, -MATE_SCORE);
        assert!(pv.is_empty());
    }

    #[test]
    fn aborted_search_returns_sentinel_and_stores_nothing() {
        let mut h = Harness::new(RandomGameParams::default(), alphabeta());
        h.abort.abort();
        let mut ctx = h.ctx();
        let mut pv = PrincipalVariation::new();
        let score = ctx.search(&mut pv, -INF, INF, 0, 4, NodeFlags::ROOT);
        assert_eq!(score, ABORTED);
        assert_eq!(ctx.abort, AbortReason::External);
        assert!(pv.is_empty());
        assert_eq!(h.stats.nodes, 0);
        assert_eq!(h.tt.occupied(), 0);
    }

    #[test]
    fn stored_entry_is_reused_as_hash_cutoff() {
        let mut h = Harness::new(RandomGameParams::default(), alphabeta());
        let mv = h.first_move();
        let key = h.game.hash();
        let entry = TtEntry {
            best_move: mv,
            score: 123,
            depth: 5,
            bound: Bound::Exact,
        };
        h.tt.store(key, 0, entry);

        for depth in [3, 5] {
            h.stats = SearchStats::default();
            let mut ctx = h.ctx();
            let mut pv = PrincipalVariation::new();
            let score = ctx.search(&mut pv, -INF, INF, 0, depth, NodeFlags::ROOT);
            assert_eq!(score, 123, "depth {depth}");
            assert_eq!(pv.first_move(), Some(mv));
            assert_eq!(pv.cutoff(), CutoffKind::Hash);
            assert_eq!(h.stats.nodes, 1);
            assert_eq!(h.stats.hash_cutoffs, 1);
        }

        // Deeper than the entry: searched for real.
        h.stats = SearchStats::default();
        let mut ctx = h.ctx();
        let mut pv = PrincipalVariation::new();
        ctx.search(&mut pv, -INF, INF, 0, 6, NodeFlags::ROOT);
        assert!(h.stats.nodes > 1);
    }

    #[test]
    fn inexact_entry_only_cuts_when_it_decides_the_window() {
        let mut h = Harness::new(RandomGameParams::default(), alphabeta());
        let mv = h.first_move();
        let key = h.game.hash();
        h.tt.store(
            key,
            0,
            TtEntry {
                best_move: mv,
                score: 50,
                depth: 4,
                bound: Bound::Lower,
            },
        );
        let mut ctx = h.ctx();
        let mut pv = PrincipalVariation::new();
        assert_eq!(ctx.search(&mut pv, 10, 40, 0, 4, NodeFlags::ROOT), 50);
        assert_eq!(ctx.stats.nodes, 1);

        let mut pv = PrincipalVariation::new();
        ctx.search(&mut pv, 60, 90, 0, 4, NodeFlags::ROOT);
        assert!(ctx.stats.nodes > 2);
    }

    #[test]
    fn search_fills_table_and_killers() {
        let params = RandomGameParams {
            capture_percent: 0,
            ..RandomGameParams::default()
        };
        let mut h = Harness::new(params, alphabeta());
        let mut ctx = h.ctx();
        let mut pv = PrincipalVariation::new();
        ctx.search(&mut pv, -INF, INF, 0, 4, NodeFlags::ROOT);
        assert!(!pv.is_empty());
        assert!(h.tt.occupied() > 0);
        assert!((0..4).any(|ply| h.killers.at(ply).count() > 0));
    }

    #[test]
    fn captures_never_become_killers() {
        let params = RandomGameParams {
            capture_percent: 100,
            capture_budget: u8::MAX,
            illegal_percent: 0,
            ..RandomGameParams::default()
        };
        let mut h = Harness::new(params, alphabeta());
        let mut ctx = h.ctx();
        let mut pv = PrincipalVariation::new();
        ctx.search(&mut pv, -INF, INF, 0, 4, NodeFlags::ROOT);
        assert!((0..8).all(|ply| h.killers.at(ply).count() == 0));
    }

    #[test]
    fn search_leaves_board_unchanged() {
        let mut h = Harness::new(RandomGameParams::default(), SearchConfig::default());
        let before = h.game.hash();
        let mut ctx = h.ctx();
        let mut pv = PrincipalVariation::new();
        ctx.search_root(&mut pv, 4, 0);
        assert_eq!(h.game.hash(), before);
        assert_eq!(h.game.ply(), 0);
    }
}
