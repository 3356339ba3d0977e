//! The engine: search episodes, iterative deepening and options.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cchess_core::{Board, Evaluator, Lawyer, Move, OpeningBook};
use tracing::{debug, info, warn};

use crate::config::{OptionEffect, SearchConfig};
use crate::error::EngineError;
use crate::search::control::{AbortHandle, AbortReason, SearchControl, Timer, Unlimited};
use crate::search::heuristics::KillerTable;
use crate::search::pv::{CutoffKind, PrincipalVariation, PvEntry};
use crate::search::tt::TranspositionTable;
use crate::search::{SearchContext, SearchStats};

/// Where the engine is in its think / get-move cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Ready to start a fresh episode.
    BetweenSearches,
    /// An episode is open; after an external abort it can be resumed.
    Searching,
    /// The episode finished; its move waits for [`Engine::get_move`].
    DoneSearching,
}

/// A search engine over a board `B`, rules `L` and evaluator `E`.
pub struct Engine<B: Board, L, E> {
    board: B,
    lawyer: L,
    evaluator: E,
    book: Option<Box<dyn OpeningBook<B>>>,
    config: SearchConfig,
    tt: TranspositionTable,
    killers: KillerTable,
    timer: Arc<dyn Timer + Send + Sync>,
    abort: AbortHandle,
    state: SearchState,
    abort_reason: AbortReason,
    pv: PrincipalVariation,
    score: i32,
    completed_depth: i32,
    stats: SearchStats,
    started: Instant,
}

impl<B, L, E> Engine<B, L, E>
where
    B: Board,
    L: Lawyer<B>,
    E: Evaluator<B>,
{
    /// Create an engine with the default configuration.
    pub fn new(board: B, lawyer: L, evaluator: E) -> Self {
        Self::with_config(board, lawyer, evaluator, SearchConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(board: B, lawyer: L, evaluator: E, config: SearchConfig) -> Self {
        let tt = TranspositionTable::new(config.hash_mb);
        Self {
            board,
            lawyer,
            evaluator,
            book: None,
            config,
            tt,
            killers: KillerTable::new(),
            timer: Arc::new(Unlimited),
            abort: AbortHandle::new(),
            state: SearchState::BetweenSearches,
            abort_reason: AbortReason::None,
            pv: PrincipalVariation::new(),
            score: 0,
            completed_depth: 0,
            stats: SearchStats::default(),
            started: Instant::now(),
        }
    }

    /// Consult `book` before searching.
    pub fn set_book(&mut self, book: Box<dyn OpeningBook<B>>) {
        self.book = Some(book);
    }

    /// Poll `timer` at every node of subsequent searches.
    pub fn set_timer(&mut self, timer: Arc<dyn Timer + Send + Sync>) {
        self.timer = timer;
    }

    /// Handle another thread may use to interrupt the running search.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    /// Mutable board access for playing moves between searches.
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn lawyer(&self) -> &L {
        &self.lawyer
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Why the last `think` stopped early, if it did.
    pub fn abort_reason(&self) -> AbortReason {
        self.abort_reason
    }

    /// Best complete line found so far.
    pub fn principal_variation(&self) -> &PrincipalVariation {
        &self.pv
    }

    /// The principal variation rendered as text, with its cutoff tag.
    pub fn variation_text(&self) -> String {
        self.pv.to_string()
    }

    /// Score of the last completed iteration.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Deepest fully completed iteration of the current episode.
    pub fn completed_depth(&self) -> i32 {
        self.completed_depth
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Time since the current episode started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn is_thinking(&self) -> bool {
        self.state == SearchState::Searching
    }

    pub fn is_done(&self) -> bool {
        self.state == SearchState::DoneSearching
    }

    /// Close the episode so its result can be collected.
    pub fn end_search(&mut self) {
        self.state = SearchState::DoneSearching;
    }

    /// Apply a named option. Unknown names are ignored.
    pub fn option_changed(&mut self, name: &str, value: &str) {
        match self.config.apply_option(name, value) {
            OptionEffect::ResetState => self.state = SearchState::BetweenSearches,
            OptionEffect::ResizeTable => self.tt = TranspositionTable::new(self.config.hash_mb),
            OptionEffect::Updated | OptionEffect::Ignored => {}
        }
    }

    /// Collect the result of the finished episode.
    ///
    /// Returns [`Move::NULL`] when no line was found.
    pub fn get_move(&mut self) -> Move {
        self.state = SearchState::BetweenSearches;
        self.pv.first_move().unwrap_or(Move::NULL)
    }

    /// Search the current position and return the score of the last
    /// completed iteration.
    ///
    /// A fresh episode clears the transposition and killer tables. After an
    /// external abort the episode stays open and the next call resumes
    /// deepening where it stopped.
    pub fn think(&mut self) -> Result<i32, EngineError> {
        match self.state {
            SearchState::DoneSearching => {
                warn!("think called before the previous result was collected");
                return Err(EngineError::ResultPending);
            }
            SearchState::BetweenSearches => self.begin_episode(),
            SearchState::Searching => {
                debug!(completed = self.completed_depth, "resuming search episode");
            }
        }
        self.abort.reset();
        self.abort_reason = AbortReason::None;

        if self.pv.is_empty() && self.config.use_book {
            if let Some(score) = self.play_book_move() {
                return Ok(score);
            }
        }

        let score = self.deepen();
        if self.abort_reason == AbortReason::External {
            debug!(completed = self.completed_depth, "search interrupted, episode left open");
        } else {
            self.state = SearchState::DoneSearching;
        }
        debug!(
            score,
            depth = self.completed_depth,
            nodes = self.stats.nodes,
            pv = %self.pv,
            "search finished"
        );
        Ok(score)
    }

    fn begin_episode(&mut self) {
        self.tt.flush();
        self.killers.clear();
        self.stats = SearchStats::default();
        self.pv.clear();
        self.completed_depth = 0;
        self.started = Instant::now();
        self.score = self.evaluator.evaluate(&self.board, &self.lawyer);
        self.state = SearchState::Searching;
        debug!(max_depth = self.config.max_depth, algorithm = ?self.config.algorithm, "search episode started");
    }

    /// Adopt a legal book move as a one-move line.
    fn play_book_move(&mut self) -> Option<i32> {
        let book = self.book.as_ref().filter(|b| b.is_valid())?;
        let mv = book.probe(&self.board)?;
        if !self.lawyer.legal_move(&self.board, mv) {
            debug!(%mv, "ignoring illegal book move");
            return None;
        }
        self.pv.clear();
        self.pv.push(PvEntry::new(mv, CutoffKind::None));
        self.score = self.evaluator.evaluate(&self.board, &self.lawyer);
        self.state = SearchState::DoneSearching;
        debug!(%mv, "book move");
        Some(self.score)
    }

    /// Iterative deepening. Only completed iterations replace the line or
    /// leave entries in the transposition table.
    fn deepen(&mut self) -> i32 {
        let control = SearchControl::new(Arc::clone(&self.timer), self.abort.clone());
        let first = if self.config.iterative {
            self.completed_depth + 1
        } else {
            self.config.max_depth
        };
        let mut ctx = SearchContext {
            board: &mut self.board,
            lawyer: &self.lawyer,
            evaluator: &self.evaluator,
            tt: &mut self.tt,
            killers: &mut self.killers,
            config: &self.config,
            control: &control,
            stats: &mut self.stats,
            abort: AbortReason::None,
        };
        let mut guess = self.score;

        for depth in first..=self.config.max_depth {
            let mut line = PrincipalVariation::new();
            ctx.tt.begin_journal();
            let score = ctx.search_root(&mut line, depth, guess);
            let aborted = ctx.aborted();
            if aborted {
                let undone = ctx.tt.rollback();
                debug!(depth, undone, "discarded table writes of aborted iteration");
            } else {
                ctx.tt.commit();
            }
            if self.config.think_aloud {
                let centis = (self.started.elapsed().as_millis() / 10) as u64;
                if aborted {
                    info!(depth, nodes = ctx.stats.nodes, centis, "iteration aborted");
                } else {
                    info!(depth, score, nodes = ctx.stats.nodes, centis, pv = %line, "iteration complete");
                }
            }
            if aborted {
                break;
            }
            self.pv = line;
            self.score = score;
            self.completed_depth = depth;
            guess = score;
        }

        self.abort_reason = ctx.abort;
        self.score
    }
}
