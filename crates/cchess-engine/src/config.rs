//! Search configuration and the named options that update it.

use tracing::{debug, warn};

use crate::search::tt::DEFAULT_HASH_MB;

/// Deepest search the configuration accepts.
pub const MAX_DEPTH: i32 = 64;

/// Default maximum depth.
pub const DEFAULT_DEPTH: i32 = 4;

/// Root search algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAlgorithm {
    /// MTD(f) zero-window bisection over alpha-beta.
    Mtdf,
    /// Full-window fail-soft alpha-beta.
    AlphaBeta,
    /// Principal variation search with zero-window probes.
    NegaScout,
}

/// What the engine must do after an option was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum OptionEffect {
    /// Unknown option name.
    Ignored,
    /// A flag changed; nothing else to do.
    Updated,
    /// The next `think` must start a fresh episode.
    ResetState,
    /// The transposition table must be reallocated.
    ResizeTable,
}

/// Engine search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Deepest iteration, in plies.
    pub max_depth: i32,
    pub algorithm: SearchAlgorithm,
    /// Null-move pruning in the main search.
    pub null_move: bool,
    /// Verified null move (ignored while MTD(f) is selected).
    pub verify_null: bool,
    /// Transposition table use in the main search.
    pub use_table: bool,
    /// Let inexact table bounds narrow the window.
    pub hash_adjust: bool,
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Quiescence search at the horizon.
    pub quiescence: bool,
    /// Null-move quiet test inside quiescence.
    pub quiescence_null: bool,
    /// Transposition table use inside quiescence.
    pub quiescence_hash: bool,
    /// Iterative deepening; when off only `max_depth` is searched.
    pub iterative: bool,
    /// Log every completed iteration.
    pub think_aloud: bool,
    /// Consult the opening book before searching.
    pub use_book: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            algorithm: SearchAlgorithm::Mtdf,
            null_move: true,
            verify_null: true,
            use_table: true,
            hash_adjust: false,
            hash_mb: DEFAULT_HASH_MB,
            quiescence: false,
            quiescence_null: false,
            quiescence_hash: true,
            iterative: true,
            think_aloud: false,
            use_book: true,
        }
    }
}

impl SearchConfig {
    /// Whether null moves are verified. Verification needs full windows, so
    /// it is off whenever MTD(f) drives the search.
    pub fn effective_verify(&self) -> bool {
        self.verify_null && self.algorithm != SearchAlgorithm::Mtdf
    }

    /// Depth reduction of the null-move search.
    pub fn null_reduction(&self) -> i32 {
        if self.effective_verify() { 3 } else { 2 }
    }

    /// Apply one named option.
    ///
    /// Unknown names are ignored. Malformed values reset the option to its
    /// default.
    pub fn apply_option(&mut self, name: &str, value: &str) -> OptionEffect {
        let defaults = SearchConfig::default();
        let value = value.trim();
        let effect = match name {
            "searchPly" => {
                self.max_depth = match value.parse::<i32>() {
                    Ok(depth) if (1..=MAX_DEPTH).contains(&depth) => depth,
                    _ => malformed(name, value, defaults.max_depth),
                };
                OptionEffect::Updated
            }
            "search" => {
                self.algorithm = match value.to_ascii_lowercase().as_str() {
                    "mtd" | "mtdf" => SearchAlgorithm::Mtdf,
                    "alphabeta" => SearchAlgorithm::AlphaBeta,
                    "negascout" => SearchAlgorithm::NegaScout,
                    _ => malformed(name, value, defaults.algorithm),
                };
                self.warn_on_mtdf_verify();
                OptionEffect::Updated
            }
            "nullmove" => {
                self.null_move = flag(name, value, defaults.null_move);
                OptionEffect::Updated
            }
            "verifynull" => {
                self.verify_null = flag(name, value, defaults.verify_null);
                if self.verify_null {
                    self.null_move = true;
                }
                self.warn_on_mtdf_verify();
                OptionEffect::Updated
            }
            "hash" => {
                self.use_table = flag(name, value, defaults.use_table);
                OptionEffect::Updated
            }
            "hashadjust" => {
                self.hash_adjust = flag(name, value, defaults.hash_adjust);
                OptionEffect::Updated
            }
            "hashsize" => {
                self.hash_mb = match value.parse::<usize>() {
                    Ok(mb) if mb > 0 => mb,
                    _ => malformed(name, value, defaults.hash_mb),
                };
                OptionEffect::ResizeTable
            }
            "quiescence" => {
                self.quiescence = flag(name, value, defaults.quiescence);
                OptionEffect::Updated
            }
            "qnull" => {
                self.quiescence_null = flag(name, value, defaults.quiescence_null);
                OptionEffect::Updated
            }
            "qhash" => {
                self.quiescence_hash = flag(name, value, defaults.quiescence_hash);
                OptionEffect::Updated
            }
            "iterative" => {
                self.iterative = flag(name, value, defaults.iterative);
                OptionEffect::ResetState
            }
            "post" => {
                self.think_aloud = flag(name, value, defaults.think_aloud);
                OptionEffect::Updated
            }
            "useOpeningBook" => {
                self.use_book = flag(name, value, defaults.use_book);
                OptionEffect::Updated
            }
            "computerColor" => OptionEffect::ResetState,
            _ => OptionEffect::Ignored,
        };
        debug!(option = name, value, ?effect, "option changed");
        effect
    }

    fn warn_on_mtdf_verify(&self) {
        if self.verify_null && self.algorithm == SearchAlgorithm::Mtdf {
            warn!("null-move verification is disabled while MTD(f) is selected");
        }
    }
}

fn flag(name: &str, value: &str, default: bool) -> bool {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "y" | "1" => true,
        "off" | "false" | "no" | "n" | "0" => false,
        _ => malformed(name, value, default),
    }
}

fn malformed<T: std::fmt::Debug>(name: &str, value: &str, default: T) -> T {
    warn!(option = name, value, ?default, "malformed option value, using default");
    default
}
