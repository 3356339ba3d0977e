//! Adversarial game-tree search for Xiangqi.
//!
//! [`Engine`] drives iterative deepening over MTD(f), alpha-beta or
//! NegaScout, with verified null-move pruning, quiescence, a transposition
//! table and killer-move ordering. The board, rules, evaluation and opening
//! book are collaborators supplied through the traits in `cchess_core`.

pub mod config;
pub mod engine;
pub mod error;
pub mod search;

pub use config::{OptionEffect, SearchAlgorithm, SearchConfig};
pub use engine::{Engine, SearchState};
pub use error::EngineError;
pub use search::SearchStats;
pub use search::control::{AbortHandle, AbortReason, MoveTimer, Timer, Unlimited};
pub use search::negamax::{INF, MATE_SCORE, MATE_THRESHOLD};
pub use search::pv::{CutoffKind, PrincipalVariation, PvEntry};
pub use search::tt::{Bound, TranspositionTable};
