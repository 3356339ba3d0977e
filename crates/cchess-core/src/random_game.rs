//! Deterministic procedural game for driving the search without real rules.
//!
//! Every position is identified by a 64-bit key mixed from its parent's key
//! and the move (or pass) that produced it. Everything else about the
//! position (branching factor, piece layout, captures, illegal moves, check
//! status, checkmate) is rolled from that key, so the same move sequence
//! always reaches the same position. Scores are kept incrementally from Red's
//! point of view and bounded per ply by [`RandomGameParams::max_step`] plus
//! the value of whatever was captured.

use crate::board::Board;
use crate::chess_move::{Move, MoveList};
use crate::color::Color;
use crate::evaluator::Evaluator;
use crate::lawyer::Lawyer;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

const SALT_ROOT: u64 = 0x5EED_0000_0000_0001;
const SALT_LAYOUT: u64 = 0x1A70_0000_0000_0002;
const SALT_STATUS: u64 = 0x57A7_0000_0000_0003;
const SALT_PASS: u64 = 0xDA55_0000_0000_0004;

/// Largest branching factor that keeps every origin and destination distinct.
const MAX_BRANCHING: usize = Square::COUNT / 2;

const NON_GENERAL: [PieceKind; 6] = [
    PieceKind::Soldier,
    PieceKind::Advisor,
    PieceKind::Elephant,
    PieceKind::Horse,
    PieceKind::Cannon,
    PieceKind::Chariot,
];

/// Shape of a [`RandomGame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomGameParams {
    /// Seed of the root position.
    pub seed: u64,
    /// Fewest moves generated in a non-terminal position (at least 1).
    pub min_moves: usize,
    /// Most moves generated in a position.
    pub max_moves: usize,
    /// Chance, in percent, that a generated move captures.
    pub capture_percent: u32,
    /// Chance, in percent, that a generated move leaves the mover's general capturable.
    pub illegal_percent: u32,
    /// Chance, in percent, that the side to move is in check.
    pub check_percent: u32,
    /// Chance, in permille, that a position is checkmate.
    pub mate_permille: u32,
    /// Largest positional score change a single move can make.
    pub max_step: i32,
    /// Score the passing side loses on a null move.
    pub pass_penalty: i32,
    /// Total captures available along any line.
    pub capture_budget: u8,
}

impl Default for RandomGameParams {
    fn default() -> Self {
        Self {
            seed: 0x0C0F_FEE0_C0FF_EE00,
            min_moves: 3,
            max_moves: 8,
            capture_percent: 25,
            illegal_percent: 5,
            check_percent: 5,
            mate_permille: 3,
            max_step: 40,
            pass_penalty: 30,
            capture_budget: 6,
        }
    }
}

impl RandomGameParams {
    /// A quiet game: no captures, illegal moves, checks or mates, and a pass
    /// penalty that dwarfs any score reachable within `depth` plies.
    ///
    /// Passing is never better than moving in such a game, so it is free of
    /// zugzwang.
    pub fn zugzwang_free(seed: u64, depth: i32) -> Self {
        let max_step = 40;
        Self {
            seed,
            capture_percent: 0,
            illegal_percent: 0,
            check_percent: 0,
            mate_permille: 0,
            max_step,
            pass_penalty: 4 * max_step * depth.max(1) + 1_000,
            capture_budget: 0,
            ..Self::default()
        }
    }
}

/// One generated move with everything its child position inherits.
#[derive(Debug, Clone, Copy)]
struct Slot {
    mv: Move,
    mover: Piece,
    victim: Option<Piece>,
    exposes_general: bool,
    delta: i32,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    key: u64,
    side: Color,
    /// Score from Red's point of view.
    score: i32,
    captures_left: u8,
    /// The side not to move can have its general captured.
    exposed: bool,
    /// The side to move is in check.
    checked: bool,
    terminal: bool,
}

/// Xorshift stream seeded from a position key.
struct Rolls(u64);

impl Rolls {
    fn new(key: u64, salt: u64) -> Self {
        Rolls(mix(key, salt) | 1)
    }

    fn next(&mut self) -> u64 {
        let mut s = self.0;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.0 = s;
        s
    }

    fn below(&mut self, n: u64) -> u64 {
        if n == 0 { 0 } else { self.next() % n }
    }
}

fn mix(a: u64, b: u64) -> u64 {
    let mut z = a ^ b.wrapping_add(0x9E37_79B9_7F4A_7C15).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A procedurally generated game position with its move history.
#[derive(Debug, Clone)]
pub struct RandomGame {
    params: RandomGameParams,
    stack: Vec<Frame>,
}

impl RandomGame {
    /// Create the root position of the game described by `params`.
    pub fn new(params: RandomGameParams) -> Self {
        let min_moves = params.min_moves.clamp(1, MAX_BRANCHING);
        let params = RandomGameParams {
            min_moves,
            max_moves: params.max_moves.clamp(min_moves, MAX_BRANCHING),
            ..params
        };
        let root = Frame {
            key: mix(params.seed, SALT_ROOT),
            side: Color::Red,
            score: 0,
            captures_left: params.capture_budget,
            exposed: false,
            checked: false,
            terminal: false,
        };
        Self {
            params,
            stack: vec![root],
        }
    }

    /// Root position of a game seeded with `seed` and default parameters.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(RandomGameParams {
            seed,
            ..RandomGameParams::default()
        })
    }

    /// Parameters this game was built with.
    pub fn params(&self) -> &RandomGameParams {
        &self.params
    }

    /// Number of moves and passes played from the root.
    pub fn ply(&self) -> usize {
        self.stack.len() - 1
    }

    /// Score of the current position from Red's point of view.
    pub fn red_score(&self) -> i32 {
        self.top().score
    }

    fn top(&self) -> &Frame {
        &self.stack[self.stack.len() - 1]
    }

    fn slots(&self) -> Vec<Slot> {
        let frame = self.top();
        if frame.terminal {
            return Vec::new();
        }
        let p = &self.params;
        let mut rolls = Rolls::new(frame.key, SALT_LAYOUT);
        let span = (p.max_moves - p.min_moves + 1) as u64;
        let count = p.min_moves + rolls.below(span) as usize;
        let base = rolls.below(Square::COUNT as u64) as usize;
        let general_slot = if rolls.below(3) == 0 {
            Some(rolls.below(count as u64) as usize)
        } else {
            None
        };

        (0..count)
            .map(|i| {
                let origin = Square::from_index_unchecked(((base + 2 * i) % Square::COUNT) as u8);
                let dest = Square::from_index_unchecked(((base + 2 * i + 1) % Square::COUNT) as u8);
                let kind = if general_slot == Some(i) {
                    PieceKind::General
                } else {
                    NON_GENERAL[rolls.below(NON_GENERAL.len() as u64) as usize]
                };
                let victim = if frame.captures_left > 0
                    && rolls.below(100) < u64::from(p.capture_percent)
                {
                    let kind = NON_GENERAL[rolls.below(NON_GENERAL.len() as u64) as usize];
                    Some(Piece::new(kind, !frame.side))
                } else {
                    None
                };
                let exposes_general = rolls.below(100) < u64::from(p.illegal_percent);
                let span = 2 * p.max_step.max(0) as u64 + 1;
                let delta = rolls.below(span) as i32 - p.max_step.max(0);
                Slot {
                    mv: Move::new(origin, dest),
                    mover: Piece::new(kind, frame.side),
                    victim,
                    exposes_general,
                    delta,
                }
            })
            .collect()
    }

    /// Roll check and checkmate status for a freshly created frame.
    fn settle(&self, frame: &mut Frame) {
        let mut rolls = Rolls::new(frame.key, SALT_STATUS);
        frame.checked = rolls.below(100) < u64::from(self.params.check_percent);
        if rolls.below(1000) < u64::from(self.params.mate_permille) {
            frame.terminal = true;
            frame.checked = true;
        }
    }
}

impl Board for RandomGame {
    fn make_move(&mut self, mv: Move) {
        let parent = *self.top();
        let slot = self.slots().into_iter().find(|s| s.mv == mv);
        let (gain, captured, exposed) = match slot {
            Some(s) => {
                let material = s.victim.map_or(0, |v| v.kind.value());
                (s.delta + material, s.victim.is_some(), s.exposes_general)
            }
            None => (0, false, false),
        };
        let mut child = Frame {
            key: mix(parent.key, u64::from(mv.raw()) + 1),
            side: !parent.side,
            score: parent.score + parent.side.sign() * gain,
            captures_left: parent.captures_left - u8::from(captured && parent.captures_left > 0),
            exposed,
            checked: false,
            terminal: false,
        };
        self.settle(&mut child);
        self.stack.push(child);
    }

    fn unmake_move(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn make_null_move(&mut self) {
        let parent = *self.top();
        let child = Frame {
            key: mix(parent.key, SALT_PASS),
            side: !parent.side,
            score: parent.score - parent.side.sign() * self.params.pass_penalty,
            captures_left: parent.captures_left,
            exposed: parent.checked,
            checked: parent.exposed,
            terminal: false,
        };
        self.stack.push(child);
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.slots().into_iter().find_map(|s| {
            if s.mv.origin() == square {
                Some(s.mover)
            } else if s.mv.dest() == square {
                s.victim
            } else {
                None
            }
        })
    }

    fn side_to_move(&self) -> Color {
        self.top().side
    }

    fn hash(&self) -> u64 {
        self.top().key
    }
}

/// Rules of a [`RandomGame`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRules;

impl Lawyer<RandomGame> for RandomRules {
    fn generate_moves(&self, board: &RandomGame, moves: &mut MoveList, legal_only: bool) {
        moves.extend(
            board
                .slots()
                .iter()
                .filter(|s| !(legal_only && s.exposes_general))
                .map(|s| s.mv),
        );
    }

    fn in_check(&self, board: &RandomGame, color: Color) -> bool {
        let frame = board.top();
        if color == frame.side {
            frame.checked
        } else {
            frame.exposed
        }
    }

    fn legal_move(&self, board: &RandomGame, mv: Move) -> bool {
        board
            .slots()
            .iter()
            .any(|s| s.mv == mv && !s.exposes_general)
    }
}

/// Evaluation of a [`RandomGame`]: its incremental score.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEval;

impl Evaluator<RandomGame> for RandomEval {
    fn evaluate(&self, board: &RandomGame, _lawyer: &dyn Lawyer<RandomGame>) -> i32 {
        board.red_score() * board.side_to_move().sign()
    }
}
