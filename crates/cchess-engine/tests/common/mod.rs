//! Hand-built game trees for engine integration tests.
//!
//! A [`Script`] is a graph of nodes joined by named moves. Each node carries a
//! Red-relative evaluation and may be terminal (side to move is mated) or
//! exposed (the side that just moved left its general en prise). A node with
//! no outgoing moves that is not terminal is a rest node: its only move is
//! [`WAIT`], which hands the turn over without changing the position.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use cchess_core::{Board, Color, Evaluator, Lawyer, Move, MoveList, Piece, Square};
use cchess_engine::{AbortHandle, Timer};

/// The only move available at a rest node.
pub const WAIT: &str = "i0i1";

#[derive(Debug, Clone, Default)]
struct Node {
    red_eval: i32,
    moves: Vec<(Move, usize)>,
    pass: Option<usize>,
    pieces: Vec<(Square, Piece)>,
    exposed: bool,
    terminal: bool,
}

/// Builder for a scripted game tree.
#[derive(Debug, Clone, Default)]
pub struct Script {
    nodes: Vec<Node>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node scored `red_eval` from Red's point of view.
    pub fn node(&mut self, red_eval: i32) -> usize {
        self.nodes.push(Node {
            red_eval,
            ..Node::default()
        });
        self.nodes.len() - 1
    }

    /// Add a node where the side to move is checkmated.
    pub fn mated(&mut self) -> usize {
        let id = self.node(0);
        self.nodes[id].terminal = true;
        id
    }

    /// Add a node where the side that just moved left its general en prise.
    pub fn exposed(&mut self) -> usize {
        let id = self.node(0);
        self.nodes[id].exposed = true;
        id
    }

    /// Join `from` to `to` by the move written as `mv`.
    pub fn link(&mut self, from: usize, mv: &str, to: usize) {
        let mv: Move = mv.parse().expect("valid move text");
        self.nodes[from].moves.push((mv, to));
    }

    /// Passing at `from` leads to `to` instead of the same position.
    pub fn pass(&mut self, from: usize, to: usize) {
        self.nodes[from].pass = Some(to);
    }

    /// Put `piece` on `square` in node `id`.
    pub fn place(&mut self, id: usize, square: &str, piece: Piece) {
        let square: Square = square.parse().expect("valid square");
        self.nodes[id].pieces.push((square, piece));
    }

    /// A board positioned at `root` with Red to move.
    pub fn start(self, root: usize) -> ScriptedBoard {
        ScriptedBoard {
            nodes: self.nodes,
            frames: vec![Frame {
                node: root,
                side: Color::Red,
                key: mix(root as u64),
            }],
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    side: Color,
    key: u64,
}

/// A position in a [`Script`], with a make/unmake stack.
#[derive(Debug, Clone)]
pub struct ScriptedBoard {
    nodes: Vec<Node>,
    frames: Vec<Frame>,
}

impl ScriptedBoard {
    fn top(&self) -> Frame {
        self.frames[self.frames.len() - 1]
    }

    fn current(&self) -> &Node {
        &self.nodes[self.top().node]
    }

    /// Moves leaving this position and where they lead.
    fn edges(&self) -> Vec<(Move, usize)> {
        let node = self.current();
        if node.terminal {
            Vec::new()
        } else if node.moves.is_empty() {
            vec![(wait(), self.top().node)]
        } else {
            node.moves.clone()
        }
    }

    /// Stack depth below the starting position.
    pub fn ply(&self) -> usize {
        self.frames.len() - 1
    }

    fn push(&mut self, node: usize, salt: u64) {
        let top = self.top();
        self.frames.push(Frame {
            node,
            side: !top.side,
            key: mix(top.key ^ salt.rotate_left(17)),
        });
    }
}

impl Board for ScriptedBoard {
    fn make_move(&mut self, mv: Move) {
        let to = self
            .edges()
            .into_iter()
            .find(|&(m, _)| m == mv)
            .map(|(_, to)| to)
            .unwrap_or_else(|| panic!("{mv} is not scripted here"));
        self.push(to, u64::from(mv.raw()) + 1);
    }

    fn unmake_move(&mut self) {
        assert!(self.frames.len() > 1, "unmake past the starting position");
        self.frames.pop();
    }

    fn make_null_move(&mut self) {
        let top = self.top();
        let to = self.nodes[top.node].pass.unwrap_or(top.node);
        self.push(to, 0);
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.current()
            .pieces
            .iter()
            .find(|&&(s, _)| s == square)
            .map(|&(_, p)| p)
    }

    fn side_to_move(&self) -> Color {
        self.top().side
    }

    fn hash(&self) -> u64 {
        self.top().key
    }
}

/// Rules for a [`ScriptedBoard`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedRules;

impl ScriptedRules {
    fn exposes(board: &ScriptedBoard, to: usize) -> bool {
        board.nodes[to].exposed
    }
}

impl Lawyer<ScriptedBoard> for ScriptedRules {
    fn generate_moves(&self, board: &ScriptedBoard, moves: &mut MoveList, legal_only: bool) {
        moves.clear();
        moves.extend(
            board
                .edges()
                .into_iter()
                .filter(|&(_, to)| !legal_only || !Self::exposes(board, to))
                .map(|(mv, _)| mv),
        );
    }

    fn in_check(&self, board: &ScriptedBoard, color: Color) -> bool {
        let node = board.current();
        if color == board.side_to_move() {
            node.terminal
        } else {
            node.exposed
        }
    }

    fn legal_move(&self, board: &ScriptedBoard, mv: Move) -> bool {
        board
            .edges()
            .iter()
            .any(|&(m, to)| m == mv && !Self::exposes(board, to))
    }
}

/// Evaluation of a [`ScriptedBoard`]: the node's score for the side to move.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedEval;

impl Evaluator<ScriptedBoard> for ScriptedEval {
    fn evaluate(&self, board: &ScriptedBoard, _lawyer: &dyn Lawyer<ScriptedBoard>) -> i32 {
        board.current().red_eval * board.side_to_move().sign()
    }
}

pub fn wait() -> Move {
    WAIT.parse().expect("valid move text")
}

pub fn mv(text: &str) -> Move {
    text.parse().expect("valid move text")
}

fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Timer that runs out after a fixed number of polls.
#[derive(Debug)]
pub struct Countdown {
    polls: AtomicU64,
}

impl Countdown {
    pub fn new(polls: u64) -> Self {
        Self {
            polls: AtomicU64::new(polls),
        }
    }
}

impl Timer for Countdown {
    fn have_time_left_for_move(&self) -> bool {
        self.polls
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Timer that never runs out but raises an external abort once, after a
/// fixed number of polls.
#[derive(Debug)]
pub struct AbortAfter {
    polls: AtomicU64,
    handle: AbortHandle,
}

impl AbortAfter {
    pub fn new(polls: u64, handle: AbortHandle) -> Self {
        Self {
            polls: AtomicU64::new(polls),
            handle,
        }
    }
}

impl Timer for AbortAfter {
    fn have_time_left_for_move(&self) -> bool {
        if self.polls.fetch_sub(1, Ordering::Relaxed) == 1 {
            self.handle.abort();
        }
        true
    }
}
