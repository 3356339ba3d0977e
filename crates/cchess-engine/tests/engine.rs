//! Engine behavior on hand-built game trees.

mod common;

use cchess_core::{Color, MemoryBook, Move, Piece, PieceKind};
use cchess_engine::{
    CutoffKind, Engine, EngineError, MATE_SCORE, SearchAlgorithm, SearchConfig, SearchState,
};
use common::{Script, ScriptedBoard, ScriptedEval, ScriptedRules, mv};

type ScriptedEngine = Engine<ScriptedBoard, ScriptedRules, ScriptedEval>;

fn engine(board: ScriptedBoard, config: SearchConfig) -> ScriptedEngine {
    let config = SearchConfig { hash_mb: 1, ..config };
    Engine::with_config(board, ScriptedRules, ScriptedEval, config)
}

fn depth(max_depth: i32) -> SearchConfig {
    SearchConfig {
        max_depth,
        ..SearchConfig::default()
    }
}

/// Red mates with h2h9; the quiet alternatives are worth a little.
fn mate_in_one() -> ScriptedBoard {
    let mut s = Script::new();
    let root = s.node(0);
    let a = s.node(0);
    let b = s.node(30);
    let mate = s.mated();
    // Passing while mated hands Red the general.
    let gone = s.exposed();
    s.pass(mate, gone);
    s.link(root, "a0a1", a);
    s.link(root, "b0b1", b);
    s.link(root, "h2h9", mate);
    s.start(root)
}

/// Red can play quietly for a small edge, or put Black in zugzwang: Black's
/// only move loses heavily though passing would win.
fn zugzwang() -> ScriptedBoard {
    let mut s = Script::new();
    let root = s.node(0);
    let quiet = s.node(10);
    let squeeze = s.node(0);
    let passed = s.node(-100);
    let forced = s.node(500);
    s.link(root, "a0a1", quiet);
    s.link(root, "b0b1", squeeze);
    s.pass(squeeze, passed);
    s.link(squeeze, "c0c1", forced);
    s.start(root)
}

#[test]
fn finds_mate_in_one() {
    for algorithm in [SearchAlgorithm::Mtdf, SearchAlgorithm::AlphaBeta, SearchAlgorithm::NegaScout] {
        let mut e = engine(
            mate_in_one(),
            SearchConfig {
                algorithm,
                ..depth(2)
            },
        );
        let score = e.think().unwrap();
        assert_eq!(score, MATE_SCORE - 1, "{algorithm:?}");
        assert_eq!(e.principal_variation().cutoff(), CutoffKind::Mate, "{algorithm:?}");
        assert_eq!(e.variation_text(), "h2h9 {MATE}");
        assert_eq!(e.get_move(), mv("h2h9"), "{algorithm:?}");
    }
}

#[test]
fn avoids_leaving_the_general_en_prise() {
    let mut s = Script::new();
    let root = s.node(0);
    let blunder = s.exposed();
    let safe = s.node(0);
    s.link(root, "a0a1", blunder);
    s.link(root, "b0b1", safe);

    let mut e = engine(s.start(root), depth(2));
    assert_eq!(e.think().unwrap(), -2);
    assert_eq!(e.get_move(), mv("b0b1"));
}

#[test]
fn no_legal_move_returns_null() {
    let mut s = Script::new();
    let root = s.node(0);
    for text in ["a0a1", "b0b1"] {
        let child = s.exposed();
        s.link(root, text, child);
    }

    let mut e = engine(s.start(root), depth(3));
    assert_eq!(e.think().unwrap(), -MATE_SCORE);
    assert!(e.principal_variation().is_empty());
    assert_eq!(e.get_move(), Move::NULL);
}

#[test]
fn captures_the_more_valuable_piece() {
    let mut s = Script::new();
    let root = s.node(0);
    let take_soldier = s.node(100);
    let take_chariot = s.node(900);
    s.link(root, "a3a4", take_soldier);
    s.link(root, "b2b9", take_chariot);
    s.place(root, "a4", Piece::new(PieceKind::Soldier, Color::Black));
    s.place(root, "b9", Piece::new(PieceKind::Chariot, Color::Black));

    let mut e = engine(s.start(root), depth(1));
    e.think().unwrap();
    assert_eq!(e.get_move(), mv("b2b9"));
}

#[test]
fn verified_null_move_sees_through_zugzwang() {
    let config = SearchConfig {
        algorithm: SearchAlgorithm::AlphaBeta,
        use_table: false,
        iterative: false,
        ..depth(4)
    };
    let mut e = engine(zugzwang(), config);
    assert_eq!(e.think().unwrap(), 496);
    assert_eq!(e.get_move(), mv("b0b1"));
}

#[test]
fn unverified_null_move_is_fooled_by_zugzwang() {
    let mut e = engine(zugzwang(), SearchConfig::default());
    for (name, value) in [
        ("search", "alphabeta"),
        ("hash", "off"),
        ("iterative", "off"),
        ("searchPly", "4"),
        ("verifynull", "off"),
    ] {
        e.option_changed(name, value);
    }
    assert!(e.config().null_move);
    assert_eq!(e.think().unwrap(), 6);
    assert_eq!(e.get_move(), mv("a0a1"));
    assert!(e.stats().null_cutoffs > 0);
}

#[test]
fn without_null_move_zugzwang_is_searched_exactly() {
    let config = SearchConfig {
        algorithm: SearchAlgorithm::AlphaBeta,
        null_move: false,
        ..depth(4)
    };
    let mut e = engine(zugzwang(), config);
    assert_eq!(e.think().unwrap(), 496);
    assert_eq!(e.stats().null_cutoffs, 0);
}

#[test]
fn legal_book_move_is_played_without_search() {
    let board = mate_in_one();
    let mut book = MemoryBook::new();
    book.insert_position(&board, mv("a0a1"));

    let mut e = engine(board, depth(2));
    e.set_book(Box::new(book));
    assert_eq!(e.think().unwrap(), 0);
    assert!(e.is_done());
    assert_eq!(e.stats().nodes, 0);
    assert_eq!(e.get_move(), mv("a0a1"));
}

#[test]
fn illegal_book_move_falls_back_to_search() {
    let mut s = Script::new();
    let root = s.node(0);
    let blunder = s.exposed();
    let safe = s.node(0);
    s.link(root, "a0a1", blunder);
    s.link(root, "b0b1", safe);
    let board = s.start(root);
    let mut book = MemoryBook::new();
    book.insert_position(&board, mv("a0a1"));

    let mut e = engine(board, depth(2));
    e.set_book(Box::new(book));
    e.think().unwrap();
    assert!(e.stats().nodes > 0);
    assert_eq!(e.get_move(), mv("b0b1"));
}

#[test]
fn state_machine_guards_pending_results() {
    let mut e = engine(mate_in_one(), depth(2));
    assert_eq!(e.state(), SearchState::BetweenSearches);
    e.think().unwrap();
    assert!(e.is_done());
    assert_eq!(e.think(), Err(EngineError::ResultPending));

    // Changing how deepening works starts over.
    e.option_changed("iterative", "off");
    assert_eq!(e.state(), SearchState::BetweenSearches);
    e.think().unwrap();
    assert_eq!(e.completed_depth(), 2);
    assert_eq!(e.get_move(), mv("h2h9"));
}

#[test]
fn unknown_and_malformed_options_are_harmless() {
    let mut e = engine(mate_in_one(), depth(2));
    e.option_changed("ponder", "on");
    e.option_changed("searchPly", "deep");
    assert_eq!(e.config().max_depth, SearchConfig::default().max_depth);
    e.option_changed("nullmove", "maybe");
    assert!(e.config().null_move);
    assert_eq!(e.state(), SearchState::BetweenSearches);
}
