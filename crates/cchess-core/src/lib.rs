//! Core Xiangqi types and the collaborator traits the search is written against.

mod board;
mod book;
mod chess_move;
mod color;
mod error;
mod evaluator;
mod lawyer;
mod piece;
mod piece_kind;
mod random_game;
mod square;

pub use board::Board;
pub use book::{MemoryBook, OpeningBook};
pub use chess_move::{Move, MoveList};
pub use color::Color;
pub use error::ParseError;
pub use evaluator::Evaluator;
pub use lawyer::Lawyer;
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use random_game::{RandomEval, RandomGame, RandomGameParams, RandomRules};
pub use square::Square;
