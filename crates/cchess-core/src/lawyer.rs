//! Rules collaborator: move generation and check detection.

use crate::board::Board;
use crate::chess_move::{Move, MoveList};
use crate::color::Color;

/// Knows the rules of the game for boards of type `B`.
pub trait Lawyer<B: Board> {
    /// Append the moves available to the side to move.
    ///
    /// With `legal_only == false` the list may contain pseudo-legal moves
    /// that leave the mover's own general capturable.
    fn generate_moves(&self, board: &B, moves: &mut MoveList, legal_only: bool);

    /// Whether `color`'s general is currently attacked.
    fn in_check(&self, board: &B, color: Color) -> bool;

    /// Whether `mv` is fully legal for the side to move.
    fn legal_move(&self, board: &B, mv: Move) -> bool;
}
