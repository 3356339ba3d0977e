//! Position state shared between the search and the rules.

use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::Piece;
use crate::square::Square;

/// A mutable game position with push/pop move history.
///
/// Every `make_move` or `make_null_move` must be paired with exactly one
/// later `unmake_move`, which undoes the most recent of either.
pub trait Board {
    /// Play `mv` for the side to move.
    fn make_move(&mut self, mv: Move);

    /// Undo the most recent move or pass.
    fn unmake_move(&mut self);

    /// Pass the turn to the opponent without moving.
    fn make_null_move(&mut self);

    /// The piece standing on `square`, if any.
    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// The side whose turn it is.
    fn side_to_move(&self) -> Color;

    /// Position identity used to key caches.
    ///
    /// Equal positions with the same side to move must hash equally.
    fn hash(&self) -> u64;
}
