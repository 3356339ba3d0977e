//! Static position evaluation collaborator.

use crate::board::Board;
use crate::lawyer::Lawyer;
use crate::piece_kind::PieceKind;

/// Scores quiet positions.
pub trait Evaluator<B: Board> {
    /// Score the position from the side to move's point of view.
    ///
    /// Scores are zero-sum: the same position seen by the opponent scores
    /// the negation.
    fn evaluate(&self, board: &B, lawyer: &dyn Lawyer<B>) -> i32;

    /// Material value of a piece kind, used for capture ordering.
    fn piece_value(&self, kind: PieceKind) -> i32 {
        kind.value()
    }
}
