//! Error types for parsing coordinate text.

/// Errors from parsing squares and moves written in coordinate notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text is not a square such as `e0` or `h9`.
    #[error("invalid square: '{found}'")]
    InvalidSquare {
        /// The offending text.
        found: String,
    },
    /// The text is not a move such as `h2e2`.
    #[error("invalid move: '{found}'")]
    InvalidMove {
        /// The offending text.
        found: String,
    },
}
