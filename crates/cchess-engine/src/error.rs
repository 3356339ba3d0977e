//! Engine error types.

/// Misuse of the engine's search state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// `think` was called while a finished result is still waiting to be
    /// collected with `get_move`.
    #[error("a finished search is waiting for get_move()")]
    ResultPending,
}
