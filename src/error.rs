use thiserror::Error;

/// Convenient result alias for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors raised by a state's transition that the chain refuses to follow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("State {state} returned None from next_state but is not an end state. Unexpected transition.")]
    UnexpectedEnd { state: String },

    #[error("Transition from {from} to state {target} not possible: {target} has not been added to the chain.")]
    NotAdded { from: String, target: String },
}

/// Errors surfaced by `Chain` to its direct caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Initial state not set. Please set the initial state before proceeding.")]
    InitialStateNotSet,

    #[error("Chain has already completed execution. Call reset() before running it again.")]
    ChainCompleted,

    #[error("State {kind} not found.")]
    StateNotFound { kind: String },

    #[error("State transition error: {0}")]
    Transition(#[from] TransitionError),

    #[error("Step limit of {limit} exceeded before reaching an end state")]
    StepLimitExceeded { limit: u64 },
}

impl ChainError {
    /// Whether the caller can fix the chain's situation and retry
    /// (set the initial state, reset, or register the missing kind).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChainError::InitialStateNotSet
                | ChainError::ChainCompleted
                | ChainError::StateNotFound { .. }
        )
    }

    pub fn is_transition_error(&self) -> bool {
        matches!(self, ChainError::Transition(_))
    }
}
