//! Error types for the dice engine.

/// Errors that can occur while building or rerolling dice pools.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    /// A pool requested more dice than allowed.
    #[error("pool of {count} dice exceeds the maximum of {max}")]
    PoolTooLarge {
        /// Requested number of dice.
        count: u32,
        /// Maximum permitted.
        max: u32,
    },

    /// A roll requested no dice at all.
    #[error("a roll needs at least one die")]
    EmptyPool,

    /// The roll has already been pushed.
    #[error("roll '{0}' has already been pushed")]
    AlreadyPushed(String),
}

/// Convenience result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;
