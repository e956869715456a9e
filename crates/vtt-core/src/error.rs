/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or validating core types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The session id was empty.
    #[error("session id must not be empty")]
    EmptySessionId,

    /// The session id exceeded the maximum length.
    #[error("session id must be at most {max} chars, got {found}")]
    SessionIdTooLong {
        /// Maximum permitted length.
        max: usize,
        /// Length of the rejected id.
        found: usize,
    },

    /// The session id contained a character outside the permitted alphabet.
    #[error("invalid character '{ch}' at position {index} in session id")]
    InvalidSessionIdChar {
        /// The offending character.
        ch: char,
        /// Its position in the id.
        index: usize,
    },
}
