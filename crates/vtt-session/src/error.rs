//! Error types for the session engine.

use thiserror::Error;

use vtt_core::{CoreError, SessionId};

use crate::action::ActionKind;
use crate::store::StoreError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by the gateway.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session is stored under the id.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The action tag is outside the known vocabulary.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The payload does not fit the action kind.
    #[error("invalid payload for {action}: {reason}")]
    InvalidPayload {
        /// The action kind the payload was declared for.
        action: ActionKind,
        /// What is wrong with it.
        reason: String,
    },

    /// The caller may not perform this operation.
    #[error("'{requester}' is not the owner of session {session}")]
    Forbidden {
        /// The session.
        session: SessionId,
        /// Who asked.
        requester: String,
    },

    /// A session with the requested id already exists.
    #[error("session already exists: {0}")]
    Conflict(SessionId),

    /// The session id is malformed.
    #[error("invalid session id: {0}")]
    InvalidSessionId(#[from] CoreError),

    /// The store failed to read or write.
    #[error("persistence failure: {0}")]
    Persistence(#[source] StoreError),
}

impl SessionError {
    /// Shorthand for [`SessionError::InvalidPayload`].
    pub fn invalid(action: ActionKind, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            action,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "SessionNotFound",
            Self::UnknownAction(_) => "UnknownAction",
            Self::InvalidPayload { .. } => "InvalidPayload",
            Self::Forbidden { .. } => "Forbidden",
            Self::Conflict(_) => "Conflict",
            Self::InvalidSessionId(_) => "InvalidSessionId",
            Self::Persistence(_) => "PersistenceFailure",
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::SessionNotFound(id),
            StoreError::AlreadyExists(id) => Self::Conflict(id),
            other => Self::Persistence(other),
        }
    }
}
