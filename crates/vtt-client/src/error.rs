//! Client error types.

use thiserror::Error;

use vtt_core::CoreError;
use vtt_session::SessionError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors seen by a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The in-process gateway rejected the request.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The server answered with an error body.
    #[error("{code} ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error code from the body, e.g. `SessionNotFound`.
        code: String,
        /// Error message from the body.
        message: String,
    },

    /// The request did not complete (connection, timeout, bad body).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A session id was malformed.
    #[error("invalid session id: {0}")]
    InvalidSessionId(#[from] CoreError),

    /// No session has been loaded yet.
    #[error("no session loaded")]
    NoSession,
}

impl ClientError {
    /// The wire error code, when the failure came from the gateway.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Session(err) => Some(err.code()),
            Self::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether the session does not exist (or no longer exists).
    pub fn is_not_found(&self) -> bool {
        self.code() == Some("SessionNotFound")
    }
}
