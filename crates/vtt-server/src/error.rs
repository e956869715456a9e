//! Mapping session errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use vtt_session::SessionError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `SessionNotFound`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// An error returned by a handler.
#[derive(Debug)]
pub enum ApiError {
    /// A gateway error.
    Session(SessionError),
    /// The request body or query could not be parsed at all.
    BadRequest(String),
}

impl ApiError {
    /// The HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Session(err) => match err {
                SessionError::SessionNotFound(_) => StatusCode::NOT_FOUND,
                SessionError::UnknownAction(_)
                | SessionError::InvalidPayload { .. }
                | SessionError::InvalidSessionId(_) => StatusCode::BAD_REQUEST,
                SessionError::Forbidden { .. } => StatusCode::FORBIDDEN,
                SessionError::Conflict(_) => StatusCode::CONFLICT,
                SessionError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The response body for this error.
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::Session(err) => ErrorBody {
                error: err.code().to_string(),
                message: err.to_string(),
            },
            Self::BadRequest(message) => ErrorBody {
                error: "InvalidPayload".to_string(),
                message: message.clone(),
            },
        }
    }
}

impl<E: Into<SessionError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self::Session(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = ?self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
