//! Session persistence.
//!
//! A store maps a [`SessionId`] to one JSON document. It knows nothing
//! about actions and offers no read-modify-write atomicity; the only
//! conditional behaviour is the [`PutMode`] existence check.

mod dir;
mod memory;

pub use dir::JsonDirStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use vtt_core::{Session, SessionId};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from a [`SessionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document under the id.
    #[error("no session stored under '{0}'")]
    NotFound(SessionId),

    /// A document already exists under the id.
    #[error("a session is already stored under '{0}'")]
    AlreadyExists(SessionId),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How [`SessionStore::put`] treats the existing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutMode {
    /// Write only if the key is present. Keeps an action from resurrecting
    /// a deleted session.
    OnlyIfExists,
    /// Write only if the key is absent.
    CreateNew,
    /// Write unconditionally.
    Upsert,
}

impl PutMode {
    /// Check the mode against whether the key is currently present.
    pub fn check(self, id: &SessionId, exists: bool) -> StoreResult<()> {
        match (self, exists) {
            (Self::OnlyIfExists, false) => Err(StoreError::NotFound(id.clone())),
            (Self::CreateNew, true) => Err(StoreError::AlreadyExists(id.clone())),
            _ => Ok(()),
        }
    }
}

/// Key-value persistence for session documents.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the document stored under `id`.
    async fn get(&self, id: &SessionId) -> StoreResult<Session>;

    /// Store `session` under its own id.
    async fn put(&self, session: &Session, mode: PutMode) -> StoreResult<()>;

    /// Remove the document stored under `id`.
    async fn delete(&self, id: &SessionId) -> StoreResult<()>;
}
