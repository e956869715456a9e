use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use vtt_core::{Session, SessionId};

use super::{PutMode, SessionStore, StoreError, StoreResult};

/// An in-memory store.
///
/// Documents are held as serialized JSON, so readers always get an
/// independent copy and a round trip through the store behaves like the
/// on-disk one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<SessionId, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, id: &SessionId) -> StoreResult<Session> {
        let documents = self.documents.read().await;
        let bytes = documents
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(serde_json::from_slice(bytes)?)
    }

    async fn put(&self, session: &Session, mode: PutMode) -> StoreResult<()> {
        let bytes = serde_json::to_vec(session)?;
        let mut documents = self.documents.write().await;
        mode.check(&session.id, documents.contains_key(&session.id))?;
        documents.insert(session.id.clone(), bytes);
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> StoreResult<()> {
        self.documents
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}
