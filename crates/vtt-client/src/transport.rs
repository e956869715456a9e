//! How a client reaches the gateway.

use std::sync::Arc;

use async_trait::async_trait;

use vtt_core::{Session, SessionId};
use vtt_session::{Action, CreateSession, SessionGateway};

use crate::error::ClientResult;

/// The gateway operations a client needs.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Fetch the current session.
    async fn read_session(&self, id: &SessionId) -> ClientResult<Session>;

    /// Submit one action and get the resulting session.
    async fn submit(&self, id: &SessionId, action: &Action) -> ClientResult<Session>;

    /// Delete a session as `requester_id`.
    async fn delete_session(&self, id: &SessionId, requester_id: &str) -> ClientResult<()>;

    /// Provision a new session.
    async fn create_session(&self, request: &CreateSession) -> ClientResult<Session>;
}

/// Talk to a gateway in the same process.
#[async_trait]
impl SessionTransport for SessionGateway {
    async fn read_session(&self, id: &SessionId) -> ClientResult<Session> {
        Ok(SessionGateway::read_session(self, id).await?)
    }

    async fn submit(&self, id: &SessionId, action: &Action) -> ClientResult<Session> {
        Ok(self.submit_action(id, action.clone()).await?)
    }

    async fn delete_session(&self, id: &SessionId, requester_id: &str) -> ClientResult<()> {
        Ok(SessionGateway::delete_session(self, id, requester_id).await?)
    }

    async fn create_session(&self, request: &CreateSession) -> ClientResult<Session> {
        Ok(SessionGateway::create_session(self, request.clone()).await?)
    }
}

#[async_trait]
impl<T: SessionTransport + ?Sized> SessionTransport for Arc<T> {
    async fn read_session(&self, id: &SessionId) -> ClientResult<Session> {
        (**self).read_session(id).await
    }

    async fn submit(&self, id: &SessionId, action: &Action) -> ClientResult<Session> {
        (**self).submit(id, action).await
    }

    async fn delete_session(&self, id: &SessionId, requester_id: &str) -> ClientResult<()> {
        (**self).delete_session(id, requester_id).await
    }

    async fn create_session(&self, request: &CreateSession) -> ClientResult<Session> {
        (**self).create_session(request).await
    }
}
