//! The request/response boundary over the store and reducer.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use vtt_core::{PlayerJoin, Session, SessionId};

use crate::action::{Action, ActionEnvelope, ActionKind};
use crate::error::{SessionError, SessionResult};
use crate::reducer::{Reduction, apply_action};
use crate::store::{PutMode, SessionStore};

/// A request to provision a new session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSession {
    /// Requested id; one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Session title.
    #[serde(default)]
    pub title: String,
    /// The game master's player id.
    pub owner_id: String,
    /// The game master's display name.
    pub owner_name: String,
    /// The game master's color.
    #[serde(default)]
    pub owner_color: String,
}

/// Serves reads, action submissions and deletes against a [`SessionStore`].
///
/// Every submission is an independent get, reduce, put sequence. Nothing
/// locks the document between the get and the put, so concurrent writers
/// race and the later put wins.
pub struct SessionGateway {
    store: Arc<dyn SessionStore>,
    rng: Mutex<StdRng>,
}

impl SessionGateway {
    /// Create a gateway with an OS-seeded random source.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Create a gateway with a fixed seed, for reproducible dice.
    pub fn with_seed(store: Arc<dyn SessionStore>, seed: u64) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Load a session.
    pub async fn read_session(&self, id: &SessionId) -> SessionResult<Session> {
        Ok(self.store.get(id).await?)
    }

    /// Apply an already-decoded action and persist the result.
    pub async fn submit_action(&self, id: &SessionId, action: Action) -> SessionResult<Session> {
        let kind = action.kind();
        if let Err(err) = action.validate() {
            tracing::warn!(session = %id, action = %kind, error = %err, "rejected action");
            return Err(err);
        }

        let session = self.store.get(id).await.inspect_err(|err| {
            tracing::warn!(session = %id, action = %kind, error = %err, "could not load session");
        })?;

        let Reduction { session, changed } = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            apply_action(session, action, Utc::now(), &mut *rng)
        };

        // A no-op still goes through the put so a session deleted meanwhile
        // is reported as missing.
        self.store
            .put(&session, PutMode::OnlyIfExists)
            .await
            .inspect_err(|err| {
                tracing::warn!(session = %id, action = %kind, error = %err, "could not store session");
            })?;

        tracing::debug!(session = %id, action = %kind, changed, "applied action");
        Ok(session)
    }

    /// Decode a wire envelope and submit it.
    pub async fn submit_envelope(
        &self,
        id: &SessionId,
        envelope: ActionEnvelope,
    ) -> SessionResult<Session> {
        let action = Action::decode(envelope).inspect_err(|err| {
            tracing::warn!(session = %id, error = %err, "rejected action envelope");
        })?;
        self.submit_action(id, action).await
    }

    /// Delete a session. Only its owner may do this.
    pub async fn delete_session(&self, id: &SessionId, requester_id: &str) -> SessionResult<()> {
        let session = self.store.get(id).await?;
        if !session.is_owner(requester_id) {
            tracing::warn!(session = %id, requester = requester_id, "refused delete by non-owner");
            return Err(SessionError::Forbidden {
                session: id.clone(),
                requester: requester_id.to_string(),
            });
        }
        self.store.delete(id).await?;
        tracing::info!(session = %id, "deleted session");
        Ok(())
    }

    /// Provision a new session with the owner already joined.
    pub async fn create_session(&self, request: CreateSession) -> SessionResult<Session> {
        let id = match request.id.as_deref() {
            Some(raw) => SessionId::parse(raw)?,
            None => SessionId::generate(),
        };
        if request.owner_id.trim().is_empty() {
            return Err(SessionError::invalid(
                ActionKind::JoinPlayer,
                "owner id must not be empty",
            ));
        }

        let now = Utc::now();
        let mut session = Session::new(id, request.owner_id.clone(), request.title, now);
        let owner = PlayerJoin {
            id: request.owner_id,
            name: request.owner_name,
            color: request.owner_color,
            character_id: None,
        };
        session.players.push(owner.into_player(now, true));

        self.store
            .put(&session, PutMode::CreateNew)
            .await
            .inspect_err(|err| {
                tracing::warn!(session = %session.id, error = %err, "could not create session");
            })?;
        tracing::info!(session = %session.id, owner = %session.owner_id, "created session");
        Ok(session)
    }
}

impl std::fmt::Debug for SessionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGateway").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn gateway() -> SessionGateway {
        SessionGateway::with_seed(Arc::new(MemoryStore::new()), 42)
    }

    fn create(id: &str) -> CreateSession {
        CreateSession {
            id: Some(id.to_string()),
            title: "Chariot of the Gods".to_string(),
            owner_id: "gm".to_string(),
            owner_name: "Mother".to_string(),
            owner_color: "#0f0".to_string(),
        }
    }

    #[tokio::test]
    async fn create_registers_owner() {
        let gw = gateway();
        let session = gw.create_session(create("s1")).await.unwrap();
        assert_eq!(session.owner_id, "gm");
        assert_eq!(session.players.len(), 1);
        assert!(session.players[0].is_owner);
        assert_eq!(gw.read_session(&session.id).await.unwrap(), session);
    }

    #[tokio::test]
    async fn create_conflict_and_bad_ids() {
        let gw = gateway();
        gw.create_session(create("s1")).await.unwrap();
        assert!(matches!(
            gw.create_session(create("s1")).await,
            Err(SessionError::Conflict(_))
        ));
        assert!(matches!(
            gw.create_session(create("../etc")).await,
            Err(SessionError::InvalidSessionId(_))
        ));
    }

    #[tokio::test]
    async fn create_generates_id() {
        let gw = gateway();
        let mut request = create("unused");
        request.id = None;
        let session = gw.create_session(request).await.unwrap();
        assert!(!session.id.as_str().is_empty());
    }

    #[tokio::test]
    async fn submit_to_missing_session() {
        let gw = gateway();
        let id = SessionId::parse("nowhere").unwrap();
        let err = gw
            .submit_action(
                &id,
                Action::UpdateTitle {
                    title: "x".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::SessionNotFound(_)));
    }
}
