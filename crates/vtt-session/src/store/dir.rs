use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex as AsyncMutex;

use vtt_core::{Session, SessionId};

use super::{PutMode, SessionStore, StoreError, StoreResult};

type IdLocks = HashMap<SessionId, Arc<AsyncMutex<()>>>;

/// A store keeping one `<id>.json` file per session in a directory.
///
/// Writes go to a temporary file next to the target and are renamed into
/// place, so readers never see a half-written document.
///
/// The existence check of a [`PutMode`] and the write that follows it, and
/// every delete, run under a per-id lock. A put racing a delete therefore
/// either lands before the delete or fails with `NotFound`. The locks live
/// in this value and its clones; other processes sharing the directory are
/// not excluded.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
    locks: Arc<Mutex<IdLocks>>,
}

impl JsonDirStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = %dir.display(), "opened session directory");
        Ok(Self {
            dir,
            locks: Arc::default(),
        })
    }

    /// The directory holding the documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// The write lock for one id.
    fn lock_for(&self, id: &SessionId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(id.clone()).or_default().clone()
    }

    fn tmp_path_for(&self, id: &SessionId) -> PathBuf {
        self.dir
            .join(format!(".{id}.{}.tmp", uuid::Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl SessionStore for JsonDirStore {
    async fn get(&self, id: &SessionId) -> StoreResult<Session> {
        let bytes = match fs::read(self.path_for(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn put(&self, session: &Session, mode: PutMode) -> StoreResult<()> {
        let lock = self.lock_for(&session.id);
        let _guard = lock.lock().await;

        let path = self.path_for(&session.id);
        let exists = fs::try_exists(&path).await?;
        mode.check(&session.id, exists)?;

        let bytes = serde_json::to_vec_pretty(session)?;
        let tmp = self.tmp_path_for(&session.id);
        fs::write(&tmp, &bytes).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        tracing::trace!(session = %session.id, bytes = bytes.len(), "wrote session");
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> StoreResult<()> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;
        match fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.clone())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vtt_core::{Token, TokenKind};

    fn session(id: &str) -> Session {
        Session::new(SessionId::parse(id).unwrap(), "gm", "Test", Utc::now())
    }

    #[tokio::test]
    async fn roundtrip_through_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(tmp.path()).await.unwrap();
        let mut s = session("s1");
        s.tokens
            .push(Token::new("t1", TokenKind::Player, "Ripley", 10.0, 20.0));

        store.put(&s, PutMode::CreateNew).await.unwrap();
        assert!(tmp.path().join("s1.json").exists());
        assert_eq!(store.get(&s.id).await.unwrap(), s);
    }

    #[tokio::test]
    async fn leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(tmp.path()).await.unwrap();
        let s = session("s1");
        store.put(&s, PutMode::Upsert).await.unwrap();
        store.put(&s, PutMode::OnlyIfExists).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["s1.json".to_string()]);
    }

    #[tokio::test]
    async fn missing_and_existing_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(tmp.path().join("nested")).await.unwrap();
        let s = session("s2");

        assert!(matches!(
            store.get(&s.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.put(&s, PutMode::OnlyIfExists).await,
            Err(StoreError::NotFound(_))
        ));
        store.put(&s, PutMode::CreateNew).await.unwrap();
        assert!(matches!(
            store.put(&s, PutMode::CreateNew).await,
            Err(StoreError::AlreadyExists(_))
        ));
        store.delete(&s.id).await.unwrap();
        assert!(matches!(
            store.delete(&s.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn corrupt_document_is_a_serialization_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(tmp.path()).await.unwrap();
        std::fs::write(tmp.path().join("bad.json"), b"{not json").unwrap();
        let id = SessionId::parse("bad").unwrap();
        assert!(matches!(
            store.get(&id).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_admit_exactly_one() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(tmp.path()).await.unwrap();

        for round in 0..10 {
            let s = session(&format!("race-{round}"));
            let attempts: Vec<_> = (0..8)
                .map(|_| {
                    let store = store.clone();
                    let s = s.clone();
                    tokio::spawn(async move { store.put(&s, PutMode::CreateNew).await })
                })
                .collect();

            let mut created = 0;
            for attempt in attempts {
                match attempt.await.unwrap() {
                    Ok(()) => created += 1,
                    Err(StoreError::AlreadyExists(_)) => {}
                    Err(e) => panic!("round {round}: {e}"),
                }
            }
            assert_eq!(created, 1, "round {round}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn put_racing_delete_never_resurrects() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(tmp.path()).await.unwrap();

        for round in 0..30 {
            let s = session(&format!("gone-{round}"));
            store.put(&s, PutMode::CreateNew).await.unwrap();

            let writer = {
                let store = store.clone();
                let s = s.clone();
                tokio::spawn(async move { store.put(&s, PutMode::OnlyIfExists).await })
            };
            let deleter = {
                let store = store.clone();
                let id = s.id.clone();
                tokio::spawn(async move { store.delete(&id).await })
            };

            let written = writer.await.unwrap();
            deleter.await.unwrap().unwrap();
            assert!(
                matches!(written, Ok(()) | Err(StoreError::NotFound(_))),
                "round {round}: {written:?}"
            );
            assert!(
                matches!(store.get(&s.id).await, Err(StoreError::NotFound(_))),
                "round {round}: session came back after delete"
            );
        }
    }
}
