//! The per-client polling loop.

use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};

use vtt_core::{Session, SessionId};
use vtt_session::Action;

use crate::config::SyncConfig;
use crate::drag::DragState;
use crate::error::{ClientError, ClientResult};
use crate::notice::{Notice, NoticeQueue};
use crate::transport::SessionTransport;

/// Input for a running [`Synchronizer::run`] loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncCommand {
    /// [`Synchronizer::begin_drag`].
    BeginDrag {
        /// The token picked up.
        token_id: String,
    },
    /// [`Synchronizer::drag_to`].
    DragTo {
        /// New horizontal position.
        x: f64,
        /// New vertical position.
        y: f64,
    },
    /// [`Synchronizer::end_drag`].
    EndDrag,
    /// [`Synchronizer::submit`].
    Submit(Action),
}

/// Keeps a local mirror of one session in step with the gateway.
///
/// Each poll overwrites the mirror with the server snapshot, except for the
/// tokens while a drag is in progress (see [`DragState`]). Failed requests
/// become notices and never stop the loop.
pub struct Synchronizer<T> {
    transport: T,
    session_id: SessionId,
    config: SyncConfig,
    view: Option<Session>,
    drag: DragState,
    notices: NoticeQueue,
}

impl<T: SessionTransport> Synchronizer<T> {
    /// Create a synchronizer for `session_id`. Nothing is fetched until the
    /// first poll.
    pub fn new(transport: T, session_id: SessionId, config: SyncConfig) -> Self {
        let notices = NoticeQueue::new(config.notice_capacity);
        Self {
            transport,
            session_id,
            config,
            view: None,
            drag: DragState::Syncing,
            notices,
        }
    }

    /// The session being mirrored.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// The local mirror, once a snapshot has arrived.
    pub fn view(&self) -> Option<&Session> {
        self.view.as_ref()
    }

    /// The drag state.
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Queued notices.
    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    /// Remove and return queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Merge a server snapshot into the mirror.
    pub fn apply_snapshot(&mut self, snapshot: Session) {
        match (&mut self.view, &self.drag) {
            (Some(view), DragState::LocallyOverridden { .. }) => {
                let tokens = std::mem::take(&mut view.tokens);
                *view = snapshot;
                view.tokens = tokens;
            }
            (view, _) => *view = Some(snapshot),
        }
    }

    /// Start dragging a token. Returns false (and changes nothing) if the
    /// token is not in the mirror or another drag is in progress.
    pub fn begin_drag(&mut self, token_id: &str) -> bool {
        if self.drag.is_dragging() {
            return false;
        }
        let known = self
            .view
            .as_ref()
            .is_some_and(|view| view.token(token_id).is_some());
        if known {
            self.drag = DragState::LocallyOverridden {
                token_id: token_id.to_string(),
            };
        }
        known
    }

    /// Move the dragged token in the mirror. Nothing is sent.
    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        let DragState::LocallyOverridden { token_id } = &self.drag else {
            return false;
        };
        match self.view.as_mut().and_then(|view| view.token_mut(token_id)) {
            Some(token) => {
                token.x = x;
                token.y = y;
                true
            }
            None => false,
        }
    }

    /// Finish the drag: submit the full local token collection and return
    /// to [`DragState::Syncing`], whether or not the submit succeeds.
    pub async fn end_drag(&mut self) -> ClientResult<()> {
        if !self.drag.is_dragging() {
            return Ok(());
        }
        let tokens = self
            .view
            .as_ref()
            .map(|view| view.tokens.clone())
            .unwrap_or_default();
        self.drag = DragState::Syncing;
        self.submit(Action::UpdateTokens { tokens }).await.map(|_| ())
    }

    /// Submit an action and apply the returned session. Failures are also
    /// queued as notices.
    pub async fn submit(&mut self, action: Action) -> ClientResult<Session> {
        let kind = action.kind();
        match self.transport.submit(&self.session_id, &action).await {
            Ok(session) => {
                self.apply_snapshot(session.clone());
                Ok(session)
            }
            Err(err) => {
                tracing::warn!(session = %self.session_id, action = %kind, error = %err, "submit failed");
                self.notices
                    .push(Notice::warning(format!("{kind} failed: {err}")));
                Err(err)
            }
        }
    }

    /// Fetch the session once and merge it into the mirror.
    pub async fn poll_once(&mut self) -> ClientResult<()> {
        match self.transport.read_session(&self.session_id).await {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(session = %self.session_id, error = %err, "poll failed");
                self.notices.push(Notice::warning(format!("sync failed: {err}")));
                Err(err)
            }
        }
    }

    /// Apply one command. Failures are queued as notices.
    pub async fn handle(&mut self, command: SyncCommand) {
        match command {
            SyncCommand::BeginDrag { token_id } => {
                if !self.begin_drag(&token_id) {
                    tracing::debug!(session = %self.session_id, token = %token_id, "drag refused");
                }
            }
            SyncCommand::DragTo { x, y } => {
                self.drag_to(x, y);
            }
            SyncCommand::EndDrag => {
                let _ = self.end_drag().await;
            }
            SyncCommand::Submit(action) => {
                let _ = self.submit(action).await;
            }
        }
    }

    /// Poll on the configured interval and apply `commands` as they arrive,
    /// until `shutdown` turns true or its sender is dropped. A closed
    /// command channel only stops command handling. `on_update` runs after
    /// every poll and every command, successful or not.
    pub async fn run<F>(
        &mut self,
        mut commands: mpsc::Receiver<SyncCommand>,
        mut shutdown: watch::Receiver<bool>,
        mut on_update: F,
    ) where
        F: FnMut(&mut Self),
    {
        let mut ticker = time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;
        tracing::debug!(session = %self.session_id, interval = ?self.config.poll_interval, "sync loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    // Errors are already queued as notices.
                    let _ = self.poll_once().await;
                    on_update(self);
                }
                command = commands.recv(), if commands_open => match command {
                    Some(command) => {
                        self.handle(command).await;
                        on_update(self);
                    }
                    None => commands_open = false,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!(session = %self.session_id, "sync loop stopped");
    }

    /// The mirror, or [`ClientError::NoSession`] before the first snapshot.
    pub fn require_view(&self) -> ClientResult<&Session> {
        self.view.as_ref().ok_or(ClientError::NoSession)
    }
}

impl<T> std::fmt::Debug for Synchronizer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("session_id", &self.session_id)
            .field("drag", &self.drag)
            .field("notices", &self.notices.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use vtt_core::{Token, TokenKind};
    use vtt_dice::RollRequest;
    use vtt_session::{CreateSession, MemoryStore, SessionGateway};

    async fn gateway_with_session(id: &str) -> (Arc<SessionGateway>, SessionId) {
        let gateway = Arc::new(SessionGateway::with_seed(Arc::new(MemoryStore::new()), 11));
        let session = SessionGateway::create_session(
            &gateway,
            CreateSession {
                id: Some(id.to_string()),
                title: "Sync".to_string(),
                owner_id: "gm".to_string(),
                owner_name: "GM".to_string(),
                owner_color: String::new(),
            },
        )
        .await
        .unwrap();
        gateway
            .submit_action(
                &session.id,
                Action::UpdateTokens {
                    tokens: vec![
                        Token::new("t1", TokenKind::Player, "Ripley", 0.0, 0.0),
                        Token::new("t2", TokenKind::Npc, "Ash", 5.0, 5.0),
                    ],
                },
            )
            .await
            .unwrap();
        (gateway, session.id)
    }

    fn roll(player: &str) -> Action {
        Action::RollDice(RollRequest {
            player_id: player.to_string(),
            player_name: player.to_string(),
            attribute: None,
            skill: None,
            base_dice: 2,
            stress_dice: 1,
            modifier: 0,
        })
    }

    #[tokio::test]
    async fn poll_fills_view() {
        let (gateway, id) = gateway_with_session("poll").await;
        let mut sync = Synchronizer::new(gateway, id, SyncConfig::default());
        assert!(sync.view().is_none());
        assert!(matches!(sync.require_view(), Err(ClientError::NoSession)));
        sync.poll_once().await.unwrap();
        assert_eq!(sync.view().unwrap().tokens.len(), 2);
    }

    #[tokio::test]
    async fn drag_guards_tokens_but_not_other_fields() {
        let (gateway, id) = gateway_with_session("drag").await;
        let mut sync = Synchronizer::new(gateway.clone(), id.clone(), SyncConfig::default());
        sync.poll_once().await.unwrap();

        assert!(!sync.begin_drag("missing"));
        assert_eq!(sync.drag_state(), &DragState::Syncing);

        assert!(sync.begin_drag("t1"));
        assert_eq!(sync.drag_state().dragged_token(), Some("t1"));
        assert!(!sync.begin_drag("t2"));
        assert!(sync.drag_to(40.0, 50.0));

        // Another client moves t2 and rolls while we drag.
        gateway
            .submit_action(
                &id,
                Action::UpsertToken(Token::new("t2", TokenKind::Npc, "Ash", 99.0, 99.0)),
            )
            .await
            .unwrap();
        gateway.submit_action(&id, roll("p2")).await.unwrap();

        sync.poll_once().await.unwrap();
        let view = sync.view().unwrap();
        assert_eq!(view.dice_rolls.len(), 1);
        assert_eq!(view.token("t1").unwrap().x, 40.0);
        assert_eq!(view.token("t2").unwrap().x, 5.0);

        sync.end_drag().await.unwrap();
        assert_eq!(sync.drag_state(), &DragState::Syncing);

        // The full local collection was submitted, so t2's remote move is
        // overwritten (last writer wins).
        let stored = gateway.read_session(&id).await.unwrap();
        assert_eq!(stored.token("t1").unwrap().x, 40.0);
        assert_eq!(stored.token("t2").unwrap().x, 5.0);

        gateway
            .submit_action(
                &id,
                Action::UpsertToken(Token::new("t1", TokenKind::Player, "Ripley", 1.0, 1.0)),
            )
            .await
            .unwrap();
        sync.poll_once().await.unwrap();
        assert_eq!(sync.view().unwrap().token("t1").unwrap().x, 1.0);
    }

    #[tokio::test]
    async fn end_drag_failure_still_resumes_syncing() {
        let (gateway, id) = gateway_with_session("vanish").await;
        let mut sync = Synchronizer::new(gateway.clone(), id.clone(), SyncConfig::default());
        sync.poll_once().await.unwrap();
        assert!(sync.begin_drag("t2"));

        SessionGateway::delete_session(&gateway, &id, "gm").await.unwrap();
        let err = sync.end_drag().await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(sync.drag_state(), &DragState::Syncing);
        assert_eq!(sync.notices().len(), 1);
    }

    #[tokio::test]
    async fn failed_polls_become_bounded_notices() {
        let gateway = Arc::new(SessionGateway::with_seed(Arc::new(MemoryStore::new()), 1));
        let id = SessionId::parse("nowhere").unwrap();
        let config = SyncConfig::default().with_notice_capacity(3);
        let mut sync = Synchronizer::new(gateway, id, config);
        for _ in 0..5 {
            assert!(sync.poll_once().await.is_err());
        }
        assert_eq!(sync.notices().len(), 3);
        let notices = sync.take_notices();
        assert!(notices[0].message.starts_with("sync failed"));
        assert!(sync.notices().is_empty());
    }

    #[tokio::test]
    async fn run_polls_until_shutdown() {
        let (gateway, id) = gateway_with_session("loop").await;
        let config = SyncConfig::default().with_poll_interval(Duration::from_millis(5));
        let mut sync = Synchronizer::new(gateway, id, config);
        let (tx, rx) = watch::channel(false);
        let (_commands, command_rx) = mpsc::channel(1);

        let mut polls = 0;
        sync.run(command_rx, rx, |_| {
            polls += 1;
            if polls == 3 {
                let _ = tx.send(true);
            }
        })
        .await;

        assert_eq!(polls, 3);
        assert!(sync.view().is_some());
    }

    #[tokio::test]
    async fn run_stops_when_sender_dropped() {
        let (gateway, id) = gateway_with_session("dropped").await;
        let config = SyncConfig::default().with_poll_interval(Duration::from_secs(3600));
        let mut sync = Synchronizer::new(gateway, id, config);
        let (tx, rx) = watch::channel(false);
        let (_commands, command_rx) = mpsc::channel(1);
        drop(tx);

        time::timeout(Duration::from_secs(5), sync.run(command_rx, rx, |_| {}))
            .await
            .unwrap();
    }

    /// What the loop looked like after one update.
    #[derive(Debug, Clone)]
    struct Frame {
        dragging: bool,
        title: String,
        t1_x: Option<f64>,
    }

    async fn wait_for<F>(frames: &std::sync::Mutex<Vec<Frame>>, what: &str, pred: F) -> Frame
    where
        F: Fn(&Frame) -> bool,
    {
        time::timeout(Duration::from_secs(5), async {
            loop {
                let found = frames.lock().unwrap().iter().rev().find(|f| pred(f)).cloned();
                if let Some(frame) = found {
                    return frame;
                }
                time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
    }

    #[tokio::test]
    async fn drag_during_run_survives_polls() {
        let (gateway, id) = gateway_with_session("live").await;
        let config = SyncConfig::default().with_poll_interval(Duration::from_millis(5));
        let mut sync = Synchronizer::new(gateway.clone(), id.clone(), config);
        let (stop_tx, stop_rx) = watch::channel(false);
        let (commands, command_rx) = mpsc::channel(8);

        let frames = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = frames.clone();
        let running = tokio::spawn(async move {
            sync.run(command_rx, stop_rx, move |sync| {
                if let Some(view) = sync.view() {
                    recorder.lock().unwrap().push(Frame {
                        dragging: sync.drag_state().is_dragging(),
                        title: view.title.clone(),
                        t1_x: view.token("t1").map(|t| t.x),
                    });
                }
            })
            .await;
            sync
        });

        wait_for(&frames, "first poll", |_| true).await;
        commands
            .send(SyncCommand::BeginDrag {
                token_id: "t1".to_string(),
            })
            .await
            .unwrap();
        commands
            .send(SyncCommand::DragTo { x: 500.0, y: 500.0 })
            .await
            .unwrap();
        wait_for(&frames, "drag applied", |f| f.dragging && f.t1_x == Some(500.0)).await;

        // Another client renames the session and moves t1 mid-drag.
        gateway
            .submit_action(
                &id,
                Action::UpsertToken(Token::new("t1", TokenKind::Player, "Ripley", 1.0, 1.0)),
            )
            .await
            .unwrap();
        gateway
            .submit_action(
                &id,
                Action::UpdateTitle {
                    title: "Renamed".to_string(),
                },
            )
            .await
            .unwrap();

        let mid_drag = wait_for(&frames, "poll after rename", |f| f.title == "Renamed").await;
        assert!(mid_drag.dragging);
        assert_eq!(mid_drag.t1_x, Some(500.0));

        commands.send(SyncCommand::EndDrag).await.unwrap();
        wait_for(&frames, "drag end", |f| !f.dragging && f.title == "Renamed").await;

        let _ = stop_tx.send(true);
        let sync = running.await.unwrap();
        assert_eq!(sync.drag_state(), &DragState::Syncing);
        let stored = gateway.read_session(&id).await.unwrap();
        assert_eq!(stored.token("t1").unwrap().x, 500.0);
        assert_eq!(stored.title, "Renamed");
    }

    #[tokio::test]
    async fn run_submits_commands() {
        let (gateway, id) = gateway_with_session("cmd").await;
        let config = SyncConfig::default().with_poll_interval(Duration::from_secs(3600));
        let mut sync = Synchronizer::new(gateway.clone(), id.clone(), config);
        let (stop_tx, stop_rx) = watch::channel(false);
        let (commands, command_rx) = mpsc::channel(4);

        commands.send(SyncCommand::Submit(roll("p1"))).await.unwrap();
        drop(commands);

        let mut updates = 0;
        sync.run(command_rx, stop_rx, |sync| {
            updates += 1;
            if sync.view().is_some_and(|v| v.dice_rolls.len() == 1) {
                let _ = stop_tx.send(true);
            }
        })
        .await;

        assert!(updates >= 1);
        assert_eq!(gateway.read_session(&id).await.unwrap().dice_rolls.len(), 1);
    }
}
