//! The closed vocabulary of session mutations.
//!
//! On the wire an action is `{"action": "<KIND>", "payload": {...}}`.
//! [`Action::decode`] separates an unknown kind from a known kind with a
//! malformed payload, and [`Action::validate`] applies the boundary checks
//! the reducer relies on.

use serde::{Deserialize, Serialize};

use vtt_core::collection::first_duplicate_id;
use vtt_core::{CharacterSheet, Drawing, Npc, PlayerJoin, PlayerPatch, Scene, ScenePatch, Token, Track};
use vtt_dice::RollRequest;

use crate::error::{SessionError, SessionResult};

/// A request to mutate a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    /// Replace all tokens.
    UpdateTokens {
        /// The complete new token collection.
        tokens: Vec<Token>,
    },
    /// Roll dice and log the result.
    RollDice(RollRequest),
    /// Shallow-merge fields into the active scene.
    UpdateScene(ScenePatch),
    /// Register a player, or refresh their presence.
    JoinPlayer(PlayerJoin),
    /// Shallow-merge fields into a player.
    UpdatePlayer {
        /// Target player.
        player_id: String,
        /// Fields to change.
        updates: PlayerPatch,
    },
    /// Add a character sheet unless one with the id exists.
    AddCharacter(CharacterSheet),
    /// Replace a character sheet, adding it if missing.
    UpdateCharacter(CharacterSheet),
    /// Add an NPC unless one with the id exists.
    AddNpc(Npc),
    /// Replace an existing NPC.
    UpdateNpc(Npc),
    /// Remove an NPC and its token.
    DeleteNpc {
        /// The NPC (and NPC token) id.
        npc_id: String,
    },
    /// Rename the session.
    UpdateTitle {
        /// New title.
        title: String,
    },
    /// Change or stop the ambient track.
    UpdateMusic {
        /// New track, or `None` to stop playback.
        track: Option<Track>,
    },
    /// Replace the shared notes.
    UpdateSharedNotes {
        /// New notes.
        notes: String,
    },
    /// Replace all drawings.
    UpdateDrawings {
        /// The complete new drawing collection.
        drawings: Vec<Drawing>,
    },
    /// Save a scene to the library.
    SaveSceneToLib {
        /// The scene; an id is assigned if it has none.
        scene: Scene,
    },
    /// Make a library scene the active scene.
    LoadSceneFromLib {
        /// Library id of the scene.
        scene_id: String,
    },
    /// Replace the status tags of a token.
    UpdateTokenStatus {
        /// Target token.
        token_id: String,
        /// New status tags.
        status: Vec<String>,
    },
    /// Push a roll.
    PushRoll {
        /// The roll to push.
        roll_id: String,
    },
    /// Replace a single token by id, adding it if missing.
    UpsertToken(Token),
}

/// The tag of an [`Action`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// `UPDATE_TOKENS`
    UpdateTokens,
    /// `ROLL_DICE`
    RollDice,
    /// `UPDATE_SCENE`
    UpdateScene,
    /// `JOIN_PLAYER`
    JoinPlayer,
    /// `UPDATE_PLAYER`
    UpdatePlayer,
    /// `ADD_CHARACTER`
    AddCharacter,
    /// `UPDATE_CHARACTER`
    UpdateCharacter,
    /// `ADD_NPC`
    AddNpc,
    /// `UPDATE_NPC`
    UpdateNpc,
    /// `DELETE_NPC`
    DeleteNpc,
    /// `UPDATE_TITLE`
    UpdateTitle,
    /// `UPDATE_MUSIC`
    UpdateMusic,
    /// `UPDATE_SHARED_NOTES`
    UpdateSharedNotes,
    /// `UPDATE_DRAWINGS`
    UpdateDrawings,
    /// `SAVE_SCENE_TO_LIB`
    SaveSceneToLib,
    /// `LOAD_SCENE_FROM_LIB`
    LoadSceneFromLib,
    /// `UPDATE_TOKEN_STATUS`
    UpdateTokenStatus,
    /// `PUSH_ROLL`
    PushRoll,
    /// `UPSERT_TOKEN`
    UpsertToken,
}

impl ActionKind {
    /// Every kind, in declaration order.
    pub const ALL: [ActionKind; 19] = [
        Self::UpdateTokens,
        Self::RollDice,
        Self::UpdateScene,
        Self::JoinPlayer,
        Self::UpdatePlayer,
        Self::AddCharacter,
        Self::UpdateCharacter,
        Self::AddNpc,
        Self::UpdateNpc,
        Self::DeleteNpc,
        Self::UpdateTitle,
        Self::UpdateMusic,
        Self::UpdateSharedNotes,
        Self::UpdateDrawings,
        Self::SaveSceneToLib,
        Self::LoadSceneFromLib,
        Self::UpdateTokenStatus,
        Self::PushRoll,
        Self::UpsertToken,
    ];

    /// The wire tag.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::UpdateTokens => "UPDATE_TOKENS",
            Self::RollDice => "ROLL_DICE",
            Self::UpdateScene => "UPDATE_SCENE",
            Self::JoinPlayer => "JOIN_PLAYER",
            Self::UpdatePlayer => "UPDATE_PLAYER",
            Self::AddCharacter => "ADD_CHARACTER",
            Self::UpdateCharacter => "UPDATE_CHARACTER",
            Self::AddNpc => "ADD_NPC",
            Self::UpdateNpc => "UPDATE_NPC",
            Self::DeleteNpc => "DELETE_NPC",
            Self::UpdateTitle => "UPDATE_TITLE",
            Self::UpdateMusic => "UPDATE_MUSIC",
            Self::UpdateSharedNotes => "UPDATE_SHARED_NOTES",
            Self::UpdateDrawings => "UPDATE_DRAWINGS",
            Self::SaveSceneToLib => "SAVE_SCENE_TO_LIB",
            Self::LoadSceneFromLib => "LOAD_SCENE_FROM_LIB",
            Self::UpdateTokenStatus => "UPDATE_TOKEN_STATUS",
            Self::PushRoll => "PUSH_ROLL",
            Self::UpsertToken => "UPSERT_TOKEN",
        }
    }

    /// Look up a kind by its wire tag (exact match).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_tag() == tag)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// An action as received on the wire, before its kind is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    /// The action tag.
    pub action: String,
    /// The kind-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Action {
    /// The action's kind.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::UpdateTokens { .. } => ActionKind::UpdateTokens,
            Self::RollDice(_) => ActionKind::RollDice,
            Self::UpdateScene(_) => ActionKind::UpdateScene,
            Self::JoinPlayer(_) => ActionKind::JoinPlayer,
            Self::UpdatePlayer { .. } => ActionKind::UpdatePlayer,
            Self::AddCharacter(_) => ActionKind::AddCharacter,
            Self::UpdateCharacter(_) => ActionKind::UpdateCharacter,
            Self::AddNpc(_) => ActionKind::AddNpc,
            Self::UpdateNpc(_) => ActionKind::UpdateNpc,
            Self::DeleteNpc { .. } => ActionKind::DeleteNpc,
            Self::UpdateTitle { .. } => ActionKind::UpdateTitle,
            Self::UpdateMusic { .. } => ActionKind::UpdateMusic,
            Self::UpdateSharedNotes { .. } => ActionKind::UpdateSharedNotes,
            Self::UpdateDrawings { .. } => ActionKind::UpdateDrawings,
            Self::SaveSceneToLib { .. } => ActionKind::SaveSceneToLib,
            Self::LoadSceneFromLib { .. } => ActionKind::LoadSceneFromLib,
            Self::UpdateTokenStatus { .. } => ActionKind::UpdateTokenStatus,
            Self::PushRoll { .. } => ActionKind::PushRoll,
            Self::UpsertToken(_) => ActionKind::UpsertToken,
        }
    }

    /// Decode and validate an envelope.
    ///
    /// An unknown tag yields [`SessionError::UnknownAction`]; a payload that
    /// does not fit the tag, or fails validation, yields
    /// [`SessionError::InvalidPayload`].
    pub fn decode(envelope: ActionEnvelope) -> SessionResult<Self> {
        let kind = ActionKind::from_tag(&envelope.action)
            .ok_or_else(|| SessionError::UnknownAction(envelope.action.clone()))?;

        let tagged = serde_json::json!({
            "action": envelope.action,
            "payload": envelope.payload,
        });
        let action: Action =
            serde_json::from_value(tagged).map_err(|e| SessionError::invalid(kind, e.to_string()))?;
        action.validate()?;
        Ok(action)
    }

    /// Encode as a wire envelope.
    pub fn to_envelope(&self) -> SessionResult<ActionEnvelope> {
        let invalid = |e: serde_json::Error| SessionError::invalid(self.kind(), e.to_string());
        let value = serde_json::to_value(self).map_err(invalid)?;
        serde_json::from_value(value).map_err(invalid)
    }

    /// Boundary checks the reducer relies on.
    pub fn validate(&self) -> SessionResult<()> {
        let kind = self.kind();
        match self {
            Self::UpdateTokens { tokens } => {
                if let Some(id) = first_duplicate_id(tokens) {
                    return Err(SessionError::invalid(kind, format!("duplicate token id '{id}'")));
                }
                check_non_empty(kind, "token id", tokens.iter().map(|t| t.id.as_str()))
            }
            Self::UpsertToken(token) => check_non_empty(kind, "token id", [token.id.as_str()]),
            Self::RollDice(request) => {
                request
                    .pool()
                    .map_err(|e| SessionError::invalid(kind, e.to_string()))?;
                check_non_empty(kind, "player id", [request.player_id.as_str()])
            }
            Self::JoinPlayer(join) => check_non_empty(kind, "player id", [join.id.as_str()]),
            Self::UpdatePlayer { player_id, .. } => {
                check_non_empty(kind, "player id", [player_id.as_str()])
            }
            Self::AddCharacter(sheet) | Self::UpdateCharacter(sheet) => {
                check_non_empty(kind, "character id", [sheet.id.as_str()])
            }
            Self::AddNpc(npc) | Self::UpdateNpc(npc) => {
                check_non_empty(kind, "npc id", [npc.id.as_str()])
            }
            Self::UpdateScene(_)
            | Self::DeleteNpc { .. }
            | Self::UpdateTitle { .. }
            | Self::UpdateMusic { .. }
            | Self::UpdateSharedNotes { .. }
            | Self::UpdateDrawings { .. }
            | Self::SaveSceneToLib { .. }
            | Self::LoadSceneFromLib { .. }
            | Self::UpdateTokenStatus { .. }
            | Self::PushRoll { .. } => Ok(()),
        }
    }
}

fn check_non_empty<'a>(
    kind: ActionKind,
    what: &str,
    ids: impl IntoIterator<Item = &'a str>,
) -> SessionResult<()> {
    if ids.into_iter().any(|id| id.trim().is_empty()) {
        return Err(SessionError::invalid(kind, format!("{what} must not be empty")));
    }
    Ok(())
}
