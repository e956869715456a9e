use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::{find, find_mut};
use crate::id::SessionId;
use crate::roll_log::RollLog;
use crate::roster::{CharacterSheet, Npc, Player};
use crate::scene::{Drawing, Scene, Token, Track};

/// The shared document for one game: everything every client at the table
/// sees. Persisted as a single JSON document keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Storage key; stable for the session's lifetime.
    pub id: SessionId,
    /// Player id of the game master, the only caller allowed to delete.
    pub owner_id: String,
    /// Session title.
    #[serde(default)]
    pub title: String,
    /// The active scene.
    #[serde(default)]
    pub scene: Scene,
    /// Saved scenes.
    #[serde(default)]
    pub scene_library: Vec<Scene>,
    /// Tokens on the active map.
    #[serde(default)]
    pub tokens: Vec<Token>,
    /// Players who have joined.
    #[serde(default)]
    pub players: Vec<Player>,
    /// Character sheets.
    #[serde(default)]
    pub characters: Vec<CharacterSheet>,
    /// NPCs tracked by the game master.
    #[serde(default)]
    pub npcs: Vec<Npc>,
    /// Dice log, newest first.
    #[serde(default)]
    pub dice_rolls: RollLog,
    /// Freehand paths on the map.
    #[serde(default)]
    pub drawings: Vec<Drawing>,
    /// Notes shared with the whole table.
    #[serde(default)]
    pub shared_notes: String,
    /// Ambient track, if one is playing.
    #[serde(default)]
    pub current_track: Option<Track>,
    /// When the session was provisioned.
    pub created_at: DateTime<Utc>,
    /// When the session was last mutated. Never decreases.
    pub last_updated: DateTime<Utc>,
}

impl Session {
    /// Create an empty session owned by `owner_id`.
    pub fn new(
        id: SessionId,
        owner_id: impl Into<String>,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id: owner_id.into(),
            title: title.into(),
            scene: Scene::default(),
            scene_library: Vec::new(),
            tokens: Vec::new(),
            players: Vec::new(),
            characters: Vec::new(),
            npcs: Vec::new(),
            dice_rolls: RollLog::new(),
            drawings: Vec::new(),
            shared_notes: String::new(),
            current_track: None,
            created_at: now,
            last_updated: now,
        }
    }

    /// Mark the session as updated at `now`, never moving the clock backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_updated {
            self.last_updated = now;
        }
    }

    /// Whether `player_id` is the game master.
    pub fn is_owner(&self, player_id: &str) -> bool {
        self.owner_id == player_id
    }

    /// Find a player by id.
    pub fn player(&self, id: &str) -> Option<&Player> {
        find(&self.players, id)
    }

    /// Find a player by id, mutably.
    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        find_mut(&mut self.players, id)
    }

    /// Find a character sheet by id.
    pub fn character(&self, id: &str) -> Option<&CharacterSheet> {
        find(&self.characters, id)
    }

    /// Find a character sheet by id, mutably.
    pub fn character_mut(&mut self, id: &str) -> Option<&mut CharacterSheet> {
        find_mut(&mut self.characters, id)
    }

    /// Find a token by id.
    pub fn token(&self, id: &str) -> Option<&Token> {
        find(&self.tokens, id)
    }

    /// Find a token by id, mutably.
    pub fn token_mut(&mut self, id: &str) -> Option<&mut Token> {
        find_mut(&mut self.tokens, id)
    }

    /// The character sheet linked to a player, if the player has one and
    /// the sheet exists.
    pub fn character_of_player(&self, player_id: &str) -> Option<&CharacterSheet> {
        let character_id = self.player(player_id)?.character_id.as_deref()?;
        self.character(character_id)
    }

    /// Players seen within `window` of `now`.
    pub fn active_players(&self, now: DateTime<Utc>, window: Duration) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| now.signed_duration_since(p.last_seen) <= window)
            .collect()
    }
}
