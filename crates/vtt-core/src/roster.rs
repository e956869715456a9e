use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Identified;
use crate::serde_util::double_option;

/// A connected participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique within the session's players.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Color used for the player's cursor, drawings and rolls.
    #[serde(default)]
    pub color: String,
    /// The character sheet this player controls.
    #[serde(default)]
    pub character_id: Option<String>,
    /// When the player last joined or updated.
    pub last_seen: DateTime<Utc>,
    /// Whether this player is the game master.
    #[serde(default)]
    pub is_owner: bool,
}

impl Identified for Player {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload of a join request.
///
/// Carries no `lastSeen` or `isOwner`: both are decided by the reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerJoin {
    /// Player id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Player color.
    #[serde(default)]
    pub color: String,
    /// Linked character sheet.
    #[serde(default)]
    pub character_id: Option<String>,
}

impl PlayerJoin {
    /// Turn the join request into a player record.
    pub fn into_player(self, now: DateTime<Utc>, is_owner: bool) -> Player {
        Player {
            id: self.id,
            name: self.name,
            color: self.color,
            character_id: self.character_id,
            last_seen: now,
            is_owner,
        }
    }
}

/// A partial player update. Id and owner flag cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New character link; `Some(None)` unlinks.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub character_id: Option<Option<String>>,
}

impl Player {
    /// Shallow-merge a patch into this player.
    pub fn apply_patch(&mut self, patch: PlayerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(character_id) = patch.character_id {
            self.character_id = character_id;
        }
    }
}

/// A player character's sheet.
///
/// Only `stress` has rules attached to it (pushing a roll raises it). The
/// remaining typed fields are for display, and anything else the client
/// stores on a sheet is kept in `extra` and round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    /// Unique within the session's characters.
    pub id: String,
    /// Character name.
    #[serde(default)]
    pub name: String,
    /// Career or archetype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career: Option<String>,
    /// Attribute scores.
    #[serde(default)]
    pub attributes: BTreeMap<String, u32>,
    /// Skill levels.
    #[serde(default)]
    pub skills: BTreeMap<String, u32>,
    /// Current health.
    #[serde(default)]
    pub health: u32,
    /// Stress level; grows by one each time a roll is pushed.
    #[serde(default)]
    pub stress: u32,
    /// Talents.
    #[serde(default)]
    pub talents: Vec<String>,
    /// Gear carried.
    #[serde(default)]
    pub inventory: Vec<String>,
    /// Any other client-defined fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CharacterSheet {
    /// Create an empty sheet.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            career: None,
            attributes: BTreeMap::new(),
            skills: BTreeMap::new(),
            health: 0,
            stress: 0,
            talents: Vec::new(),
            inventory: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Identified for CharacterSheet {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A non-player character tracked by the game master.
///
/// Independent of tokens: an NPC may exist with no token on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    /// Unique within the session's NPCs.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-text notes.
    #[serde(default)]
    pub description: String,
    /// Any other client-defined fields (stats, portrait, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Npc {
    /// Create an NPC with a name and no notes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Identified for Npc {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_patch_keeps_unset_fields() {
        let mut player = PlayerJoin {
            id: "p1".to_string(),
            name: "Ripley".to_string(),
            color: "#f00".to_string(),
            character_id: Some("c1".to_string()),
        }
        .into_player(Utc::now(), false);

        player.apply_patch(PlayerPatch {
            color: Some("#0f0".to_string()),
            ..PlayerPatch::default()
        });
        assert_eq!(player.name, "Ripley");
        assert_eq!(player.color, "#0f0");
        assert_eq!(player.character_id.as_deref(), Some("c1"));
    }

    #[test]
    fn player_patch_null_unlinks_character() {
        let mut player = PlayerJoin {
            id: "p1".to_string(),
            name: "Hicks".to_string(),
            color: String::new(),
            character_id: Some("c2".to_string()),
        }
        .into_player(Utc::now(), false);
        let patch: PlayerPatch = serde_json::from_str(r#"{"characterId": null}"#).unwrap();
        player.apply_patch(patch);
        assert_eq!(player.character_id, None);
    }

    #[test]
    fn join_ignores_owner_claims() {
        let join: PlayerJoin =
            serde_json::from_str(r#"{"id": "p9", "name": "Burke", "isOwner": true}"#).unwrap();
        let player = join.into_player(Utc::now(), false);
        assert!(!player.is_owner);
    }

    #[test]
    fn character_sheet_keeps_unknown_fields() {
        let json = r#"{
            "id": "c1",
            "name": "Vasquez",
            "attributes": {"strength": 5, "agility": 4},
            "stress": 2,
            "armor": {"rating": 2},
            "signatureItem": "Smartgun"
        }"#;
        let sheet: CharacterSheet = serde_json::from_str(json).unwrap();
        assert_eq!(sheet.stress, 2);
        assert_eq!(sheet.attributes["strength"], 5);
        assert_eq!(sheet.extra["signatureItem"], "Smartgun");

        let back = serde_json::to_value(&sheet).unwrap();
        assert_eq!(back["armor"]["rating"], 2);
        assert_eq!(back["signatureItem"], "Smartgun");
    }

    #[test]
    fn npc_keeps_unknown_fields() {
        let npc: Npc =
            serde_json::from_str(r#"{"id": "n1", "name": "Bishop", "hostile": false}"#).unwrap();
        assert_eq!(npc.extra["hostile"], false);
        assert_eq!(npc.description, "");
    }
}
