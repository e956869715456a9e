use serde::{Deserialize, Serialize};

use crate::collection::Identified;
use crate::serde_util::double_option;

/// Default grid cell size in pixels.
pub const DEFAULT_GRID_SIZE: u32 = 50;

/// A map scene: the backdrop tokens are placed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Library id. Set once the scene has been saved to the library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Reference to the background image, if any.
    #[serde(default)]
    pub background_image: Option<String>,
    /// Whether the grid overlay is shown.
    #[serde(default = "default_grid_enabled")]
    pub grid_enabled: bool,
    /// Grid cell size in pixels.
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
}

fn default_grid_enabled() -> bool {
    true
}

fn default_grid_size() -> u32 {
    DEFAULT_GRID_SIZE
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            id: None,
            name: "New Scene".to_string(),
            background_image: None,
            grid_enabled: true,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl Scene {
    /// Create a scene with the given name and default grid settings.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Shallow-merge the fields present in `patch` into this scene.
    pub fn apply_patch(&mut self, patch: ScenePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(background) = patch.background_image {
            self.background_image = background;
        }
        if let Some(enabled) = patch.grid_enabled {
            self.grid_enabled = enabled;
        }
        if let Some(size) = patch.grid_size {
            self.grid_size = size;
        }
    }
}

/// A partial scene update. Absent fields are left unchanged.
///
/// `backgroundImage: null` clears the background.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New background; `Some(None)` clears it.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_image: Option<Option<String>>,
    /// New grid visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_enabled: Option<bool>,
    /// New grid cell size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<u32>,
}

impl ScenePatch {
    /// True if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.background_image.is_none()
            && self.grid_enabled.is_none()
            && self.grid_size.is_none()
    }
}

/// Who a token represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// A player character.
    Player,
    /// A non-player character controlled by the game master.
    Npc,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Npc => write!(f, "npc"),
        }
    }
}

/// A piece on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Unique within the session's tokens.
    pub id: String,
    /// Horizontal position in map pixels.
    pub x: f64,
    /// Vertical position in map pixels.
    pub y: f64,
    /// Player or NPC.
    pub kind: TokenKind,
    /// Label shown under the token.
    #[serde(default)]
    pub name: String,
    /// Avatar image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Linked character sheet id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    /// Status tags (e.g. "broken", "exhausted").
    #[serde(default)]
    pub status: Vec<String>,
}

impl Token {
    /// Create a token at a position.
    pub fn new(id: impl Into<String>, kind: TokenKind, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            kind,
            name: name.into(),
            avatar: None,
            character_id: None,
            status: Vec::new(),
        }
    }
}

impl Identified for Token {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A point on a freehand path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// A freehand path drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    /// Path id.
    pub id: String,
    /// Stroke color (CSS notation).
    #[serde(default)]
    pub color: String,
    /// Stroke width in pixels.
    #[serde(default = "default_stroke_width")]
    pub width: f64,
    /// The path's points in drawing order.
    #[serde(default)]
    pub points: Vec<Point>,
}

fn default_stroke_width() -> f64 {
    2.0
}

/// The ambient audio track playing for everyone at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Display name.
    pub name: String,
    /// Audio source reference.
    pub url: String,
    /// Playback volume in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Whether the track loops.
    #[serde(default)]
    pub looped: bool,
}
