use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Identified;

/// One entry in the session's dice log.
///
/// A roll never changes after creation except through a single push, which
/// rerolls the dice in place and sets `pushed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRoll {
    /// Unique roll id.
    pub id: String,
    /// When the roll was made.
    pub timestamp: DateTime<Utc>,
    /// The player who rolled.
    pub player_id: String,
    /// The player's display name at the time of the roll.
    pub player_name: String,
    /// Attribute label, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Skill label, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    /// Number of base dice.
    pub base_dice: u32,
    /// Number of stress dice. Grows by one on a push by a linked character.
    pub stress_dice: u32,
    /// Gear or situational modifier, already folded into `base_dice`.
    #[serde(default)]
    pub modifier: i32,
    /// Faces of the base dice.
    pub base_results: Vec<u8>,
    /// Faces of the stress dice.
    pub stress_results: Vec<u8>,
    /// Number of sixes across both pools.
    pub successes: u32,
    /// Number of ones in the stress pool.
    pub traumas: u32,
    /// Whether the roll has been pushed.
    #[serde(default)]
    pub pushed: bool,
}

impl Identified for DiceRoll {
    fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces = |values: &[u8]| {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "{}: base [{}] stress [{}] = {} success{}, {} trauma{}",
            self.player_name,
            faces(&self.base_results),
            faces(&self.stress_results),
            self.successes,
            if self.successes == 1 { "" } else { "es" },
            self.traumas,
            if self.traumas == 1 { "" } else { "s" },
        )?;
        if self.pushed {
            write!(f, " (pushed)")?;
        }
        Ok(())
    }
}
