use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::dice_roll::DiceRoll;

/// Maximum number of rolls kept in a session's log.
pub const ROLL_LOG_CAPACITY: usize = 50;

/// Most-recent-first log of dice rolls, capped at [`ROLL_LOG_CAPACITY`].
///
/// Serialized as a plain JSON array, newest first. Deserializing an
/// oversized array keeps only the newest entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DiceRoll>", into = "Vec<DiceRoll>")]
pub struct RollLog {
    rolls: VecDeque<DiceRoll>,
}

impl RollLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a roll as the newest entry. Returns the entry dropped to stay
    /// within capacity, if any.
    pub fn record(&mut self, roll: DiceRoll) -> Option<DiceRoll> {
        self.rolls.push_front(roll);
        if self.rolls.len() > ROLL_LOG_CAPACITY {
            self.rolls.pop_back()
        } else {
            None
        }
    }

    /// Find a roll by id.
    pub fn get(&self, id: &str) -> Option<&DiceRoll> {
        self.rolls.iter().find(|r| r.id == id)
    }

    /// Find a roll by id, mutably.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut DiceRoll> {
        self.rolls.iter_mut().find(|r| r.id == id)
    }

    /// The newest roll.
    pub fn latest(&self) -> Option<&DiceRoll> {
        self.rolls.front()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &DiceRoll> {
        self.rolls.iter()
    }

    /// Number of rolls held.
    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }
}

impl From<Vec<DiceRoll>> for RollLog {
    fn from(mut rolls: Vec<DiceRoll>) -> Self {
        rolls.truncate(ROLL_LOG_CAPACITY);
        Self {
            rolls: rolls.into(),
        }
    }
}

impl From<RollLog> for Vec<DiceRoll> {
    fn from(log: RollLog) -> Self {
        log.rolls.into()
    }
}
