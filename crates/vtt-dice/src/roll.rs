//! Fresh rolls, pushes and outcome classification.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use vtt_core::DiceRoll;

use crate::error::{DiceError, DiceResult};
use crate::pool::{DicePool, SUCCESS_FACE, count_successes, count_traumas, roll_d6};

/// What a player asks for when rolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequest {
    /// The rolling player.
    pub player_id: String,
    /// The player's display name.
    pub player_name: String,
    /// Attribute label, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Skill label, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    /// Number of base dice (attribute + skill + modifier).
    pub base_dice: u32,
    /// Number of stress dice.
    #[serde(default)]
    pub stress_dice: u32,
    /// Modifier already folded into `base_dice`, kept for display.
    #[serde(default)]
    pub modifier: i32,
}

impl RollRequest {
    /// Validate the dice counts.
    pub fn pool(&self) -> DiceResult<DicePool> {
        DicePool::new(self.base_dice, self.stress_dice)
    }
}

/// A v4 uuid drawn from `rng`, so seeded callers get reproducible ids.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.random();
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

/// Make a fresh roll.
pub fn fresh_roll<R: Rng + ?Sized>(
    request: RollRequest,
    now: DateTime<Utc>,
    rng: &mut R,
) -> DiceResult<DiceRoll> {
    let result = request.pool()?.roll(rng);
    Ok(DiceRoll {
        id: random_id(rng),
        timestamp: now,
        player_id: request.player_id,
        player_name: request.player_name,
        attribute: request.attribute,
        skill: request.skill,
        base_dice: request.base_dice,
        stress_dice: request.stress_dice,
        modifier: request.modifier,
        successes: result.successes(),
        traumas: result.traumas(),
        base_results: result.base,
        stress_results: result.stress,
        pushed: false,
    })
}

/// What a push changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushOutcome {
    /// Number of dice that were rerolled (sixes are kept).
    pub rerolled: usize,
    /// Whether an extra stress die was added.
    pub added_stress_die: bool,
}

/// Push a roll in place.
///
/// Sixes in both pools are kept and every other die is rerolled. When
/// `add_stress_die` is set (the roller has a character sheet) one more
/// stress die is rolled and the pool keeps it from then on. Counts are
/// recomputed over the full pools and the roll is marked pushed.
pub fn push_roll<R: Rng + ?Sized>(
    roll: &mut DiceRoll,
    add_stress_die: bool,
    rng: &mut R,
) -> DiceResult<PushOutcome> {
    if roll.pushed {
        return Err(DiceError::AlreadyPushed(roll.id.clone()));
    }

    let mut rerolled = 0;
    for face in roll
        .base_results
        .iter_mut()
        .chain(roll.stress_results.iter_mut())
    {
        if *face != SUCCESS_FACE {
            *face = roll_d6(rng);
            rerolled += 1;
        }
    }

    if add_stress_die {
        roll.stress_results.push(roll_d6(rng));
        roll.stress_dice += 1;
    }

    roll.successes = count_successes(&roll.base_results, &roll.stress_results);
    roll.traumas = count_traumas(&roll.stress_results);
    roll.pushed = true;

    Ok(PushOutcome {
        rerolled,
        added_stress_die: add_stress_die,
    })
}

/// How a roll reads at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// At least one six.
    Success {
        /// Number of sixes.
        successes: u32,
        /// Whether a stress die showed a one.
        panic: bool,
    },
    /// No sixes.
    Failure {
        /// Whether a stress die showed a one.
        panic: bool,
    },
}

impl Outcome {
    /// Whether the roll succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the roll calls for a panic roll.
    pub fn is_panic(&self) -> bool {
        match self {
            Self::Success { panic, .. } | Self::Failure { panic } => *panic,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success { successes, .. } => write!(f, "Success ({successes})")?,
            Self::Failure { .. } => write!(f, "Failure")?,
        }
        if self.is_panic() {
            write!(f, " + Panic")?;
        }
        Ok(())
    }
}

/// Classify a roll.
pub fn outcome(roll: &DiceRoll) -> Outcome {
    let panic = roll.traumas > 0;
    if roll.successes > 0 {
        Outcome::Success {
            successes: roll.successes,
            panic,
        }
    } else {
        Outcome::Failure { panic }
    }
}
