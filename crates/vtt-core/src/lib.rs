//! Core types for Spieltisch: the shared session document.
//!
//! This crate defines the data model every other crate works on. It is
//! independent of dice rules, storage and transport. A [`Session`] can be
//! constructed programmatically or deserialized from the JSON document a
//! store persists.

/// Generic id-keyed collection primitives (upsert, insert-if-absent, ...).
pub mod collection;
/// Dice roll records as stored in the session log.
pub mod dice_roll;
/// Error types used throughout the crate.
pub mod error;
/// Validated session identifiers.
pub mod id;
/// Players, characters and NPCs.
pub mod roster;
/// Bounded most-recent-first log of dice rolls.
pub mod roll_log;
/// Scenes, tokens, drawings and the ambient track.
pub mod scene;
/// Serde helpers shared by patch types.
pub mod serde_util;
/// The session root aggregate.
pub mod session;

/// Re-export collection primitives.
pub use collection::{Identified, Upserted};
/// Re-export the dice roll record.
pub use dice_roll::DiceRoll;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export the session id.
pub use id::SessionId;
/// Re-export roster types.
pub use roster::{CharacterSheet, Npc, Player, PlayerJoin, PlayerPatch};
/// Re-export the roll log.
pub use roll_log::{ROLL_LOG_CAPACITY, RollLog};
/// Re-export scene types.
pub use scene::{Drawing, Point, Scene, ScenePatch, Token, TokenKind, Track};
/// Re-export the session aggregate.
pub use session::Session;
