//! Dice engine for Spieltisch.
//!
//! Rolls are pools of six-sided dice split into a base pool and a stress
//! pool. Every six is a success; every one on a stress die is a trauma. A
//! roll can be pushed once: sixes stay, everything else is rerolled, and a
//! character who pushes takes a point of stress and an extra stress die.
//!
//! All functions take the random source as a parameter, so seeded
//! generators give reproducible results.

pub mod error;
pub mod pool;
pub mod roll;

pub use error::{DiceError, DiceResult};
pub use pool::{DicePool, MAX_POOL_SIZE, PoolResult, count_successes, count_traumas, roll_d6};
pub use roll::{Outcome, PushOutcome, RollRequest, fresh_roll, outcome, push_roll, random_id};
