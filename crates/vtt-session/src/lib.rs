//! Session engine for Spieltisch.
//!
//! A session is a single JSON document mutated by a closed set of
//! [`Action`]s. The [`reducer`] turns `(session, action)` into the next
//! session, a [`SessionStore`] persists documents by id, and the
//! [`SessionGateway`] ties the two together as independent
//! read-modify-write requests. Concurrent writers race and the last write
//! wins.

pub mod action;
pub mod error;
pub mod gateway;
pub mod reducer;
pub mod store;

pub use action::{Action, ActionEnvelope, ActionKind};
pub use error::{SessionError, SessionResult};
pub use gateway::{CreateSession, SessionGateway};
pub use reducer::{Reduction, apply_action};
pub use store::{JsonDirStore, MemoryStore, PutMode, SessionStore, StoreError, StoreResult};
