use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Maximum length of a session id.
pub const SESSION_ID_MAX_LEN: usize = 64;

/// Returns true for characters permitted in a session id.
fn is_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

/// Identifier of a session, used as the storage key.
///
/// Ids are 1-64 characters from `[A-Za-z0-9_-]`, which keeps them safe as
/// URL path segments and as file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Parse and validate a session id.
    pub fn parse(value: &str) -> CoreResult<Self> {
        if value.is_empty() {
            return Err(CoreError::EmptySessionId);
        }
        if value.len() > SESSION_ID_MAX_LEN {
            return Err(CoreError::SessionIdTooLong {
                max: SESSION_ID_MAX_LEN,
                found: value.len(),
            });
        }
        if let Some((index, ch)) = value.chars().enumerate().find(|(_, ch)| !is_id_char(*ch)) {
            return Err(CoreError::InvalidSessionIdChar { ch, index });
        }
        Ok(Self(value.to_string()))
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SessionId {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for SessionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_ids() {
        assert!(SessionId::parse("abc").is_ok());
        assert!(SessionId::parse("game_night-42").is_ok());
        assert_eq!(SessionId::parse("Room1").unwrap().as_str(), "Room1");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(SessionId::parse(""), Err(CoreError::EmptySessionId));
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(SESSION_ID_MAX_LEN + 1);
        assert_eq!(
            SessionId::parse(&long),
            Err(CoreError::SessionIdTooLong {
                max: SESSION_ID_MAX_LEN,
                found: SESSION_ID_MAX_LEN + 1
            })
        );
    }

    #[test]
    fn rejects_path_characters() {
        assert_eq!(
            SessionId::parse("../etc"),
            Err(CoreError::InvalidSessionIdChar { ch: '.', index: 0 })
        );
        assert!(SessionId::parse("a/b").is_err());
        assert!(SessionId::parse("a b").is_err());
    }

    #[test]
    fn generated_ids_are_valid() {
        let id = SessionId::generate();
        assert!(SessionId::parse(id.as_str()).is_ok());
        assert_ne!(id, SessionId::generate());
    }

    #[test]
    fn serde_validates() {
        let id: SessionId = serde_json::from_str("\"table-1\"").unwrap();
        assert_eq!(id.as_str(), "table-1");
        assert!(serde_json::from_str::<SessionId>("\"bad id\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"table-1\"");
    }
}
