//! Match identification.
//!
//! Every match is addressed by an opaque `GameId` string. Generated ids
//! take the form `majiang_<unix-nanos>_<8 hex digits>`; the random suffix
//! keeps two matches started in the same nanosecond apart.
//!
//! ```
//! use mahjong_match::core::GameId;
//!
//! let id = GameId::generate();
//! assert!(id.as_str().starts_with("majiang_"));
//! assert_ne!(id, GameId::generate());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix of generated match ids.
pub const GAME_ID_PREFIX: &str = "majiang";

/// Opaque match identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Wrap an existing id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, unique id.
    #[must_use]
    pub fn generate() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self(format!("{}_{}_{:08x}", GAME_ID_PREFIX, nanos, rand::random::<u32>()))
    }

    /// Get the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_format() {
        let id = GameId::generate();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "majiang");
        assert!(parts[1].parse::<u128>().is_ok());
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_generated_ids_unique() {
        let ids: std::collections::HashSet<GameId> = (0..100).map(|_| GameId::generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = GameId::new("majiang_1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"majiang_1\"");
    }
}
