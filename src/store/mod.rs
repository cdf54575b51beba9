//! Key-value storage for match data.
//!
//! ## Layout
//!
//! Per match:
//! - `game:{id}:deck`: ordered list, the wall (draws pop the tail)
//! - `game:{id}:player{n}`: ordered list, seat `n`'s hand
//! - `game:{id}:state`: string, the serialized `MatchState`
//! - `mjgame:{id}:status`: string, the serialized `MatchStatus`
//!
//! ## Atomicity
//!
//! Reads go straight to the store. Writes are staged in a `WriteBatch`
//! and applied with `commit`, which either applies every operation or
//! none of them.

pub mod memory;

pub use memory::MemoryStore;

use std::fmt;

use crate::core::{GameId, Seat};

/// A failed store operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    Unavailable(String),
    /// A key holds a value of the wrong shape (list vs string).
    WrongType(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::WrongType(key) => write!(f, "key {} holds the wrong kind of value", key),
        }
    }
}

impl std::error::Error for StoreError {}

/// One staged write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Set { key: String, value: String },
    Delete { key: String },
    /// Push each value onto the head in turn.
    PushHead { key: String, values: Vec<String> },
    /// Append each value at the tail in turn.
    PushTail { key: String, values: Vec<String> },
    /// Drop the tail element, if any.
    PopTail { key: String },
    /// Replace the whole list, given head to tail.
    ReplaceList { key: String, values: Vec<String> },
}

impl WriteOp {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            WriteOp::Set { key, .. }
            | WriteOp::Delete { key }
            | WriteOp::PushHead { key, .. }
            | WriteOp::PushTail { key, .. }
            | WriteOp::PopTail { key }
            | WriteOp::ReplaceList { key, .. } => key,
        }
    }
}

/// Writes applied together by [`MatchStore::commit`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn delete(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Delete { key: key.into() });
        self
    }

    pub fn push_head(&mut self, key: impl Into<String>, values: Vec<String>) -> &mut Self {
        self.ops.push(WriteOp::PushHead {
            key: key.into(),
            values,
        });
        self
    }

    pub fn push_tail(&mut self, key: impl Into<String>, values: Vec<String>) -> &mut Self {
        self.ops.push(WriteOp::PushTail {
            key: key.into(),
            values,
        });
        self
    }

    pub fn pop_tail(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::PopTail { key: key.into() });
        self
    }

    pub fn replace_list(&mut self, key: impl Into<String>, values: Vec<String>) -> &mut Self {
        self.ops.push(WriteOp::ReplaceList {
            key: key.into(),
            values,
        });
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Key-value store with string and ordered-list values.
///
/// Implementations must be safe to share across threads. Serializing
/// access per match is the caller's job; the store only guarantees that
/// each `commit` is atomic.
pub trait MatchStore: Send + Sync {
    /// String value at `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Whole list at `key`, head to tail. Missing keys read as empty.
    fn list(&self, key: &str) -> Result<Vec<String>, StoreError>;

    fn list_len(&self, key: &str) -> Result<usize, StoreError>;

    /// Last element of the list at `key`.
    fn peek_tail(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn contains(&self, key: &str) -> Result<bool, StoreError>;

    /// Apply every operation or none.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

#[must_use]
pub fn deck_key(game_id: &GameId) -> String {
    format!("game:{}:deck", game_id)
}

#[must_use]
pub fn hand_key(game_id: &GameId, seat: Seat) -> String {
    format!("game:{}:{}", game_id, seat.player_key())
}

#[must_use]
pub fn state_key(game_id: &GameId) -> String {
    format!("game:{}:state", game_id)
}

#[must_use]
pub fn status_key(game_id: &GameId) -> String {
    format!("mjgame:{}:status", game_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let id = GameId::new("majiang_42");
        assert_eq!(deck_key(&id), "game:majiang_42:deck");
        assert_eq!(hand_key(&id, Seat::new(3).unwrap()), "game:majiang_42:player3");
        assert_eq!(state_key(&id), "game:majiang_42:state");
        assert_eq!(status_key(&id), "mjgame:majiang_42:status");
    }

    #[test]
    fn test_batch_builder() {
        let mut batch = WriteBatch::new();
        batch.set("a", "1").delete("b").pop_tail("c");
        assert_eq!(batch.len(), 3);
        let keys: Vec<&str> = batch.ops().iter().map(WriteOp::key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
