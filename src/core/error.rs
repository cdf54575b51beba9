//! Match errors.
//!
//! Every failure carries the operation name and, when known, the match
//! id. `ErrorKind` variants fall into four categories:
//!
//! - **Validation**: malformed or missing input (unknown variant, bad seat)
//! - **State**: action illegal for the current stage or actor
//! - **Resource**: empty wall, missing or corrupt persisted data, store failure
//! - **Randomness**: entropy source unavailable
//!
//! A failed action never leaves a partial write behind: transitions
//! stage all writes and commit them in one batch after every check has
//! passed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::game_id::GameId;
use super::rng::EntropyError;
use super::seat::Seat;
use super::state::Stage;
use crate::store::StoreError;
use crate::tiles::TileId;

/// Coarse error classes reported to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    State,
    Resource,
    Randomness,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::State => "state",
            ErrorCategory::Resource => "resource",
            ErrorCategory::Randomness => "randomness",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidVariant(u8),
    InvalidSeat(u8),
    UnknownClaim(String),
    InvalidConfig(String),

    WrongStage {
        allowed: &'static [Stage],
        actual: Stage,
    },
    NotYourTurn {
        seat: Seat,
        current: Option<Seat>,
    },
    SelfClaim(Seat),
    TileNotHeld {
        seat: Seat,
        tile: TileId,
    },
    NotAWinningHand(Seat),
    MatchFinished,

    DeckEmpty,
    StateMissing,
    Corrupt(String),
    Store(String),

    Entropy(String),
}

impl ErrorKind {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::InvalidVariant(_)
            | ErrorKind::InvalidSeat(_)
            | ErrorKind::UnknownClaim(_)
            | ErrorKind::InvalidConfig(_) => ErrorCategory::Validation,
            ErrorKind::WrongStage { .. }
            | ErrorKind::NotYourTurn { .. }
            | ErrorKind::SelfClaim(_)
            | ErrorKind::TileNotHeld { .. }
            | ErrorKind::NotAWinningHand(_)
            | ErrorKind::MatchFinished => ErrorCategory::State,
            ErrorKind::DeckEmpty
            | ErrorKind::StateMissing
            | ErrorKind::Corrupt(_)
            | ErrorKind::Store(_) => ErrorCategory::Resource,
            ErrorKind::Entropy(_) => ErrorCategory::Randomness,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidVariant(v) => write!(f, "unknown variant {} (expected 13 or 16)", v),
            ErrorKind::InvalidSeat(s) => write!(f, "seat must be 1-4, got {}", s),
            ErrorKind::UnknownClaim(k) => {
                write!(f, "unknown claim '{}' (expected pass, chow, pong, kong or hu)", k)
            }
            ErrorKind::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            ErrorKind::WrongStage { allowed, actual } => {
                let names: Vec<&str> = allowed.iter().map(|s| s.as_str()).collect();
                write!(f, "stage is {}, action requires {}", actual, names.join(" or "))
            }
            ErrorKind::NotYourTurn { seat, current } => match current {
                Some(current) => write!(f, "{} acted but it is {}'s turn", seat, current),
                None => write!(f, "{} acted but no seat holds the turn", seat),
            },
            ErrorKind::SelfClaim(seat) => write!(f, "{} cannot claim its own discard", seat),
            ErrorKind::TileNotHeld { seat, tile } => write!(f, "{} does not hold tile {}", seat, tile),
            ErrorKind::NotAWinningHand(seat) => write!(f, "{} does not hold a complete hand", seat),
            ErrorKind::MatchFinished => f.write_str("match is over"),
            ErrorKind::DeckEmpty => f.write_str("no tiles left in the wall"),
            ErrorKind::StateMissing => f.write_str("no match state stored"),
            ErrorKind::Corrupt(msg) => write!(f, "stored data is corrupt: {}", msg),
            ErrorKind::Store(msg) => write!(f, "store failure: {}", msg),
            ErrorKind::Entropy(msg) => write!(f, "randomness unavailable: {}", msg),
        }
    }
}

impl From<StoreError> for ErrorKind {
    fn from(err: StoreError) -> Self {
        ErrorKind::Store(err.to_string())
    }
}

impl From<EntropyError> for ErrorKind {
    fn from(err: EntropyError) -> Self {
        ErrorKind::Entropy(err.to_string())
    }
}

/// A failed match operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchError {
    pub op: &'static str,
    pub game_id: Option<GameId>,
    pub kind: ErrorKind,
}

impl MatchError {
    #[must_use]
    pub fn new(op: &'static str, game_id: Option<GameId>, kind: ErrorKind) -> Self {
        Self { op, game_id, kind }
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.game_id {
            Some(id) => write!(f, "{} [{}]: {}", self.op, id, self.kind),
            None => write!(f, "{}: {}", self.op, self.kind),
        }
    }
}

impl std::error::Error for MatchError {}

pub type Result<T> = std::result::Result<T, MatchError>;

/// Operation name and match id attached to errors raised by one action.
#[derive(Clone, Debug)]
pub struct OpContext {
    pub op: &'static str,
    pub game_id: Option<GameId>,
}

impl OpContext {
    #[must_use]
    pub fn new(op: &'static str, game_id: &GameId) -> Self {
        Self {
            op,
            game_id: Some(game_id.clone()),
        }
    }

    /// Context for operations that are not tied to one match yet.
    #[must_use]
    pub fn detached(op: &'static str) -> Self {
        Self { op, game_id: None }
    }

    #[must_use]
    pub fn error(&self, kind: impl Into<ErrorKind>) -> MatchError {
        MatchError::new(self.op, self.game_id.clone(), kind.into())
    }

    pub fn fail<T>(&self, kind: impl Into<ErrorKind>) -> Result<T> {
        Err(self.error(kind))
    }
}
