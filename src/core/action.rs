//! Claims and the per-hand action history.
//!
//! ## ClaimKind
//!
//! What a seat declares against another seat's discard. Priority order
//! is `hu > kong > pong > chow > pass`.
//!
//! ## ActionRecord
//!
//! Every accepted move during a hand is appended to the match history
//! with a monotonically increasing sequence number. The history is reset
//! at each deal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ErrorKind;
use super::seat::Seat;
use crate::tiles::Tile;

/// A declaration against the latest discard.
///
/// ```
/// use mahjong_match::core::ClaimKind;
///
/// let kind: ClaimKind = "pong".parse().unwrap();
/// assert!(kind.priority() > ClaimKind::Chow.priority());
/// assert!(ClaimKind::Hu.priority() > ClaimKind::Kong.priority());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimKind {
    Pass,
    Chow,
    Pong,
    Kong,
    Hu,
}

impl ClaimKind {
    pub const ALL: [ClaimKind; 5] = [
        ClaimKind::Pass,
        ClaimKind::Chow,
        ClaimKind::Pong,
        ClaimKind::Kong,
        ClaimKind::Hu,
    ];

    /// Resolution priority. Higher wins.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            ClaimKind::Pass => 0,
            ClaimKind::Chow => 1,
            ClaimKind::Pong => 2,
            ClaimKind::Kong => 3,
            ClaimKind::Hu => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ClaimKind::Pass => "pass",
            ClaimKind::Chow => "chow",
            ClaimKind::Pong => "pong",
            ClaimKind::Kong => "kong",
            ClaimKind::Hu => "hu",
        }
    }

    /// Chow, pong or kong: the claimer takes the tile and must discard.
    #[must_use]
    pub const fn is_meld(self) -> bool {
        matches!(self, ClaimKind::Chow | ClaimKind::Pong | ClaimKind::Kong)
    }
}

impl FromStr for ClaimKind {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ClaimKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| ErrorKind::UnknownClaim(s.to_string()))
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of recorded moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchAction {
    Deal,
    Draw,
    Discard,
    Claim(ClaimKind),
    SelfDrawnWin,
}

/// One accepted move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Acting seat. `None` for table actions such as the deal.
    pub seat: Option<Seat>,

    pub action: MatchAction,

    /// Tile involved, if public. Draws are recorded without the tile.
    pub tile: Option<Tile>,

    /// Position in the hand's history, starting at 0.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(seat: Option<Seat>, action: MatchAction, tile: Option<Tile>, sequence: u32) -> Self {
        Self {
            seat,
            action,
            tile,
            sequence,
        }
    }
}
