//! Round tracking over the sixteen-hand wind cycle.
//!
//! A match plays four prevailing winds, each with four hands. The pair
//! `(prevailing, hand)` starts at East-East (`1-1`, round 1) and ends at
//! North-North (`4-4`, round 16).
//!
//! ```
//! use mahjong_match::round::GameRound;
//!
//! let mut round = GameRound::first();
//! let mut played = 1;
//! while let Some(next) = round.next() {
//!     round = next;
//!     played += 1;
//! }
//! assert_eq!(played, 16);
//! assert_eq!(round.code(), "4-4");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four winds, numbered 1-4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Wind {
    East,
    South,
    West,
    North,
}

impl Wind {
    pub const ALL: [Wind; 4] = [Wind::East, Wind::South, Wind::West, Wind::North];

    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    #[must_use]
    pub fn from_number(number: u8) -> Option<Wind> {
        Wind::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    /// The following wind, or `None` after North.
    #[must_use]
    pub fn succ(self) -> Option<Wind> {
        Wind::from_number(self.number() + 1)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Wind::East => "East",
            Wind::South => "South",
            Wind::West => "West",
            Wind::North => "North",
        }
    }
}

impl TryFrom<u8> for Wind {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Wind::from_number(number).ok_or_else(|| format!("wind must be 1-4, got {}", number))
    }
}

impl From<Wind> for u8 {
    fn from(wind: Wind) -> Self {
        wind.number()
    }
}

/// Position in the sixteen-hand cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRound {
    pub prevailing_wind: Wind,
    pub hand_wind: Wind,
}

impl Default for GameRound {
    fn default() -> Self {
        Self::first()
    }
}

impl GameRound {
    /// Total hands in a match.
    pub const COUNT: u8 = 16;

    /// East-East.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            prevailing_wind: Wind::East,
            hand_wind: Wind::East,
        }
    }

    /// Round from its 1-based number (1-16).
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        if !(1..=Self::COUNT).contains(&number) {
            return None;
        }
        Some(Self {
            prevailing_wind: Wind::from_number((number - 1) / 4 + 1)?,
            hand_wind: Wind::from_number((number - 1) % 4 + 1)?,
        })
    }

    /// `(prevailing - 1) * 4 + hand`, in 1-16.
    #[must_use]
    pub const fn number(&self) -> u8 {
        (self.prevailing_wind.number() - 1) * 4 + self.hand_wind.number()
    }

    /// Machine-readable code, e.g. `2-3`.
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}-{}", self.prevailing_wind.number(), self.hand_wind.number())
    }

    /// Display label, e.g. `South Wind, Hand 3 (round 7/16)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} Wind, Hand {} (round {}/{})",
            self.prevailing_wind.name(),
            self.hand_wind.number(),
            self.number(),
            Self::COUNT
        )
    }

    /// Whether this is the final hand (North-North).
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.prevailing_wind == Wind::North && self.hand_wind == Wind::North
    }

    /// The following round, or `None` once the cycle is complete.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        match self.hand_wind.succ() {
            Some(hand_wind) => Some(Self {
                prevailing_wind: self.prevailing_wind,
                hand_wind,
            }),
            None => self.prevailing_wind.succ().map(|prevailing_wind| Self {
                prevailing_wind,
                hand_wind: Wind::East,
            }),
        }
    }
}

impl fmt::Display for GameRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}
