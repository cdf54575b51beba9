//! Tile identity, suits and naming.
//!
//! ## Tile Index
//!
//! Every non-flower tile maps onto a dense index in `0..34`, used by the
//! count arrays of the hand evaluator:
//!
//! | Suit   | Values | Index  |
//! |--------|--------|--------|
//! | Wan    | 1-9    | 0-8    |
//! | Tong   | 1-9    | 9-17   |
//! | Tiao   | 1-9    | 18-26  |
//! | Wind   | 1-4    | 27-30  |
//! | Dragon | 1-3    | 31-33  |
//!
//! Flowers have no index and never take part in hand shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct indexed tiles.
pub const INDEX_COUNT: usize = 34;

/// First wind index.
pub const WIND_START: usize = 27;

/// First dragon index.
pub const DRAGON_START: usize = 31;

/// Unique id of a physical tile within one match deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u8);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tile suit. Declaration order is the hand sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Wan,
    Tong,
    Tiao,
    Wind,
    Dragon,
    Flower,
}

impl Suit {
    /// Suits in build order.
    pub const ALL: [Suit; 6] = [
        Suit::Wan,
        Suit::Tong,
        Suit::Tiao,
        Suit::Wind,
        Suit::Dragon,
        Suit::Flower,
    ];

    /// Highest face value in this suit.
    #[must_use]
    pub const fn max_value(self) -> u8 {
        match self {
            Suit::Wan | Suit::Tong | Suit::Tiao => 9,
            Suit::Wind => 4,
            Suit::Dragon => 3,
            Suit::Flower => 8,
        }
    }

    /// Physical copies of each face in a full set.
    #[must_use]
    pub const fn copies(self) -> u8 {
        match self {
            Suit::Flower => 1,
            _ => 4,
        }
    }

    /// Number suits form runs; honors and flowers do not.
    #[must_use]
    pub const fn is_number(self) -> bool {
        matches!(self, Suit::Wan | Suit::Tong | Suit::Tiao)
    }

    /// Offset of this suit's first face in the tile index.
    #[must_use]
    pub const fn index_base(self) -> Option<usize> {
        match self {
            Suit::Wan => Some(0),
            Suit::Tong => Some(9),
            Suit::Tiao => Some(18),
            Suit::Wind => Some(WIND_START),
            Suit::Dragon => Some(DRAGON_START),
            Suit::Flower => None,
        }
    }

    /// Short notation letter used by [`tiles_from_str`].
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Suit::Wan => 'm',
            Suit::Tong => 'p',
            Suit::Tiao => 's',
            Suit::Wind => 'w',
            Suit::Dragon => 'd',
            Suit::Flower => 'f',
        }
    }

    fn from_letter(letter: char) -> Option<Suit> {
        Suit::ALL.into_iter().find(|s| s.letter() == letter)
    }
}

/// One physical tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub suit: Suit,
    pub value: u8,
}

impl Tile {
    #[must_use]
    pub const fn new(id: TileId, suit: Suit, value: u8) -> Self {
        Self { id, suit, value }
    }

    /// Dense index in `0..34`, or `None` for flowers.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        if self.value == 0 || self.value > self.suit.max_value() {
            return None;
        }
        self.suit
            .index_base()
            .map(|base| base + self.value as usize - 1)
    }

    #[must_use]
    pub const fn is_flower(&self) -> bool {
        matches!(self.suit, Suit::Flower)
    }

    /// Same face, ignoring the physical id.
    #[must_use]
    pub fn same_face(&self, other: &Tile) -> bool {
        self.suit == other.suit && self.value == other.value
    }

    /// Display name, e.g. `3 Wan`, `East Wind`, `Red Dragon`, `Plum`.
    #[must_use]
    pub fn name(&self) -> String {
        face_name(self.suit, self.value)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

const WIND_NAMES: [&str; 4] = ["East", "South", "West", "North"];
const DRAGON_NAMES: [&str; 3] = ["Red", "Green", "White"];
const FLOWER_NAMES: [&str; 8] = [
    "Plum",
    "Orchid",
    "Bamboo",
    "Chrysanthemum",
    "Spring",
    "Summer",
    "Autumn",
    "Winter",
];

/// Display name of a face.
#[must_use]
pub fn face_name(suit: Suit, value: u8) -> String {
    let slot = (value as usize).wrapping_sub(1);
    match suit {
        Suit::Wan => format!("{} Wan", value),
        Suit::Tong => format!("{} Tong", value),
        Suit::Tiao => format!("{} Tiao", value),
        Suit::Wind => match WIND_NAMES.get(slot) {
            Some(name) => format!("{} Wind", name),
            None => format!("Wind {}", value),
        },
        Suit::Dragon => match DRAGON_NAMES.get(slot) {
            Some(name) => format!("{} Dragon", name),
            None => format!("Dragon {}", value),
        },
        Suit::Flower => FLOWER_NAMES
            .get(slot)
            .map_or_else(|| format!("Flower {}", value), |name| (*name).to_string()),
    }
}

/// Suit and value of a dense tile index.
#[must_use]
pub fn index_face(index: usize) -> Option<(Suit, u8)> {
    match index {
        0..=8 => Some((Suit::Wan, index as u8 + 1)),
        9..=17 => Some((Suit::Tong, (index - 9) as u8 + 1)),
        18..=26 => Some((Suit::Tiao, (index - 18) as u8 + 1)),
        WIND_START..=30 => Some((Suit::Wind, (index - WIND_START) as u8 + 1)),
        DRAGON_START..=33 => Some((Suit::Dragon, (index - DRAGON_START) as u8 + 1)),
        _ => None,
    }
}

/// Parse compact hand notation into tiles with sequential ids.
///
/// Digits are followed by a suit letter: `m` wan, `p` tong, `s` tiao,
/// `w` wind, `d` dragon, `f` flower.
///
/// ```
/// use mahjong_match::tiles::{tiles_from_str, Suit};
///
/// let hand = tiles_from_str("123m55p1w").unwrap();
/// assert_eq!(hand.len(), 6);
/// assert_eq!(hand[3].suit, Suit::Tong);
/// assert_eq!(hand[5].name(), "East Wind");
/// ```
pub fn tiles_from_str(notation: &str) -> Result<Vec<Tile>, String> {
    let mut tiles = Vec::new();
    let mut pending: Vec<u8> = Vec::new();

    for ch in notation.chars().filter(|c| !c.is_whitespace()) {
        if let Some(digit) = ch.to_digit(10) {
            pending.push(digit as u8);
            continue;
        }
        let suit = Suit::from_letter(ch).ok_or_else(|| format!("unknown suit letter '{}'", ch))?;
        if pending.is_empty() {
            return Err(format!("suit '{}' has no values", ch));
        }
        for value in pending.drain(..) {
            if value == 0 || value > suit.max_value() {
                return Err(format!("value {} out of range for '{}'", value, ch));
            }
            let id = TileId(tiles.len() as u8);
            tiles.push(Tile::new(id, suit, value));
        }
    }

    if !pending.is_empty() {
        return Err("trailing values without a suit".to_string());
    }
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout() {
        assert_eq!(Tile::new(TileId(0), Suit::Wan, 1).index(), Some(0));
        assert_eq!(Tile::new(TileId(0), Suit::Wan, 9).index(), Some(8));
        assert_eq!(Tile::new(TileId(0), Suit::Tong, 1).index(), Some(9));
        assert_eq!(Tile::new(TileId(0), Suit::Tiao, 9).index(), Some(26));
        assert_eq!(Tile::new(TileId(0), Suit::Wind, 1).index(), Some(27));
        assert_eq!(Tile::new(TileId(0), Suit::Dragon, 3).index(), Some(33));
        assert_eq!(Tile::new(TileId(0), Suit::Flower, 2).index(), None);
    }

    #[test]
    fn test_index_face_inverts_index() {
        for index in 0..INDEX_COUNT {
            let (suit, value) = index_face(index).unwrap();
            assert_eq!(Tile::new(TileId(0), suit, value).index(), Some(index));
        }
        assert_eq!(index_face(34), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(face_name(Suit::Wan, 3), "3 Wan");
        assert_eq!(face_name(Suit::Wind, 4), "North Wind");
        assert_eq!(face_name(Suit::Dragon, 1), "Red Dragon");
        assert_eq!(face_name(Suit::Dragon, 3), "White Dragon");
        assert_eq!(face_name(Suit::Flower, 4), "Chrysanthemum");
        assert_eq!(face_name(Suit::Flower, 8), "Winter");
    }

    #[test]
    fn test_parse_notation() {
        let tiles = tiles_from_str("19m 5p 3s 4w 2d 8f").unwrap();
        let faces: Vec<(Suit, u8)> = tiles.iter().map(|t| (t.suit, t.value)).collect();
        assert_eq!(
            faces,
            vec![
                (Suit::Wan, 1),
                (Suit::Wan, 9),
                (Suit::Tong, 5),
                (Suit::Tiao, 3),
                (Suit::Wind, 4),
                (Suit::Dragon, 2),
                (Suit::Flower, 8),
            ]
        );
        assert_eq!(tiles[6].id, TileId(6));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(tiles_from_str("5w").is_err());
        assert!(tiles_from_str("4d").is_err());
        assert!(tiles_from_str("12").is_err());
        assert!(tiles_from_str("m").is_err());
        assert!(tiles_from_str("1x").is_err());
    }

    #[test]
    fn test_suit_ordering() {
        assert!(Suit::Wan < Suit::Tong);
        assert!(Suit::Dragon < Suit::Flower);
    }
}
