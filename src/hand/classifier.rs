//! Special hand shapes.
//!
//! Each shape is a yes/no predicate over a hand. Shapes are reported
//! for information only; none of them affects whether a hand wins.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::evaluator::can_hu_counts;
use crate::tiles::{Tile, TileCounts, DRAGON_START, WIND_START};

/// A named special shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandShape {
    AllTriplets,
    BigFourWinds,
    SmallFourWinds,
    BigThreeDragons,
    SmallThreeDragons,
}

/// Shapes matched by one hand.
pub type Shapes = SmallVec<[HandShape; 2]>;

impl HandShape {
    pub const ALL: [HandShape; 5] = [
        HandShape::AllTriplets,
        HandShape::BigFourWinds,
        HandShape::SmallFourWinds,
        HandShape::BigThreeDragons,
        HandShape::SmallThreeDragons,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            HandShape::AllTriplets => "All Triplets",
            HandShape::BigFourWinds => "Big Four Winds",
            HandShape::SmallFourWinds => "Small Four Winds",
            HandShape::BigThreeDragons => "Big Three Dragons",
            HandShape::SmallThreeDragons => "Small Three Dragons",
        }
    }

    /// Whether the hand has this shape.
    #[must_use]
    pub fn matches(self, hand: &[Tile]) -> bool {
        HandProfile::new(hand).has(self)
    }
}

impl fmt::Display for HandShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Triplet and exact-pair tallies over an honor group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct GroupTally {
    triplets: usize,
    pairs: usize,
}

impl GroupTally {
    fn over(counts: &TileCounts, start: usize, len: usize) -> Self {
        let mut tally = Self::default();
        for index in start..start + len {
            match counts[index] {
                0 | 1 => {}
                2 => tally.pairs += 1,
                _ => tally.triplets += 1,
            }
        }
        tally
    }
}

/// Counts computed once and shared by every shape predicate.
struct HandProfile {
    counts: TileCounts,
    complete: bool,
    winds: GroupTally,
    dragons: GroupTally,
}

impl HandProfile {
    fn new(hand: &[Tile]) -> Self {
        let counts = TileCounts::from_tiles(hand);
        Self {
            complete: can_hu_counts(&counts),
            winds: GroupTally::over(&counts, WIND_START, 4),
            dragons: GroupTally::over(&counts, DRAGON_START, 3),
            counts,
        }
    }

    fn has(&self, shape: HandShape) -> bool {
        if !self.complete {
            return false;
        }
        match shape {
            HandShape::AllTriplets => self.all_triplets(),
            HandShape::BigFourWinds => self.winds.triplets == 4,
            HandShape::SmallFourWinds => self.winds.triplets == 3 && self.winds.pairs == 1,
            HandShape::BigThreeDragons => self.dragons.triplets == 3,
            HandShape::SmallThreeDragons => self.dragons.triplets == 2 && self.dragons.pairs == 1,
        }
    }

    fn all_triplets(&self) -> bool {
        let mut triplets = 0;
        let mut pairs = 0;
        for (_, count) in self.counts.present() {
            match count {
                2 => pairs += 1,
                3 => triplets += 1,
                _ => return false,
            }
        }
        pairs == 1 && triplets * 3 + 2 == self.counts.total()
    }
}

/// Every shape the hand has, in [`HandShape::ALL`] order.
///
/// ```
/// use mahjong_match::hand::{classify, HandShape};
/// use mahjong_match::tiles::tiles_from_str;
///
/// let hand = tiles_from_str("111222333444w55m").unwrap();
/// assert!(classify(&hand).contains(&HandShape::BigFourWinds));
/// ```
#[must_use]
pub fn classify(hand: &[Tile]) -> Shapes {
    let profile = HandProfile::new(hand);
    HandShape::ALL
        .into_iter()
        .filter(|&shape| profile.has(shape))
        .collect()
}

#[must_use]
pub fn is_all_triplets(hand: &[Tile]) -> bool {
    HandShape::AllTriplets.matches(hand)
}

#[must_use]
pub fn is_big_four_winds(hand: &[Tile]) -> bool {
    HandShape::BigFourWinds.matches(hand)
}

#[must_use]
pub fn is_small_four_winds(hand: &[Tile]) -> bool {
    HandShape::SmallFourWinds.matches(hand)
}

#[must_use]
pub fn is_big_three_dragons(hand: &[Tile]) -> bool {
    HandShape::BigThreeDragons.matches(hand)
}

#[must_use]
pub fn is_small_three_dragons(hand: &[Tile]) -> bool {
    HandShape::SmallThreeDragons.matches(hand)
}
