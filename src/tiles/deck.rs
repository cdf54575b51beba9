//! Deck composition, shuffling and dealing.
//!
//! ## Order
//!
//! A `Deck` is an ordered list from head to tail. Draws take from the
//! tail. `Deck::fill` pushes each tile onto the head, so tiles come back
//! out in the order they went in: a shuffled tile list is drawn in
//! shuffled order.
//!
//! ## Dealing
//!
//! Tiles go out in rotation starting at the dealer, four at a time:
//! - 13-tile variant: three passes of four, one more each, one extra
//!   for the dealer (dealer 14, others 13).
//! - 16-tile variant: four passes of four, one extra for the dealer
//!   (dealer 17, others 16).
//!
//! Every hand is sorted once dealing is complete.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use super::tile::{Suit, Tile, TileId};
use crate::core::{MatchRng, Seat, SeatMap};

/// Rule variant, identified by hand size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Variant {
    /// 13-tile hands, 136 tiles, no flowers.
    Thirteen,
    /// 16-tile hands, 144 tiles including eight flowers.
    Sixteen,
}

impl Variant {
    /// Tiles in a non-dealer hand.
    #[must_use]
    pub const fn hand_size(self) -> usize {
        match self {
            Variant::Thirteen => 13,
            Variant::Sixteen => 16,
        }
    }

    /// Tiles in a full deck.
    #[must_use]
    pub const fn tile_count(self) -> usize {
        match self {
            Variant::Thirteen => 136,
            Variant::Sixteen => 144,
        }
    }

    #[must_use]
    pub const fn includes_flowers(self) -> bool {
        matches!(self, Variant::Sixteen)
    }

    /// Passes of four tiles per seat.
    #[must_use]
    pub const fn deal_passes(self) -> usize {
        match self {
            Variant::Thirteen => 3,
            Variant::Sixteen => 4,
        }
    }

    /// Tiles left in the wall right after a deal.
    #[must_use]
    pub const fn wall_after_deal(self) -> usize {
        self.tile_count() - 4 * self.hand_size() - 1
    }
}

impl TryFrom<u8> for Variant {
    type Error = InvalidVariant;

    fn try_from(size: u8) -> Result<Self, Self::Error> {
        match size {
            13 => Ok(Variant::Thirteen),
            16 => Ok(Variant::Sixteen),
            other => Err(InvalidVariant(other)),
        }
    }
}

impl From<Variant> for u8 {
    fn from(variant: Variant) -> Self {
        variant.hand_size() as u8
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-tile", self.hand_size())
    }
}

/// Rejected variant size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidVariant(pub u8);

impl fmt::Display for InvalidVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "variant must be 13 or 16, got {}", self.0)
    }
}

impl std::error::Error for InvalidVariant {}

/// Every tile of a variant in build order, ids `0..tile_count`.
///
/// Build order is suit-major: each face of wan, tong, tiao, wind and
/// dragon four times, then the eight flowers once each (16-tile only).
#[must_use]
pub fn build_tiles(variant: Variant) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(variant.tile_count());
    let suits = Suit::ALL
        .into_iter()
        .filter(|&s| s != Suit::Flower || variant.includes_flowers());

    for suit in suits {
        for value in 1..=suit.max_value() {
            for _ in 0..suit.copies() {
                let id = TileId(tiles.len() as u8);
                tiles.push(Tile::new(id, suit, value));
            }
        }
    }
    tiles
}

/// Sort a hand suit-major, value-minor. Equal faces keep their order.
pub fn sort_hand(hand: &mut [Tile]) {
    hand.sort_by_key(|t| (t.suit, t.value));
}

/// Ordered wall of tiles. Front is the head, back is the tail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    tiles: VecDeque<Tile>,
}

impl Deck {
    /// Push each tile onto the head in turn; draws replay `tiles` in order.
    pub fn fill(tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut deck = Self::default();
        for tile in tiles {
            deck.tiles.push_front(tile);
        }
        deck
    }

    /// A freshly shuffled full deck for the variant.
    pub fn shuffled(variant: Variant, rng: &mut MatchRng) -> Self {
        let mut tiles = build_tiles(variant);
        rng.shuffle(&mut tiles);
        Self::fill(tiles)
    }

    /// Rebuild from a head-to-tail listing.
    pub fn from_list(list: impl IntoIterator<Item = Tile>) -> Self {
        Self {
            tiles: list.into_iter().collect(),
        }
    }

    /// Head-to-tail listing.
    pub fn to_list(&self) -> Vec<Tile> {
        self.tiles.iter().copied().collect()
    }

    /// Take the tile at the tail.
    pub fn draw(&mut self) -> Option<Tile> {
        self.tiles.pop_back()
    }

    /// The tile the next draw would return.
    #[must_use]
    pub fn peek(&self) -> Option<&Tile> {
        self.tiles.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Deal starting hands, dealer first. `None` if the wall runs short,
    /// in which case the deck may be partially consumed.
    pub fn deal(&mut self, variant: Variant, dealer: Seat) -> Option<SeatMap<Vec<Tile>>> {
        let order = dealer.rotation();
        let mut hands: SeatMap<Vec<Tile>> =
            SeatMap::new(|_| Vec::with_capacity(variant.hand_size() + 1));

        for _ in 0..variant.deal_passes() {
            for &seat in &order {
                for _ in 0..4 {
                    hands[seat].push(self.draw()?);
                }
            }
        }
        if variant == Variant::Thirteen {
            for &seat in &order {
                hands[seat].push(self.draw()?);
            }
        }
        hands[dealer].push(self.draw()?);

        for (_, hand) in hands.iter_mut() {
            sort_hand(hand);
        }
        Some(hands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn seat(n: u8) -> Seat {
        Seat::new(n).unwrap()
    }

    #[test]
    fn test_composition_thirteen() {
        let tiles = build_tiles(Variant::Thirteen);
        assert_eq!(tiles.len(), 136);
        assert!(tiles.iter().all(|t| !t.is_flower()));

        let mut faces: FxHashMap<(Suit, u8), usize> = FxHashMap::default();
        for t in &tiles {
            *faces.entry((t.suit, t.value)).or_default() += 1;
        }
        assert_eq!(faces.len(), 34);
        assert!(faces.values().all(|&n| n == 4));
    }

    #[test]
    fn test_composition_sixteen() {
        let tiles = build_tiles(Variant::Sixteen);
        assert_eq!(tiles.len(), 144);
        let flowers: Vec<u8> = tiles.iter().filter(|t| t.is_flower()).map(|t| t.value).collect();
        assert_eq!(flowers, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_ids_unique_and_dense() {
        let tiles = build_tiles(Variant::Sixteen);
        for (i, t) in tiles.iter().enumerate() {
            assert_eq!(t.id, TileId(i as u8));
        }
    }

    #[test]
    fn test_fill_draws_in_input_order() {
        let tiles = build_tiles(Variant::Thirteen);
        let mut deck = Deck::fill(tiles.clone());
        assert_eq!(deck.peek(), Some(&tiles[0]));
        for expected in &tiles {
            assert_eq!(deck.draw().as_ref(), Some(expected));
        }
        assert!(deck.draw().is_none());
    }

    #[test]
    fn test_list_round_trip_preserves_draw_order() {
        let mut rng = MatchRng::from_key([9; 32]);
        let deck = Deck::shuffled(Variant::Sixteen, &mut rng);
        let mut restored = Deck::from_list(deck.to_list());
        let mut original = deck.clone();
        while let Some(t) = original.draw() {
            assert_eq!(restored.draw(), Some(t));
        }
    }

    #[test]
    fn test_deal_sizes_thirteen() {
        let mut deck = Deck::fill(build_tiles(Variant::Thirteen));
        let hands = deck.deal(Variant::Thirteen, seat(2)).unwrap();
        assert_eq!(hands[seat(2)].len(), 14);
        for s in [1, 3, 4] {
            assert_eq!(hands[seat(s)].len(), 13);
        }
        assert_eq!(deck.len(), 136 - 53);
        assert_eq!(deck.len(), Variant::Thirteen.wall_after_deal());
    }

    #[test]
    fn test_deal_sizes_sixteen() {
        let mut deck = Deck::fill(build_tiles(Variant::Sixteen));
        let hands = deck.deal(Variant::Sixteen, seat(4)).unwrap();
        assert_eq!(hands[seat(4)].len(), 17);
        for s in 1..=3 {
            assert_eq!(hands[seat(s)].len(), 16);
        }
        assert_eq!(deck.len(), 144 - 65);
    }

    #[test]
    fn test_deal_starts_at_dealer() {
        // unshuffled: the first four tiles drawn are the four 1 Wan
        let mut deck = Deck::fill(build_tiles(Variant::Thirteen));
        let hands = deck.deal(Variant::Thirteen, seat(3)).unwrap();
        let ones = hands[seat(3)]
            .iter()
            .filter(|t| t.suit == Suit::Wan && t.value == 1)
            .count();
        assert_eq!(ones, 4);
        assert_eq!(hands[seat(4)][0].value, 2);
    }

    #[test]
    fn test_deal_sorts_hands() {
        let mut rng = MatchRng::from_key([4; 32]);
        let mut deck = Deck::shuffled(Variant::Sixteen, &mut rng);
        let hands = deck.deal(Variant::Sixteen, seat(1)).unwrap();
        for (_, hand) in hands.iter() {
            assert!(hand.windows(2).all(|w| (w[0].suit, w[0].value) <= (w[1].suit, w[1].value)));
        }
    }

    #[test]
    fn test_deal_short_wall() {
        let mut deck = Deck::fill(build_tiles(Variant::Thirteen).into_iter().take(20));
        assert!(deck.deal(Variant::Thirteen, seat(1)).is_none());
    }

    #[test]
    fn test_variant_wire_form() {
        assert_eq!(Variant::try_from(13), Ok(Variant::Thirteen));
        assert_eq!(Variant::try_from(16), Ok(Variant::Sixteen));
        assert_eq!(Variant::try_from(14), Err(InvalidVariant(14)));
        assert_eq!(serde_json::to_string(&Variant::Sixteen).unwrap(), "16");
        assert!(serde_json::from_str::<Variant>("15").is_err());
    }
}
