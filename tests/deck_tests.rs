//! Deck composition, shuffling and dealing.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;

use mahjong_match::core::{GameId, MatchRng, Seat};
use mahjong_match::service::DeckService;
use mahjong_match::store::MemoryStore;
use mahjong_match::tiles::{build_tiles, Deck, Suit, Tile, Variant};

fn seeded(seed: u64) -> MatchRng {
    MatchRng::from_source(&mut StdRng::seed_from_u64(seed)).unwrap()
}

fn face_counts(tiles: &[Tile]) -> FxHashMap<(Suit, u8), usize> {
    let mut counts = FxHashMap::default();
    for tile in tiles {
        *counts.entry((tile.suit, tile.value)).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_sixteen_tile_composition() {
    let tiles = build_tiles(Variant::Sixteen);
    assert_eq!(tiles.len(), 144);

    let counts = face_counts(&tiles);
    for suit in [Suit::Wan, Suit::Tong, Suit::Tiao] {
        for value in 1..=9 {
            assert_eq!(counts[&(suit, value)], 4, "{:?} {}", suit, value);
        }
    }
    for value in 1..=4 {
        assert_eq!(counts[&(Suit::Wind, value)], 4);
    }
    for value in 1..=3 {
        assert_eq!(counts[&(Suit::Dragon, value)], 4);
    }
    for value in 1..=8 {
        assert_eq!(counts[&(Suit::Flower, value)], 1);
    }
}

#[test]
fn test_thirteen_tile_has_no_flowers() {
    let tiles = build_tiles(Variant::Thirteen);
    assert_eq!(tiles.len(), 136);
    assert!(tiles.iter().all(|t| t.suit != Suit::Flower));
    assert!(tiles.iter().all(|t| t.index().is_some()));
}

#[test]
fn test_ids_increase_from_zero() {
    for variant in [Variant::Thirteen, Variant::Sixteen] {
        let tiles = build_tiles(variant);
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.id.0 as usize, i);
        }
    }
}

#[test]
fn test_deal_sizes_for_every_dealer() {
    for variant in [Variant::Thirteen, Variant::Sixteen] {
        for dealer in Seat::all() {
            let mut deck = Deck::shuffled(variant, &mut seeded(u64::from(dealer.number())));
            let hands = deck.deal(variant, dealer).unwrap();
            for (seat, hand) in hands.iter() {
                let expected = variant.hand_size() + usize::from(seat == dealer);
                assert_eq!(hand.len(), expected);
                assert!(hand.windows(2).all(|w| (w[0].suit, w[0].value) <= (w[1].suit, w[1].value)));
            }
            assert_eq!(deck.len(), variant.wall_after_deal());
        }
    }
}

#[test]
fn test_stored_wall_draws_in_shuffled_order() {
    let store = MemoryStore::new();
    let service = DeckService::new(&store);
    let id = GameId::new("wall");
    service.init(&id, Variant::Thirteen).unwrap();

    let mut drawn = Vec::new();
    while service.count(&id).unwrap() > 0 {
        drawn.push(service.draw(&id).unwrap());
    }
    assert_eq!(drawn.len(), 136);
    let mut ids: Vec<u8> = drawn.iter().map(|t| t.id.0).collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..136).collect::<Vec<u8>>());
}

#[test]
fn test_fresh_walls_differ() {
    let store = MemoryStore::new();
    let service = DeckService::new(&store);
    let a = GameId::new("a");
    let b = GameId::new("b");
    service.init(&a, Variant::Sixteen).unwrap();
    service.init(&b, Variant::Sixteen).unwrap();

    let first: Vec<Tile> = (0..20).map(|_| service.draw(&a).unwrap()).collect();
    let second: Vec<Tile> = (0..20).map(|_| service.draw(&b).unwrap()).collect();
    assert_ne!(first, second);
}

proptest! {
    #[test]
    fn shuffle_is_a_permutation(seed in any::<u64>(), sixteen in any::<bool>()) {
        let variant = if sixteen { Variant::Sixteen } else { Variant::Thirteen };
        let mut tiles = build_tiles(variant);
        seeded(seed).shuffle(&mut tiles);

        prop_assert_eq!(tiles.len(), variant.tile_count());
        prop_assert_eq!(face_counts(&tiles), face_counts(&build_tiles(variant)));
        let mut ids: Vec<u8> = tiles.iter().map(|t| t.id.0).collect();
        ids.sort_unstable();
        prop_assert!(ids.iter().enumerate().all(|(i, &id)| id as usize == i));
    }

    #[test]
    fn deal_conserves_tiles(seed in any::<u64>(), dealer in 1u8..=4) {
        let dealer = Seat::new(dealer).unwrap();
        let mut deck = Deck::shuffled(Variant::Sixteen, &mut seeded(seed));
        let hands = deck.deal(Variant::Sixteen, dealer).unwrap();

        let mut all: Vec<Tile> = deck.to_list();
        for hand in hands.values() {
            all.extend(hand.iter().copied());
        }
        prop_assert_eq!(face_counts(&all), face_counts(&build_tiles(Variant::Sixteen)));
    }
}
