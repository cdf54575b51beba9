//! Discard advice for bot seats.
//!
//! Greedy single-tile heuristic: score each distinct face by how much it
//! contributes to the hand and discard the lowest. Lower is worse.
//!
//! | Feature                                 | Score |
//! |-----------------------------------------|-------|
//! | triplet (3+ copies)                     | +100  |
//! | pair                                    | +50   |
//! | isolated honor                          | 0     |
//! | number tile, value 1 or 9               | +5    |
//! | number tile, value 2 or 8               | +10   |
//! | number tile, value 3-7                  | +15   |
//! | adjacent neighbor, per side             | +20   |
//! | adjacent neighbor that completes a run  | +30   |
//! | one-gap neighbor with the middle empty  | +10   |
//!
//! Flowers are always discarded first.

use super::evaluator::starts_run;
use crate::tiles::{Tile, TileCounts, WIND_START};

const TRIPLET: u32 = 100;
const PAIR: u32 = 50;
const TERMINAL: u32 = 5;
const NEAR_TERMINAL: u32 = 10;
const MIDDLE: u32 = 15;
const NEIGHBOR: u32 = 20;
const RUN: u32 = 30;
const GAP: u32 = 10;

/// The tile a bot should throw away.
///
/// Returns the first flower in hand order if there is one. Otherwise
/// the tile whose face scores lowest; ties go to the earliest tile in
/// hand order. `None` only for an empty hand.
///
/// ```
/// use mahjong_match::hand::best_discard;
/// use mahjong_match::tiles::{tiles_from_str, Suit};
///
/// let hand = tiles_from_str("123m555p12w89s").unwrap();
/// let tile = best_discard(&hand).unwrap();
/// assert_eq!(tile.suit, Suit::Wind);
/// ```
#[must_use]
pub fn best_discard(hand: &[Tile]) -> Option<Tile> {
    if let Some(flower) = hand.iter().find(|t| t.index().is_none()) {
        return Some(*flower);
    }

    let counts = TileCounts::from_tiles(hand);
    let mut best: Option<(u32, Tile)> = None;
    let mut seen = [false; crate::tiles::INDEX_COUNT];

    for tile in hand {
        let Some(index) = tile.index() else { continue };
        if std::mem::replace(&mut seen[index], true) {
            continue;
        }
        let score = tile_score(index, &counts);
        if best.map_or(true, |(low, _)| score < low) {
            best = Some((score, *tile));
        }
    }
    best.map(|(_, tile)| tile)
}

/// Keep-value of the face at `index` within `counts`.
#[must_use]
pub fn tile_score(index: usize, counts: &TileCounts) -> u32 {
    let mut score = match counts.get(index) {
        0 | 1 => 0,
        2 => PAIR,
        _ => TRIPLET,
    };
    if index >= WIND_START {
        return score;
    }

    score += match index % 9 + 1 {
        1 | 9 => TERMINAL,
        2 | 8 => NEAR_TERMINAL,
        _ => MIDDLE,
    };

    let suit_low = index / 9 * 9;
    let suit_high = suit_low + 8;
    let held = |i: usize| counts.get(i) > 0;

    if index > suit_low && held(index - 1) {
        score += NEIGHBOR;
        if index - 1 > suit_low && held(index - 2) {
            score += RUN;
        }
    }
    if index < suit_high && held(index + 1) {
        score += NEIGHBOR;
        if starts_run(index) && held(index + 2) {
            score += RUN;
        }
    }

    if index >= suit_low + 2 && held(index - 2) && !held(index - 1) {
        score += GAP;
    }
    if index + 2 <= suit_high && held(index + 2) && !held(index + 1) {
        score += GAP;
    }
    score
}
