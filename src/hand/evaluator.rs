//! Winning-hand detection.
//!
//! A hand is complete when its indexed tiles (flowers excluded) split
//! into one pair plus any number of melds, where a meld is a triplet of
//! one face or a run of three consecutive values in one number suit.
//!
//! The search fixes each candidate pair in turn, then always resolves the
//! lowest remaining index first: either as a triplet or as the start of a
//! run. Each branch works on its own copy of the count array.

use crate::tiles::{Tile, TileCounts, INDEX_COUNT, WIND_START};

/// Whether the hand is a complete winning shape.
///
/// ```
/// use mahjong_match::hand::can_hu;
/// use mahjong_match::tiles::tiles_from_str;
///
/// let hand = tiles_from_str("123m456p789s111w22d").unwrap();
/// assert!(can_hu(&hand));
/// ```
#[must_use]
pub fn can_hu(hand: &[Tile]) -> bool {
    can_hu_counts(&TileCounts::from_tiles(hand))
}

/// Whether `hand` plus one extra tile is complete.
#[must_use]
pub fn can_hu_with(hand: &[Tile], extra: &Tile) -> bool {
    can_hu_counts(&TileCounts::from_tiles(hand.iter().chain(std::iter::once(extra))))
}

/// Count-array form of [`can_hu`].
#[must_use]
pub fn can_hu_counts(counts: &TileCounts) -> bool {
    if counts.total() % 3 != 2 {
        return false;
    }
    (0..INDEX_COUNT).any(|pair| {
        let mut rest = *counts;
        rest.take(pair, 2) && melds_only(rest)
    })
}

/// Indices whose addition would complete the hand.
#[must_use]
pub fn waiting_indices(hand: &[Tile]) -> Vec<usize> {
    let counts = TileCounts::from_tiles(hand);
    (0..INDEX_COUNT)
        .filter(|&index| {
            let mut with = counts;
            with[index] += 1;
            with[index] <= 4 && can_hu_counts(&with)
        })
        .collect()
}

/// Whether `index` can open a run (number suit, value 1-7).
#[must_use]
pub const fn starts_run(index: usize) -> bool {
    index < WIND_START && index % 9 <= 6
}

fn melds_only(counts: TileCounts) -> bool {
    let Some(low) = counts.first_nonzero() else {
        return true;
    };

    let mut triplet = counts;
    if triplet.take(low, 3) && melds_only(triplet) {
        return true;
    }

    if starts_run(low) {
        let mut run = counts;
        if run.take(low, 1) && run.take(low + 1, 1) && run.take(low + 2, 1) && melds_only(run) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::tiles_from_str;

    fn hu(notation: &str) -> bool {
        can_hu(&tiles_from_str(notation).unwrap())
    }

    #[test]
    fn test_standard_complete_hand() {
        assert!(hu("123m456p789s111w22d"));
    }

    #[test]
    fn test_wrong_modulus_rejected() {
        assert!(!hu("123m456p789s111w2d"));
        assert!(!hu(""));
        assert!(!hu("1m"));
    }

    #[test]
    fn test_pair_only() {
        assert!(hu("55p"));
        assert!(!hu("56p"));
    }

    #[test]
    fn test_runs_do_not_wrap_suits() {
        // 8m 9m 1p is not a run
        assert!(!hu("89m1p55s"));
        assert!(hu("789m55s"));
    }

    #[test]
    fn test_honors_only_as_triplets() {
        assert!(!hu("123w44d"));
        assert!(hu("111w44d"));
        assert!(!hu("1w2w3w 44d"));
    }

    #[test]
    fn test_ambiguous_decomposition() {
        // 111222333m + 44p: triplets or three identical runs
        assert!(hu("111222333m44p"));
        // 1112345678999m + 5m: nine gates shape
        assert!(hu("11123455678999m"));
    }

    #[test]
    fn test_triplet_first_needs_backtracking() {
        // 111m23m: triplet-first leaves 23m stranded; run 123m + pair 11m works
        assert!(hu("11123m"));
    }

    #[test]
    fn test_flowers_ignored() {
        assert!(hu("123m456p789s111w22d1f5f"));
        assert!(!hu("1f2f"));
    }

    #[test]
    fn test_sixteen_tile_hand() {
        assert!(hu("123m456m789m111p555s99s"));
        assert!(!hu("123m456m789m111p555s98s"));
    }

    #[test]
    fn test_can_hu_with_extra() {
        let hand = tiles_from_str("123m456p789s111w2d").unwrap();
        let extra = tiles_from_str("2d").unwrap()[0];
        assert!(can_hu_with(&hand, &extra));
        let wrong = tiles_from_str("3d").unwrap()[0];
        assert!(!can_hu_with(&hand, &wrong));
    }

    #[test]
    fn test_waiting_indices() {
        // 23m + 55p waits on 1m and 4m
        let hand = tiles_from_str("23m55p").unwrap();
        assert_eq!(waiting_indices(&hand), vec![0, 3]);
    }

    #[test]
    fn test_starts_run_bounds() {
        assert!(starts_run(0));
        assert!(starts_run(6));
        assert!(!starts_run(7));
        assert!(!starts_run(8));
        assert!(starts_run(24));
        assert!(!starts_run(25));
        assert!(!starts_run(27));
    }
}
