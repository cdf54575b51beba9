//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! Type-safe seat number for the four seats of a match, numbered 1-4.
//! All wraparound arithmetic (next seat, dealer rotation, dice-to-seat)
//! lives here so callers never do `(n % 4) + 1` by hand.
//!
//! ## SeatMap
//!
//! Fixed four-entry storage indexed by `Seat`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Number of seats at a table.
pub const SEAT_COUNT: usize = 4;

/// A seat at the table, numbered 1-4.
///
/// ```
/// use mahjong_match::core::Seat;
///
/// let north = Seat::new(4).unwrap();
/// assert_eq!(north.next(), Seat::new(1).unwrap());
/// assert!(Seat::new(0).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seat(u8);

impl Seat {
    /// Create a seat from its 1-based number.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number as usize <= SEAT_COUNT {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Get the 1-based seat number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Get the 0-based storage index.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Iterate over all seats in table order (1, 2, 3, 4).
    pub fn all() -> impl Iterator<Item = Seat> {
        (1..=SEAT_COUNT as u8).map(Seat)
    }

    /// The seat that plays after this one. Seat 4 wraps to seat 1.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 % SEAT_COUNT as u8 + 1)
    }

    /// All four seats in play order, starting with this one.
    #[must_use]
    pub fn rotation(self) -> [Seat; SEAT_COUNT] {
        let mut order = [self; SEAT_COUNT];
        for i in 1..SEAT_COUNT {
            order[i] = order[i - 1].next();
        }
        order
    }

    /// The other three seats in play order, starting with the next seat.
    pub fn others(self) -> impl Iterator<Item = Seat> {
        self.rotation().into_iter().skip(1)
    }

    /// Map a dice total onto a seat: `((total - 1) mod 4) + 1`.
    ///
    /// ```
    /// use mahjong_match::core::Seat;
    ///
    /// assert_eq!(Seat::from_dice_total(5).number(), 1);
    /// assert_eq!(Seat::from_dice_total(8).number(), 4);
    /// assert_eq!(Seat::from_dice_total(12).number(), 4);
    /// ```
    #[must_use]
    pub const fn from_dice_total(total: u8) -> Self {
        // (total + 3) == (total - 1) mod 4 without underflow at zero
        Self(((total as u16 + 3) % SEAT_COUNT as u16) as u8 + 1)
    }

    /// Storage-facing key fragment, e.g. `player3`.
    #[must_use]
    pub fn player_key(self) -> String {
        format!("player{}", self.0)
    }
}

impl TryFrom<u8> for Seat {
    type Error = InvalidSeat;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Seat::new(number).ok_or(InvalidSeat(number))
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.0
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Rejected seat number (outside 1-4).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidSeat(pub u8);

impl fmt::Display for InvalidSeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat must be 1-{}, got {}", SEAT_COUNT, self.0)
    }
}

impl std::error::Error for InvalidSeat {}

/// Per-seat data storage with O(1) access.
///
/// ```
/// use mahjong_match::core::{Seat, SeatMap};
///
/// let mut points: SeatMap<i32> = SeatMap::new(|_| 0);
/// let east = Seat::new(1).unwrap();
/// points[east] += 8;
/// assert_eq!(points[east], 8);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMap<T> {
    data: [T; SEAT_COUNT],
}

impl<T> SeatMap<T> {
    /// Create a SeatMap with values from a factory function.
    pub fn new(factory: impl Fn(Seat) -> T) -> Self {
        Self {
            data: [Seat(1), Seat(2), Seat(3), Seat(4)].map(factory),
        }
    }

    /// Create a SeatMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        Seat::all().zip(self.data.iter())
    }

    /// Iterate over (Seat, &mut T) pairs in table order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        Seat::all().zip(self.data.iter_mut())
    }

    /// Iterate over values in table order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(n: u8) -> Seat {
        Seat::new(n).unwrap()
    }

    #[test]
    fn test_seat_bounds() {
        assert!(Seat::new(0).is_none());
        assert!(Seat::new(5).is_none());
        assert_eq!(seat(1).index(), 0);
        assert_eq!(seat(4).index(), 3);
        assert_eq!(format!("{}", seat(2)), "Seat 2");
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(seat(1).next(), seat(2));
        assert_eq!(seat(3).next(), seat(4));
        assert_eq!(seat(4).next(), seat(1));
    }

    #[test]
    fn test_rotation_from_dealer() {
        assert_eq!(seat(3).rotation(), [seat(3), seat(4), seat(1), seat(2)]);
        let others: Vec<_> = seat(4).others().collect();
        assert_eq!(others, vec![seat(1), seat(2), seat(3)]);
    }

    #[test]
    fn test_dice_total_mapping() {
        // remainder 0 wraps to seat 4
        assert_eq!(Seat::from_dice_total(4), seat(4));
        assert_eq!(Seat::from_dice_total(8), seat(4));
        assert_eq!(Seat::from_dice_total(12), seat(4));
        assert_eq!(Seat::from_dice_total(2), seat(2));
        assert_eq!(Seat::from_dice_total(7), seat(3));
        assert_eq!(Seat::from_dice_total(9), seat(1));
        for total in 2..=12u8 {
            let expected = ((total - 1) % 4) + 1;
            assert_eq!(Seat::from_dice_total(total).number(), expected);
        }
    }

    #[test]
    fn test_seat_serde_rejects_out_of_range() {
        let json = serde_json::to_string(&seat(3)).unwrap();
        assert_eq!(json, "3");
        assert!(serde_json::from_str::<Seat>("0").is_err());
        assert!(serde_json::from_str::<Seat>("5").is_err());
    }

    #[test]
    fn test_seat_map_indexing() {
        let mut map: SeatMap<u8> = SeatMap::new(|s| s.number() * 10);
        assert_eq!(map[seat(1)], 10);
        assert_eq!(map[seat(4)], 40);

        map[seat(2)] = 7;
        let pairs: Vec<_> = map.iter().map(|(s, v)| (s.number(), *v)).collect();
        assert_eq!(pairs, vec![(1, 10), (2, 7), (3, 30), (4, 40)]);
    }

    #[test]
    fn test_seat_map_serialization() {
        let map: SeatMap<Vec<u8>> = SeatMap::new(|s| vec![s.number()]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "[[1],[2],[3],[4]]");
        let back: SeatMap<Vec<u8>> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
