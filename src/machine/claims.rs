//! Claim collection and priority resolution after a discard.
//!
//! Declarations are held in a seat-indexed array, not a map, so that
//! resolution is deterministic:
//! 1. The three seats other than the discarder may each declare once
//!    (a later declaration by the same seat replaces the earlier one)
//! 2. Resolution triggers as soon as any seat declares `hu`, or once all
//!    three eligible seats have declared
//! 3. Seats are scanned in play order starting after the discarder; the
//!    first seat holding a strictly higher priority than everything seen
//!    so far wins, so equal-priority ties go to the earliest seat
//! 4. If nobody beat `pass`, play moves on to the seat after the
//!    discarder

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ClaimKind, Seat, SeatMap};

/// Outcome of a completed claim window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// A seat won on the discard.
    Win(Seat),
    /// A seat took the discard for a chow, pong or kong.
    Meld { seat: Seat, kind: ClaimKind },
    /// Everyone passed.
    AllPass,
}

/// Pending declarations against the latest discard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBoard {
    claims: SeatMap<Option<ClaimKind>>,
}

impl ClaimBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every declaration.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Record a declaration, returning the one it replaced.
    pub fn declare(&mut self, seat: Seat, kind: ClaimKind) -> Option<ClaimKind> {
        self.claims[seat].replace(kind)
    }

    #[must_use]
    pub fn get(&self, seat: Seat) -> Option<ClaimKind> {
        self.claims[seat]
    }

    #[must_use]
    pub fn declared_count(&self) -> usize {
        self.claims.values().filter(|c| c.is_some()).count()
    }

    #[must_use]
    pub fn has_hu(&self) -> bool {
        self.claims.values().any(|c| *c == Some(ClaimKind::Hu))
    }

    /// Eligible seats that have not declared yet, in play order.
    #[must_use]
    pub fn pending_seats(&self, discarder: Seat) -> SmallVec<[Seat; 3]> {
        discarder
            .others()
            .filter(|&seat| self.claims[seat].is_none())
            .collect()
    }

    /// Whether the window can close now.
    #[must_use]
    pub fn is_ready(&self, discarder: Seat) -> bool {
        self.has_hu() || self.pending_seats(discarder).is_empty()
    }

    /// Pick the winning declaration. Undeclared seats count as absent.
    #[must_use]
    pub fn resolve(&self, discarder: Seat) -> Resolution {
        let mut best: Option<(Seat, ClaimKind)> = None;
        for seat in discarder.others() {
            let Some(kind) = self.claims[seat] else { continue };
            if kind == ClaimKind::Pass {
                continue;
            }
            if best.map_or(true, |(_, top)| kind.priority() > top.priority()) {
                best = Some((seat, kind));
            }
        }

        match best {
            Some((seat, ClaimKind::Hu)) => Resolution::Win(seat),
            Some((seat, kind)) => Resolution::Meld { seat, kind },
            None => Resolution::AllPass,
        }
    }
}
