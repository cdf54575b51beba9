//! Cryptographically keyed randomness for shuffling and dice.
//!
//! ## Key Features
//!
//! - **Unpredictable**: every `MatchRng` is keyed from fresh OS entropy
//!   (32-byte ChaCha20 key plus a 64-bit stream id). Nothing is cached
//!   across operations.
//! - **Uniform shuffle**: Fisher-Yates from the last index down to 1,
//!   drawing `j` from the keystream modulo `i + 1`.
//! - **Fallible keying**: if the entropy source fails the operation is
//!   aborted with an `EntropyError`; there is no weaker fallback.
//!
//! ```
//! use mahjong_match::core::MatchRng;
//!
//! let mut rng = MatchRng::from_entropy().expect("os entropy");
//! let dice = rng.roll_dice();
//! assert!((2..=12).contains(&dice.total));
//! ```

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The entropy source could not produce key material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntropyError(String);

impl EntropyError {
    /// Describe the failure.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for EntropyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entropy source failed: {}", self.0)
    }
}

impl std::error::Error for EntropyError {}

impl From<rand::Error> for EntropyError {
    fn from(err: rand::Error) -> Self {
        Self(err.to_string())
    }
}

/// One roll of two six-sided dice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    pub die1: u8,
    pub die2: u8,
    pub total: u8,
}

impl Dice {
    /// Build a roll from two die faces.
    #[must_use]
    pub const fn new(die1: u8, die2: u8) -> Self {
        Self {
            die1,
            die2,
            total: die1 + die2,
        }
    }
}

/// ChaCha20 keystream keyed from an external entropy source.
pub struct MatchRng {
    inner: ChaCha20Rng,
}

impl MatchRng {
    /// Key a new generator from the operating system's entropy source.
    pub fn from_entropy() -> Result<Self, EntropyError> {
        Self::from_source(&mut OsRng)
    }

    /// Key a new generator from any entropy source.
    ///
    /// Reads a 32-byte key and an 8-byte stream id. Any read failure is
    /// surfaced unchanged.
    pub fn from_source<R: RngCore + ?Sized>(source: &mut R) -> Result<Self, EntropyError> {
        let mut key = [0u8; 32];
        source.try_fill_bytes(&mut key)?;
        let mut stream = [0u8; 8];
        source.try_fill_bytes(&mut stream)?;

        let mut inner = ChaCha20Rng::from_seed(key);
        inner.set_stream(u64::from_le_bytes(stream));
        Ok(Self { inner })
    }

    #[cfg(test)]
    pub(crate) fn from_key(key: [u8; 32]) -> Self {
        Self {
            inner: ChaCha20Rng::from_seed(key),
        }
    }

    /// Next little-endian u64 from the keystream.
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// A value in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.next_u64() % bound as u64) as usize
    }

    /// Shuffle a slice in place (Fisher-Yates, last index down to 1).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }

    /// Roll one six-sided die.
    pub fn roll_die(&mut self) -> u8 {
        self.below(6) as u8 + 1
    }

    /// Roll two dice.
    pub fn roll_dice(&mut self) -> Dice {
        let die1 = self.roll_die();
        let die2 = self.roll_die();
        Dice::new(die1, die2)
    }
}

impl fmt::Debug for MatchRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // keystream state stays out of logs
        f.debug_struct("MatchRng").finish_non_exhaustive()
    }
}
