//! # mahjong-match
//!
//! A four-seat Mahjong match engine: fair dealing, hand evaluation, claim
//! resolution and bot seats, over a pluggable key-value store.
//!
//! ## Design Principles
//!
//! 1. **One Persisted Aggregate**: A match is a `MatchState` plus a wall
//!    and four hands, all behind the `MatchStore` trait. Nothing lives
//!    only in memory between actions.
//!
//! 2. **All or Nothing**: Every transition validates first and commits
//!    its writes as one `WriteBatch`. A rejected action changes nothing.
//!
//! 3. **Unpredictable Walls**: Every shuffle and dice roll uses a fresh
//!    ChaCha20 stream keyed from OS entropy.
//!
//! ## Modules
//!
//! - `core`: Seats, ids, randomness, configuration, errors, state
//! - `tiles`: Tile identity, count arrays, the deck and dealing
//! - `hand`: Completeness check, special shapes, discard advice
//! - `round`: Prevailing and hand wind progression
//! - `machine`: Claim arbitration and stage transitions
//! - `store`: Storage capability and the in-memory store
//! - `service`: Wall, hand and record access over a store
//! - `server`: Request surface, per-match locking, bot scheduling

pub mod core;
pub mod tiles;
pub mod hand;
pub mod round;
pub mod machine;
pub mod store;
pub mod service;
pub mod server;

// Re-export commonly used types
pub use crate::core::{
    Seat, SeatMap, GameId, Dice, MatchRng, MatchConfig,
    ErrorCategory, ErrorKind, MatchError, Result,
    ActionRecord, ClaimKind, MatchAction,
    MatchState, MatchStatus, Player, RoundResult, Stage,
};

pub use crate::tiles::{Suit, Tile, TileId, TileCounts, Deck, Variant};

pub use crate::hand::{can_hu, classify, best_discard, HandShape};

pub use crate::round::{GameRound, Wind};

pub use crate::machine::{ClaimBoard, Resolution, MatchMachine, DealOutcome, DrawOutcome};

pub use crate::store::{MatchStore, MemoryStore, WriteBatch};

pub use crate::service::{DeckService, HandService, HandView};

pub use crate::server::{MatchServer, MatchEvent, Request, Response, Payload};
