//! Core match types: seats, ids, randomness, configuration, errors,
//! claims and the persisted state aggregate.

pub mod seat;
pub mod game_id;
pub mod rng;
pub mod config;
pub mod error;
pub mod action;
pub mod state;

pub use seat::{InvalidSeat, Seat, SeatMap, SEAT_COUNT};
pub use game_id::GameId;
pub use rng::{Dice, EntropyError, MatchRng};
pub use config::MatchConfig;
pub use error::{ErrorCategory, ErrorKind, MatchError, OpContext, Result};
pub use action::{ActionRecord, ClaimKind, MatchAction};
pub use state::{MatchState, MatchStatus, Player, RoundResult, Stage};
