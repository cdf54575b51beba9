//! Match state: the single persisted aggregate for one match.
//!
//! ## Stage
//!
//! ```text
//! WaitingPlayers -> DeterminePositions -> DetermineDealer -> Dealing
//!     -> PlayerDiscard <-> WaitAction <-> PlayerDraw
//!     -> RoundOver -> Dealing | GameOver
//! ```
//!
//! ## MatchState
//!
//! Everything a transition needs besides the wall and the hands, which
//! are stored under their own keys. Uses an `im::Vector` for the action
//! history so snapshots stay cheap.
//!
//! ## MatchStatus
//!
//! Lightweight summary kept under a separate key for listing matches.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::action::{ActionRecord, MatchAction};
use super::error::{ErrorKind, OpContext, Result};
use super::game_id::GameId;
use super::rng::Dice;
use super::seat::{Seat, SeatMap};
use crate::hand::Shapes;
use crate::machine::ClaimBoard;
use crate::round::GameRound;
use crate::tiles::{Tile, Variant};

/// Match lifecycle stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    WaitingPlayers,
    DeterminePositions,
    DetermineDealer,
    Dealing,
    PlayerDraw,
    PlayerDiscard,
    WaitAction,
    RoundOver,
    GameOver,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::WaitingPlayers => "WAITING_PLAYERS",
            Stage::DeterminePositions => "DETERMINE_POSITIONS",
            Stage::DetermineDealer => "DETERMINE_DEALER",
            Stage::Dealing => "DEALING",
            Stage::PlayerDraw => "PLAYER_DRAW",
            Stage::PlayerDiscard => "PLAYER_DISCARD",
            Stage::WaitAction => "WAIT_ACTION",
            Stage::RoundOver => "ROUND_OVER",
            Stage::GameOver => "GAME_OVER",
        }
    }

    /// Stages in which a hand is being played.
    #[must_use]
    pub const fn in_hand(self) -> bool {
        matches!(self, Stage::PlayerDraw | Stage::PlayerDiscard | Stage::WaitAction)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occupant of a seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
    pub is_bot: bool,
}

impl Player {
    #[must_use]
    pub fn new(seat: Seat, is_bot: bool) -> Self {
        let name = if is_bot {
            format!("Bot {}", seat.number())
        } else {
            format!("Player {}", seat.number())
        };
        Self { seat, name, is_bot }
    }

    /// Identity recorded in the status summary: `user:<seat>` or `bot`.
    #[must_use]
    pub fn identity(&self) -> String {
        if self.is_bot {
            "bot".to_string()
        } else {
            format!("user:{}", self.seat.number())
        }
    }
}

/// How the last hand ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// `None` when the wall ran out.
    pub winner: Option<Seat>,
    pub winning_tile: Option<Tile>,
    pub self_drawn: bool,
    pub shapes: Shapes,
}

impl RoundResult {
    /// The wall ran out with no winner.
    #[must_use]
    pub fn exhaustive_draw() -> Self {
        Self {
            winner: None,
            winning_tile: None,
            self_drawn: false,
            shapes: Shapes::new(),
        }
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Persisted state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub game_id: GameId,
    pub variant: Variant,
    pub stage: Stage,

    /// Seat that holds the turn, if any.
    pub current_seat: Option<Seat>,

    pub round: GameRound,
    pub dealer_seat: Option<Seat>,

    /// Most recent dice roll.
    pub dice: Dice,

    pub started: bool,
    pub finished: bool,
    pub seats: SeatMap<Player>,

    pub last_discard: Option<Tile>,
    pub last_discard_seat: Option<Seat>,
    pub pending_claims: ClaimBoard,

    pub last_result: Option<RoundResult>,

    /// Moves accepted during the current hand.
    pub history: Vector<ActionRecord>,
}

impl MatchState {
    /// Fresh state in `WaitingPlayers`. Seats listed in `bot_seats` are
    /// occupied by bots, the rest by humans.
    #[must_use]
    pub fn new(game_id: GameId, variant: Variant, bot_seats: &[Seat]) -> Self {
        Self {
            game_id,
            variant,
            stage: Stage::WaitingPlayers,
            current_seat: None,
            round: GameRound::first(),
            dealer_seat: None,
            dice: Dice::default(),
            started: true,
            finished: false,
            seats: SeatMap::new(|seat| Player::new(seat, bot_seats.contains(&seat))),
            last_discard: None,
            last_discard_seat: None,
            pending_claims: ClaimBoard::new(),
            last_result: None,
            history: Vector::new(),
        }
    }

    /// Fail unless the stage is one of `allowed`.
    pub fn require_stage(&self, ctx: &OpContext, allowed: &'static [Stage]) -> Result<()> {
        if self.stage == Stage::GameOver && !allowed.contains(&Stage::GameOver) {
            return ctx.fail(ErrorKind::MatchFinished);
        }
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            ctx.fail(ErrorKind::WrongStage {
                allowed,
                actual: self.stage,
            })
        }
    }

    /// Fail unless `seat` holds the turn.
    pub fn require_turn(&self, ctx: &OpContext, seat: Seat) -> Result<()> {
        if self.current_seat == Some(seat) {
            Ok(())
        } else {
            ctx.fail(ErrorKind::NotYourTurn {
                seat,
                current: self.current_seat,
            })
        }
    }

    #[must_use]
    pub fn is_bot(&self, seat: Seat) -> bool {
        self.seats[seat].is_bot
    }

    /// Append to the hand history.
    pub fn record(&mut self, seat: Option<Seat>, action: MatchAction, tile: Option<Tile>) {
        let sequence = self.history.len() as u32;
        self.history
            .push_back(ActionRecord::new(seat, action, tile, sequence));
    }

    /// Reset per-hand fields before a deal.
    pub fn reset_hand(&mut self) {
        self.last_discard = None;
        self.last_discard_seat = None;
        self.pending_claims.clear();
        self.last_result = None;
        self.history = Vector::new();
    }
}

impl AsRef<MatchState> for MatchState {
    fn as_ref(&self) -> &MatchState {
        self
    }
}

/// Listing summary for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatus {
    pub variant: Variant,

    /// Seat identities, `user:<seat>` or `bot`.
    pub seats: SeatMap<String>,

    /// Dealer key such as `player2`, once determined.
    pub dealer: Option<String>,

    /// Unix seconds at match start.
    pub start: u64,

    /// Round code such as `1-1`.
    pub progress: String,
}

impl MatchStatus {
    #[must_use]
    pub fn new(state: &MatchState, start: u64) -> Self {
        Self {
            variant: state.variant,
            seats: SeatMap::new(|seat| state.seats[seat].identity()),
            dealer: state.dealer_seat.map(Seat::player_key),
            start,
            progress: state.round.code(),
        }
    }

    /// Refresh the dealer and round from the current state.
    pub fn sync(&mut self, state: &MatchState) {
        self.dealer = state.dealer_seat.map(Seat::player_key);
        self.progress = state.round.code();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(n: u8) -> Seat {
        Seat::new(n).unwrap()
    }

    fn state() -> MatchState {
        MatchState::new(GameId::new("majiang_t"), Variant::Sixteen, &[seat(3), seat(4)])
    }

    #[test]
    fn test_new_state() {
        let state = state();
        assert_eq!(state.stage, Stage::WaitingPlayers);
        assert_eq!(state.round.code(), "1-1");
        assert!(!state.is_bot(seat(1)));
        assert!(state.is_bot(seat(4)));
        assert_eq!(state.seats[seat(2)].name, "Player 2");
        assert_eq!(state.seats[seat(3)].identity(), "bot");
        assert_eq!(state.seats[seat(1)].identity(), "user:1");
    }

    #[test]
    fn test_require_stage() {
        let mut state = state();
        let ctx = OpContext::new("roll_dealer", &state.game_id);
        let err = state.require_stage(&ctx, &[Stage::DetermineDealer]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::WrongStage { actual: Stage::WaitingPlayers, .. }));

        state.stage = Stage::GameOver;
        let err = state.require_stage(&ctx, &[Stage::DetermineDealer]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MatchFinished);
    }

    #[test]
    fn test_require_turn() {
        let mut state = state();
        let ctx = OpContext::new("discard_tile", &state.game_id);
        state.current_seat = Some(seat(2));
        assert!(state.require_turn(&ctx, seat(2)).is_ok());
        let err = state.require_turn(&ctx, seat(1)).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::NotYourTurn { seat: seat(1), current: Some(seat(2)) }
        );
    }

    #[test]
    fn test_history_sequence() {
        let mut state = state();
        state.record(None, MatchAction::Deal, None);
        state.record(Some(seat(1)), MatchAction::Draw, None);
        let seqs: Vec<u32> = state.history.iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![0, 1]);
        state.reset_hand();
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_stage_wire_names() {
        assert_eq!(serde_json::to_string(&Stage::WaitAction).unwrap(), "\"WAIT_ACTION\"");
        for stage in [Stage::WaitingPlayers, Stage::RoundOver, Stage::GameOver] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json.trim_matches('"'), stage.as_str());
        }
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut state = state();
        state.record(Some(seat(2)), MatchAction::Discard, None);
        let json = serde_json::to_string(&state).unwrap();
        let back: MatchState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_status_summary() {
        let mut state = state();
        let mut status = MatchStatus::new(&state, 1_700_000_000);
        assert_eq!(status.seats[seat(1)], "user:1");
        assert_eq!(status.seats[seat(4)], "bot");
        assert_eq!(status.dealer, None);

        state.dealer_seat = Some(seat(3));
        state.round = state.round.next().unwrap();
        status.sync(&state);
        assert_eq!(status.dealer.as_deref(), Some("player3"));
        assert_eq!(status.progress, "1-2");
    }
}
