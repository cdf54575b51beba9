//! Bot seats.
//!
//! A bot never plans ahead. It takes a win whenever the hand completes,
//! otherwise it draws when it must and discards the tile the advisor
//! scores lowest. Against another seat's discard it only ever claims
//! `hu` or passes.

use log::info;
use std::fmt;

use crate::core::{ClaimKind, GameId, MatchState, Result, Seat, SeatMap, Stage};
use crate::hand::{best_discard, can_hu, can_hu_with};
use crate::machine::MatchMachine;
use crate::store::MatchStore;
use crate::tiles::Tile;

/// A move chosen for a bot seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotMove {
    Draw(Seat),
    Discard { seat: Seat, tile: Tile },
    DeclareWin(Seat),
    Claim { seat: Seat, kind: ClaimKind },
}

impl BotMove {
    #[must_use]
    pub fn seat(&self) -> Seat {
        match *self {
            BotMove::Draw(seat) | BotMove::DeclareWin(seat) => seat,
            BotMove::Discard { seat, .. } | BotMove::Claim { seat, .. } => seat,
        }
    }
}

impl fmt::Display for BotMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotMove::Draw(seat) => write!(f, "{} draws", seat),
            BotMove::Discard { seat, tile } => write!(f, "{} discards {}", seat, tile),
            BotMove::DeclareWin(seat) => write!(f, "{} declares a self-drawn win", seat),
            BotMove::Claim { seat, kind } => write!(f, "{} declares {}", seat, kind),
        }
    }
}

/// Bot seats still owing a declaration against the current discard.
fn undeclared_bots(state: &MatchState) -> impl Iterator<Item = Seat> + '_ {
    state
        .last_discard_seat
        .into_iter()
        .flat_map(Seat::others)
        .filter(move |&seat| state.is_bot(seat) && state.pending_claims.get(seat).is_none())
}

/// Whether a bot seat is expected to act in this state.
#[must_use]
pub fn bot_should_act(state: &MatchState) -> bool {
    match state.stage {
        Stage::PlayerDraw | Stage::PlayerDiscard => state.current_seat.is_some_and(|s| state.is_bot(s)),
        Stage::WaitAction => undeclared_bots(state).next().is_some(),
        _ => false,
    }
}

/// The next bot move, if a bot seat is expected to act.
#[must_use]
pub fn plan_move(state: &MatchState, hands: &SeatMap<Vec<Tile>>) -> Option<BotMove> {
    match state.stage {
        Stage::PlayerDraw => state
            .current_seat
            .filter(|&seat| state.is_bot(seat))
            .map(BotMove::Draw),
        Stage::PlayerDiscard => {
            let seat = state.current_seat.filter(|&seat| state.is_bot(seat))?;
            let hand = &hands[seat];
            if can_hu(hand) {
                return Some(BotMove::DeclareWin(seat));
            }
            best_discard(hand).map(|tile| BotMove::Discard { seat, tile })
        }
        Stage::WaitAction => {
            let seat = undeclared_bots(state).next()?;
            let kind = match state.last_discard {
                Some(discard) if can_hu_with(&hands[seat], &discard) => ClaimKind::Hu,
                _ => ClaimKind::Pass,
            };
            Some(BotMove::Claim { seat, kind })
        }
        _ => None,
    }
}

/// Play one bot move, returning the new state, or `None` when no bot is
/// due to act.
pub fn play_one<S: MatchStore + ?Sized>(
    machine: &MatchMachine<'_, S>,
    game_id: &GameId,
) -> Result<Option<MatchState>> {
    let state = machine.state(game_id)?;
    if !bot_should_act(&state) {
        return Ok(None);
    }
    let hands = machine.hands(game_id)?;
    let Some(next) = plan_move(&state, &hands) else {
        return Ok(None);
    };

    info!("[BOT] {} {}", game_id, next);
    let state = match next {
        BotMove::Draw(_) => machine.draw_tile(game_id)?.state,
        BotMove::Discard { seat, tile } => machine.discard_tile(game_id, seat, tile.id)?,
        BotMove::DeclareWin(seat) => machine.declare_win(game_id, seat)?,
        BotMove::Claim { seat, kind } => machine.declare_action(game_id, seat, kind)?,
    };
    Ok(Some(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{tiles_from_str, Variant};

    fn seat(n: u8) -> Seat {
        Seat::new(n).unwrap()
    }

    fn state_with_bots() -> MatchState {
        MatchState::new(GameId::new("b"), Variant::Thirteen, &[seat(3), seat(4)])
    }

    fn hands_with(seat_no: u8, notation: &str) -> SeatMap<Vec<Tile>> {
        let mut hands = SeatMap::with_default();
        hands[seat(seat_no)] = tiles_from_str(notation).unwrap();
        hands
    }

    #[test]
    fn test_humans_are_left_alone() {
        let mut state = state_with_bots();
        state.stage = Stage::PlayerDraw;
        state.current_seat = Some(seat(1));
        assert!(!bot_should_act(&state));
        assert_eq!(plan_move(&state, &SeatMap::with_default()), None);

        state.current_seat = Some(seat(3));
        assert!(bot_should_act(&state));
        assert_eq!(plan_move(&state, &SeatMap::with_default()), Some(BotMove::Draw(seat(3))));
    }

    #[test]
    fn test_discard_or_win() {
        let mut state = state_with_bots();
        state.stage = Stage::PlayerDiscard;
        state.current_seat = Some(seat(4));

        let winning = hands_with(4, "123m456m789m123p55s");
        assert_eq!(plan_move(&state, &winning), Some(BotMove::DeclareWin(seat(4))));

        let scattered = hands_with(4, "19m19p19s1234w123d2m");
        match plan_move(&state, &scattered) {
            Some(BotMove::Discard { seat: s, .. }) => assert_eq!(s, seat(4)),
            other => panic!("expected a discard, got {:?}", other),
        }
    }

    #[test]
    fn test_claims_in_seat_order() {
        let mut state = state_with_bots();
        state.stage = Stage::WaitAction;
        state.last_discard_seat = Some(seat(1));
        state.last_discard = tiles_from_str("5p").unwrap().first().copied();

        let hands = hands_with(4, "123m456m789m123p5p");
        assert_eq!(
            plan_move(&state, &hands),
            Some(BotMove::Claim { seat: seat(3), kind: ClaimKind::Pass })
        );

        state.pending_claims.declare(seat(3), ClaimKind::Pass);
        assert_eq!(
            plan_move(&state, &hands),
            Some(BotMove::Claim { seat: seat(4), kind: ClaimKind::Hu })
        );

        state.pending_claims.declare(seat(4), ClaimKind::Hu);
        assert!(!bot_should_act(&state));
    }

    #[test]
    fn test_move_seat() {
        let tile = tiles_from_str("1m").unwrap()[0];
        assert_eq!(BotMove::Discard { seat: seat(2), tile }.seat(), seat(2));
        assert_eq!(BotMove::Draw(seat(1)).to_string(), "Seat 1 draws");
    }
}
