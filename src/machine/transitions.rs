//! Match stage transitions.
//!
//! `MatchMachine` owns no state. Every transition loads the persisted
//! `MatchState`, checks stage and authority, computes the new state and
//! any hand or wall changes in memory, then commits all of it as one
//! `WriteBatch`. A transition that fails has written nothing.
//!
//! Callers must serialize transitions per match; the machine itself does
//! no locking.

use log::{debug, info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

use super::claims::Resolution;
use crate::core::{
    ClaimKind, ErrorKind, GameId, MatchAction, MatchConfig, MatchRng, MatchState, MatchStatus,
    OpContext, Result, RoundResult, Seat, SeatMap, Stage,
};
use crate::hand::{can_hu, classify};
use crate::service::records::{stage_state, stage_status};
use crate::service::{load_state, load_status, remove_tile, DeckService, HandService};
use crate::store::{MatchStore, WriteBatch};
use crate::tiles::{Tile, TileId, Variant};

/// Result of a draw step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    pub state: MatchState,
    /// `None` when the wall was empty and the hand ended in a draw.
    pub tile: Option<Tile>,
    /// Tiles left in the wall after the draw.
    pub remaining: usize,
}

impl AsRef<MatchState> for DrawOutcome {
    fn as_ref(&self) -> &MatchState {
        &self.state
    }
}

/// Result of a deal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DealOutcome {
    pub state: MatchState,
    pub hands: SeatMap<Vec<Tile>>,
    pub remaining: usize,
}

impl AsRef<MatchState> for DealOutcome {
    fn as_ref(&self) -> &MatchState {
        &self.state
    }
}

/// Stage transitions over one store.
pub struct MatchMachine<'a, S: MatchStore + ?Sized> {
    store: &'a S,
    config: &'a MatchConfig,
}

impl<'a, S: MatchStore + ?Sized> MatchMachine<'a, S> {
    pub fn new(store: &'a S, config: &'a MatchConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        self.config
    }

    fn hand_service(&self) -> HandService<'a, S> {
        HandService::new(self.store)
    }

    fn deck_service(&self) -> DeckService<'a, S> {
        DeckService::new(self.store)
    }

    fn commit(&self, ctx: &OpContext, batch: WriteBatch) -> Result<()> {
        self.store.commit(batch).map_err(|e| ctx.error(e))
    }

    /// Stage the state plus a status refresh, if a status is stored.
    fn stage_with_status(&self, batch: &mut WriteBatch, ctx: &OpContext, state: &MatchState) -> Result<()> {
        stage_state(batch, ctx, state)?;
        if let Some(mut status) = load_status(self.store, ctx, &state.game_id)? {
            status.sync(state);
            stage_status(batch, ctx, &state.game_id, &status)?;
        }
        Ok(())
    }

    /// Create a match in `WaitingPlayers`. `variant` must be 13 or 16.
    pub fn start_match(&self, game_id: GameId, variant: u8) -> Result<MatchState> {
        let ctx = OpContext::new("start_match", &game_id);
        let variant = Variant::try_from(variant).map_err(|e| ctx.error(ErrorKind::InvalidVariant(e.0)))?;

        let state = MatchState::new(game_id, variant, &self.config.bot_seats);
        let status = MatchStatus::new(&state, unix_now());

        let mut batch = WriteBatch::new();
        stage_state(&mut batch, &ctx, &state)?;
        stage_status(&mut batch, &ctx, &state.game_id, &status)?;
        self.commit(&ctx, batch)?;

        info!("[MATCH] {} started, {} variant", state.game_id, variant);
        Ok(state)
    }

    /// Roll for seating. Moves to `DetermineDealer`.
    pub fn roll_positions(&self, game_id: &GameId) -> Result<MatchState> {
        let ctx = OpContext::new("roll_positions", game_id);
        let mut state = load_state(self.store, &ctx, game_id)?;
        state.require_stage(&ctx, &[Stage::WaitingPlayers, Stage::DeterminePositions])?;

        let mut rng = MatchRng::from_entropy().map_err(|e| ctx.error(e))?;
        state.dice = rng.roll_dice();
        state.stage = Stage::DetermineDealer;

        let mut batch = WriteBatch::new();
        stage_state(&mut batch, &ctx, &state)?;
        self.commit(&ctx, batch)?;

        info!("[MATCH] {} positions rolled {}", game_id, state.dice.total);
        Ok(state)
    }

    /// Roll for the first dealer. Moves to `Dealing`.
    pub fn roll_dealer(&self, game_id: &GameId) -> Result<MatchState> {
        let ctx = OpContext::new("roll_dealer", game_id);
        let mut state = load_state(self.store, &ctx, game_id)?;
        state.require_stage(&ctx, &[Stage::DetermineDealer])?;

        let mut rng = MatchRng::from_entropy().map_err(|e| ctx.error(e))?;
        state.dice = rng.roll_dice();
        let dealer = Seat::from_dice_total(state.dice.total);
        state.dealer_seat = Some(dealer);
        state.stage = Stage::Dealing;

        let mut batch = WriteBatch::new();
        self.stage_with_status(&mut batch, &ctx, &state)?;
        self.commit(&ctx, batch)?;

        info!("[MATCH] {} rolled {}, dealer is {}", game_id, state.dice.total, dealer);
        Ok(state)
    }

    /// Shuffle a fresh wall and deal from the dealer. Moves to
    /// `PlayerDiscard` with the dealer to act.
    pub fn deal_tiles(&self, game_id: &GameId) -> Result<DealOutcome> {
        let ctx = OpContext::new("deal_tiles", game_id);
        let mut state = load_state(self.store, &ctx, game_id)?;
        state.require_stage(&ctx, &[Stage::Dealing])?;
        let dealer = state
            .dealer_seat
            .ok_or_else(|| ctx.error(ErrorKind::Corrupt("dealing without a dealer".to_string())))?;

        let mut deck = DeckService::<S>::shuffled(&ctx, state.variant)?;
        let hands = deck
            .deal(state.variant, dealer)
            .ok_or_else(|| ctx.error(ErrorKind::DeckEmpty))?;

        state.reset_hand();
        state.stage = Stage::PlayerDiscard;
        state.current_seat = Some(dealer);
        state.record(None, MatchAction::Deal, None);

        let mut batch = WriteBatch::new();
        DeckService::<S>::stage(&mut batch, &ctx, game_id, &deck)?;
        for (seat, hand) in hands.iter() {
            HandService::<S>::stage(&mut batch, &ctx, game_id, seat, hand)?;
        }
        stage_state(&mut batch, &ctx, &state)?;
        self.commit(&ctx, batch)?;

        info!(
            "[MATCH] {} dealt round {} from {}, {} tiles in the wall",
            game_id,
            state.round.code(),
            dealer,
            deck.len()
        );
        Ok(DealOutcome {
            state,
            hands,
            remaining: deck.len(),
        })
    }

    /// The current seat draws from the wall. Moves to `PlayerDiscard`, or
    /// to `RoundOver` with no winner if the wall is exhausted.
    pub fn draw_tile(&self, game_id: &GameId) -> Result<DrawOutcome> {
        let ctx = OpContext::new("draw_tile", game_id);
        let mut state = load_state(self.store, &ctx, game_id)?;
        state.require_stage(&ctx, &[Stage::PlayerDraw])?;
        let seat = state
            .current_seat
            .ok_or_else(|| ctx.error(ErrorKind::Corrupt("draw without a current seat".to_string())))?;

        let mut deck = self.deck_service().load(&ctx, game_id)?;
        let mut batch = WriteBatch::new();

        let Some(tile) = deck.draw() else {
            state.stage = Stage::RoundOver;
            state.current_seat = None;
            state.last_result = Some(RoundResult::exhaustive_draw());
            stage_state(&mut batch, &ctx, &state)?;
            self.commit(&ctx, batch)?;
            info!("[MATCH] {} wall exhausted, round {} is a draw", game_id, state.round.code());
            return Ok(DrawOutcome {
                state,
                tile: None,
                remaining: 0,
            });
        };

        let mut hand = self.hand_service().hand(&ctx, game_id, seat)?;
        hand.push(tile);

        state.stage = Stage::PlayerDiscard;
        state.record(Some(seat), MatchAction::Draw, None);

        DeckService::<S>::stage(&mut batch, &ctx, game_id, &deck)?;
        HandService::<S>::stage(&mut batch, &ctx, game_id, seat, &hand)?;
        stage_state(&mut batch, &ctx, &state)?;
        self.commit(&ctx, batch)?;

        debug!("[MATCH] {} {} drew {}, {} left", game_id, seat, tile, deck.len());
        Ok(DrawOutcome {
            state,
            tile: Some(tile),
            remaining: deck.len(),
        })
    }

    /// The current seat discards the tile with `tile_id`. Moves to
    /// `WaitAction` and opens a fresh claim window.
    pub fn discard_tile(&self, game_id: &GameId, seat: Seat, tile_id: TileId) -> Result<MatchState> {
        let ctx = OpContext::new("discard_tile", game_id);
        let mut state = load_state(self.store, &ctx, game_id)?;
        state.require_stage(&ctx, &[Stage::PlayerDiscard])?;
        state.require_turn(&ctx, seat)?;

        let mut hand = self.hand_service().hand(&ctx, game_id, seat)?;
        let tile = remove_tile(&mut hand, tile_id).ok_or_else(|| {
            warn!("[MATCH] {} {} tried to discard {} which it does not hold", game_id, seat, tile_id);
            ctx.error(ErrorKind::TileNotHeld { seat, tile: tile_id })
        })?;

        state.last_discard = Some(tile);
        state.last_discard_seat = Some(seat);
        state.pending_claims.clear();
        state.stage = Stage::WaitAction;
        state.record(Some(seat), MatchAction::Discard, Some(tile));

        let mut batch = WriteBatch::new();
        HandService::<S>::stage(&mut batch, &ctx, game_id, seat, &hand)?;
        stage_state(&mut batch, &ctx, &state)?;
        self.commit(&ctx, batch)?;

        info!("[MATCH] {} {} discarded {}", game_id, seat, tile);
        Ok(state)
    }

    /// A seat declares against the latest discard. Resolves the claim
    /// window once it is ready.
    pub fn declare_action(&self, game_id: &GameId, seat: Seat, kind: ClaimKind) -> Result<MatchState> {
        let ctx = OpContext::new("declare_action", game_id);
        let mut state = load_state(self.store, &ctx, game_id)?;
        state.require_stage(&ctx, &[Stage::WaitAction])?;

        let discarder = state
            .last_discard_seat
            .ok_or_else(|| ctx.error(ErrorKind::Corrupt("claim window without a discard".to_string())))?;
        if seat == discarder {
            warn!("[CLAIM] {} {} tried to claim its own discard", game_id, seat);
            return ctx.fail(ErrorKind::SelfClaim(seat));
        }

        let discard = state.last_discard;
        if kind == ClaimKind::Hu && self.config.verify_hu_claims {
            let mut hand = self.hand_service().hand(&ctx, game_id, seat)?;
            hand.extend(discard);
            if !can_hu(&hand) {
                return ctx.fail(ErrorKind::NotAWinningHand(seat));
            }
        }

        state.pending_claims.declare(seat, kind);
        state.record(Some(seat), MatchAction::Claim(kind), None);
        debug!("[CLAIM] {} {} declared {}", game_id, seat, kind);

        let mut batch = WriteBatch::new();
        if state.pending_claims.is_ready(discarder) {
            match state.pending_claims.resolve(discarder) {
                Resolution::Win(winner) => {
                    let mut hand = self.hand_service().hand(&ctx, game_id, winner)?;
                    hand.extend(discard);
                    state.stage = Stage::RoundOver;
                    state.current_seat = Some(winner);
                    state.last_result = Some(RoundResult {
                        winner: Some(winner),
                        winning_tile: discard,
                        self_drawn: false,
                        shapes: classify(&hand),
                    });
                    info!("[CLAIM] {} {} wins on the discard", game_id, winner);
                }
                Resolution::Meld { seat: winner, kind } => {
                    state.stage = Stage::PlayerDiscard;
                    state.current_seat = Some(winner);
                    state.last_discard = None;
                    info!("[CLAIM] {} {} takes the discard for {}", game_id, winner, kind);
                }
                Resolution::AllPass => {
                    state.stage = Stage::PlayerDraw;
                    state.current_seat = Some(discarder.next());
                    state.last_discard = None;
                    debug!("[CLAIM] {} all passed, {} to draw", game_id, discarder.next());
                }
            }
        }

        stage_state(&mut batch, &ctx, &state)?;
        self.commit(&ctx, batch)?;
        Ok(state)
    }

    /// The current seat declares a self-drawn win.
    pub fn declare_win(&self, game_id: &GameId, seat: Seat) -> Result<MatchState> {
        let ctx = OpContext::new("declare_win", game_id);
        let mut state = load_state(self.store, &ctx, game_id)?;
        state.require_stage(&ctx, &[Stage::PlayerDiscard])?;
        state.require_turn(&ctx, seat)?;

        let hand = self.hand_service().hand(&ctx, game_id, seat)?;
        if !can_hu(&hand) {
            warn!("[MATCH] {} {} declared a win without a complete hand", game_id, seat);
            return ctx.fail(ErrorKind::NotAWinningHand(seat));
        }

        state.stage = Stage::RoundOver;
        state.last_result = Some(RoundResult {
            winner: Some(seat),
            winning_tile: hand.last().copied(),
            self_drawn: true,
            shapes: classify(&hand),
        });
        state.record(Some(seat), MatchAction::SelfDrawnWin, None);

        let mut batch = WriteBatch::new();
        stage_state(&mut batch, &ctx, &state)?;
        self.commit(&ctx, batch)?;

        info!("[MATCH] {} {} wins by self-draw", game_id, seat);
        Ok(state)
    }

    /// Advance to the next round, rotating the dealer. After the last
    /// round the match moves to `GameOver` and its wall and hands are
    /// deleted.
    pub fn next_round(&self, game_id: &GameId) -> Result<MatchState> {
        let ctx = OpContext::new("next_round", game_id);
        let mut state = load_state(self.store, &ctx, game_id)?;
        state.require_stage(&ctx, &[Stage::RoundOver])?;

        let mut batch = WriteBatch::new();
        match state.round.next() {
            Some(round) => {
                state.round = round;
                state.dealer_seat = state.dealer_seat.map(Seat::next);
                state.stage = Stage::Dealing;
                state.current_seat = None;
                info!(
                    "[MATCH] {} advancing to round {}, dealer {}",
                    game_id,
                    round.code(),
                    state.dealer_seat.map_or(0, Seat::number)
                );
            }
            None => {
                state.stage = Stage::GameOver;
                state.finished = true;
                state.current_seat = None;
                HandService::<S>::stage_release(&mut batch, game_id);
                info!("[MATCH] {} finished after round {}", game_id, state.round.code());
            }
        }

        self.stage_with_status(&mut batch, &ctx, &state)?;
        self.commit(&ctx, batch)?;
        Ok(state)
    }

    /// Current state. Allowed at any stage.
    pub fn state(&self, game_id: &GameId) -> Result<MatchState> {
        load_state(self.store, &OpContext::new("get_state", game_id), game_id)
    }

    /// Every seat's hand. Empty after the match is over.
    pub fn hands(&self, game_id: &GameId) -> Result<SeatMap<Vec<Tile>>> {
        let ctx = OpContext::new("get_hands", game_id);
        load_state(self.store, &ctx, game_id)?;
        self.hand_service().all(&ctx, game_id)
    }

    /// Tiles left in the wall.
    pub fn deck_count(&self, game_id: &GameId) -> Result<usize> {
        let ctx = OpContext::new("get_deck_count", game_id);
        load_state(self.store, &ctx, game_id)?;
        self.deck_service().count(game_id)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
