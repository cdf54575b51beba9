//! Match server: the action surface hosts call from their transport.
//!
//! ## Serialization
//!
//! Every mutation takes the match's lock from the `MatchRegistry` for its
//! whole load-mutate-store sequence. Different matches have different
//! locks and never wait on each other. Reads go straight to the store,
//! whose commits are atomic.
//!
//! ## Bot turns
//!
//! After each accepted mutation the server publishes a `MatchEvent` and,
//! if a bot seat is due, spawns a tokio task that sleeps for the
//! configured think time and then plays one bot move under the match
//! lock. Scheduling a new task aborts the pending one. Reaching
//! `GameOver` cancels the match token and drops the registry entry.
//!
//! Without a tokio runtime nothing is scheduled; hosts call
//! [`MatchServer::drive_bots`] instead.

pub mod bot;
pub mod registry;
pub mod wire;

pub use bot::{bot_should_act, plan_move, play_one, BotMove};
pub use registry::{MatchEntry, MatchRegistry};
pub use wire::{ErrorBody, Outcome, Payload, Request, Response};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast;

use crate::core::{
    ClaimKind, ErrorKind, GameId, MatchConfig, MatchError, MatchState, OpContext, Result, Seat,
    SeatMap, Stage,
};
use crate::machine::{DealOutcome, DrawOutcome, MatchMachine};
use crate::service::HandView;
use crate::store::MatchStore;
use crate::tiles::{Tile, TileId};

/// Published after every accepted mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub game_id: GameId,
    pub stage: Stage,
    pub current_seat: Option<Seat>,
}

impl From<&MatchState> for MatchEvent {
    fn from(state: &MatchState) -> Self {
        Self {
            game_id: state.game_id.clone(),
            stage: state.stage,
            current_seat: state.current_seat,
        }
    }
}

pub struct MatchServer<S: MatchStore + ?Sized> {
    store: Arc<S>,
    config: MatchConfig,
    registry: MatchRegistry,
    events: broadcast::Sender<MatchEvent>,
}

impl<S: MatchStore + ?Sized + 'static> MatchServer<S> {
    pub fn new(store: Arc<S>, config: MatchConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Arc::new(Self {
            store,
            config,
            registry: MatchRegistry::new(),
            events,
        })
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.events.subscribe()
    }

    fn machine(&self) -> MatchMachine<'_, S> {
        MatchMachine::new(&*self.store, &self.config)
    }

    /// Run `f` under the match lock.
    fn locked<T>(&self, game_id: &GameId, f: impl FnOnce(&MatchMachine<'_, S>) -> Result<T>) -> Result<T> {
        let entry = self.registry.entry(game_id);
        let result = {
            let _guard = entry.lock();
            f(&self.machine())
        };
        if let Err(MatchError { kind: ErrorKind::MatchFinished, .. }) = &result {
            self.registry.retire(game_id);
        }
        result
    }

    /// Run a transition under the match lock, then publish and schedule.
    fn mutate<T: AsRef<MatchState>>(
        self: &Arc<Self>,
        game_id: &GameId,
        f: impl FnOnce(&MatchMachine<'_, S>) -> Result<T>,
    ) -> Result<T> {
        let outcome = self.locked(game_id, f)?;
        self.after_mutation(outcome.as_ref());
        Ok(outcome)
    }

    fn publish(&self, state: &MatchState) {
        // No subscribers is not an error.
        let _ = self.events.send(MatchEvent::from(state));
    }

    fn after_mutation(self: &Arc<Self>, state: &MatchState) {
        self.publish(state);
        if state.stage == Stage::GameOver {
            self.registry.retire(&state.game_id);
        } else if bot::bot_should_act(state) {
            self.schedule_bot(&state.game_id);
        }
    }

    fn schedule_bot(self: &Arc<Self>, game_id: &GameId) {
        let Ok(runtime) = Handle::try_current() else {
            debug!("[BOT] {} has a bot due but no runtime is running", game_id);
            return;
        };

        let entry = self.registry.entry(game_id);
        let cancel = entry.cancel.clone();
        let delay = self.config.think_time();
        let server = Arc::clone(self);
        let id = game_id.clone();

        let mut slot = entry.bot_slot();
        let handle = runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => debug!("[BOT] {} turn cancelled", id),
                _ = tokio::time::sleep(delay) => server.bot_step(&id),
            }
        });
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// One scheduled bot move. The stage is re-read under the lock, so a
    /// human move that landed during the think time simply wins.
    fn bot_step(self: &Arc<Self>, game_id: &GameId) {
        match self.locked(game_id, |machine| bot::play_one(machine, game_id)) {
            Ok(Some(state)) => self.after_mutation(&state),
            Ok(None) => debug!("[BOT] {} nothing to do", game_id),
            Err(err) => warn!("[BOT] {}", err),
        }
    }

    /// Play bot moves until a human seat or the host is due to act.
    /// Returns the resulting state.
    pub fn drive_bots(&self, game_id: &GameId) -> Result<MatchState> {
        loop {
            match self.locked(game_id, |machine| bot::play_one(machine, game_id))? {
                Some(state) => {
                    self.publish(&state);
                    if state.stage == Stage::GameOver {
                        self.registry.retire(game_id);
                    }
                }
                None => return self.state(game_id),
            }
        }
    }

    pub fn start_match(self: &Arc<Self>, variant: Option<u8>) -> Result<MatchState> {
        let variant = variant.unwrap_or_else(|| self.config.default_variant.into());
        let game_id = GameId::generate();
        let id = game_id.clone();
        self.mutate(&id, move |machine| machine.start_match(game_id, variant))
    }

    pub fn roll_positions(self: &Arc<Self>, game_id: &GameId) -> Result<MatchState> {
        self.mutate(game_id, |machine| machine.roll_positions(game_id))
    }

    pub fn roll_dealer(self: &Arc<Self>, game_id: &GameId) -> Result<MatchState> {
        self.mutate(game_id, |machine| machine.roll_dealer(game_id))
    }

    pub fn deal_tiles(self: &Arc<Self>, game_id: &GameId) -> Result<DealOutcome> {
        self.mutate(game_id, |machine| machine.deal_tiles(game_id))
    }

    pub fn draw_tile(self: &Arc<Self>, game_id: &GameId) -> Result<DrawOutcome> {
        self.mutate(game_id, |machine| machine.draw_tile(game_id))
    }

    pub fn discard_tile(self: &Arc<Self>, game_id: &GameId, seat: Seat, tile_id: TileId) -> Result<MatchState> {
        self.mutate(game_id, |machine| machine.discard_tile(game_id, seat, tile_id))
    }

    pub fn declare_action(self: &Arc<Self>, game_id: &GameId, seat: Seat, kind: ClaimKind) -> Result<MatchState> {
        self.mutate(game_id, |machine| machine.declare_action(game_id, seat, kind))
    }

    pub fn declare_win(self: &Arc<Self>, game_id: &GameId, seat: Seat) -> Result<MatchState> {
        self.mutate(game_id, |machine| machine.declare_win(game_id, seat))
    }

    pub fn next_round(self: &Arc<Self>, game_id: &GameId) -> Result<MatchState> {
        self.mutate(game_id, |machine| machine.next_round(game_id))
    }

    pub fn state(&self, game_id: &GameId) -> Result<MatchState> {
        self.machine().state(game_id)
    }

    pub fn hands(&self, game_id: &GameId) -> Result<SeatMap<Vec<Tile>>> {
        self.machine().hands(game_id)
    }

    pub fn deck_count(&self, game_id: &GameId) -> Result<usize> {
        self.machine().deck_count(game_id)
    }

    /// Dispatch one wire request.
    pub fn handle(self: &Arc<Self>, request: Request) -> Response {
        let action = request.name();
        match self.dispatch(request) {
            Ok(payload) => Response::ok(action, payload),
            Err(err) => {
                warn!("[SERVER] {}", err);
                Response::err(action, &err)
            }
        }
    }

    fn dispatch(self: &Arc<Self>, request: Request) -> Result<Payload> {
        let action = request.name();
        let payload = match request {
            Request::StartMatch { variant } => {
                let state = self.start_match(variant)?;
                info!("[SERVER] {} created", state.game_id);
                Payload::State(state)
            }
            Request::RollPositions { game_id } => Payload::State(self.roll_positions(&game_id)?),
            Request::RollDealer { game_id } => Payload::State(self.roll_dealer(&game_id)?),
            Request::DealTiles { game_id } => {
                let DealOutcome { state, hands, remaining } = self.deal_tiles(&game_id)?;
                Payload::Dealt {
                    state,
                    hands: HandView::all(hands),
                    remaining,
                }
            }
            Request::DrawTile { game_id } => {
                let DrawOutcome { state, tile, remaining } = self.draw_tile(&game_id)?;
                Payload::Drawn { state, tile, remaining }
            }
            Request::DiscardTile { game_id, seat, tile_id } => {
                let seat = parse_seat(action, &game_id, seat)?;
                Payload::State(self.discard_tile(&game_id, seat, tile_id)?)
            }
            Request::DeclareAction { game_id, seat, kind } => {
                let seat = parse_seat(action, &game_id, seat)?;
                let kind = ClaimKind::from_str(&kind)
                    .map_err(|kind| OpContext::new(action, &game_id).error(kind))?;
                Payload::State(self.declare_action(&game_id, seat, kind)?)
            }
            Request::DeclareWin { game_id, seat } => {
                let seat = parse_seat(action, &game_id, seat)?;
                Payload::State(self.declare_win(&game_id, seat)?)
            }
            Request::NextRound { game_id } => Payload::State(self.next_round(&game_id)?),
            Request::GetState { game_id } => Payload::State(self.state(&game_id)?),
            Request::GetHands { game_id } => Payload::Hands(HandView::all(self.hands(&game_id)?)),
            Request::GetDeckCount { game_id } => Payload::DeckCount(self.deck_count(&game_id)?),
        };
        Ok(payload)
    }
}

fn parse_seat(action: &'static str, game_id: &GameId, seat: u8) -> Result<Seat> {
    Seat::try_from(seat).map_err(|e| OpContext::new(action, game_id).error(ErrorKind::InvalidSeat(e.0)))
}
