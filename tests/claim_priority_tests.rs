//! Claim windows resolved through the match machine.

use mahjong_match::core::{
    ClaimKind, ErrorCategory, ErrorKind, GameId, MatchConfig, MatchState, OpContext, Seat, Stage,
};
use mahjong_match::machine::MatchMachine;
use mahjong_match::service::HandService;
use mahjong_match::store::{MatchStore, MemoryStore, WriteBatch};
use mahjong_match::tiles::{tiles_from_str, Tile, TileId};

/// Parse notation with ids starting at `offset`, so hands never share ids.
fn tiles(notation: &str, offset: u8) -> Vec<Tile> {
    tiles_from_str(notation)
        .unwrap()
        .into_iter()
        .map(|t| Tile::new(TileId(t.id.0 + offset), t.suit, t.value))
        .collect()
}

fn set_hand(store: &MemoryStore, id: &GameId, seat: Seat, hand: &[Tile]) {
    let ctx = OpContext::new("test", id);
    let mut batch = WriteBatch::new();
    HandService::<MemoryStore>::stage(&mut batch, &ctx, id, seat, hand).unwrap();
    store.commit(batch).unwrap();
}

/// A dealt match where the dealer has just discarded the East wind.
/// The seat after the dealer can win on it.
fn after_discard(store: &MemoryStore, config: &MatchConfig) -> (GameId, Seat) {
    let machine = MatchMachine::new(store, config);
    let id = GameId::generate();
    machine.start_match(id.clone(), 13).unwrap();
    machine.roll_positions(&id).unwrap();
    let dealer = machine.roll_dealer(&id).unwrap().dealer_seat.unwrap();
    machine.deal_tiles(&id).unwrap();

    let dealer_hand = tiles("123456789s1235p1w", 0);
    let east = dealer_hand.last().copied().unwrap();
    set_hand(store, &id, dealer, &dealer_hand);
    set_hand(store, &id, dealer.next(), &tiles("123m456m789m123p1w", 20));
    set_hand(store, &id, dealer.next().next(), &tiles("147m258p369s1234w", 40));
    set_hand(store, &id, dealer.next().next().next(), &tiles("147m258p369s123d", 60));

    let state = machine.discard_tile(&id, dealer, east.id).unwrap();
    assert_eq!(state.stage, Stage::WaitAction);
    (id, dealer)
}

fn declare(machine: &MatchMachine<'_, MemoryStore>, id: &GameId, seat: Seat, kind: ClaimKind) -> MatchState {
    machine.declare_action(id, seat, kind).unwrap()
}

#[test]
fn test_hu_resolves_at_once() {
    let store = MemoryStore::new();
    let config = MatchConfig::default();
    let (id, dealer) = after_discard(&store, &config);
    let machine = MatchMachine::new(&store, &config);
    let winner = dealer.next();

    let state = declare(&machine, &id, winner, ClaimKind::Hu);
    assert_eq!(state.stage, Stage::RoundOver);
    assert_eq!(state.current_seat, Some(winner));
    let result = state.last_result.unwrap();
    assert_eq!(result.winner, Some(winner));
    assert!(!result.self_drawn);
    assert_eq!(result.winning_tile.map(|t| t.value), Some(1));

    let err = machine
        .declare_action(&id, dealer.next().next(), ClaimKind::Pass)
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::State);
}

#[test]
fn test_hu_outranks_earlier_pong() {
    let store = MemoryStore::new();
    let config = MatchConfig::default();
    let (id, dealer) = after_discard(&store, &config);
    let machine = MatchMachine::new(&store, &config);
    let [_, second, third, fourth] = dealer.rotation();

    let state = declare(&machine, &id, third, ClaimKind::Pong);
    assert_eq!(state.stage, Stage::WaitAction);
    let state = declare(&machine, &id, fourth, ClaimKind::Hu);
    assert_eq!(state.stage, Stage::RoundOver);
    assert_eq!(state.current_seat, Some(fourth));
    assert_eq!(state.pending_claims.get(second), None);
}

#[test]
fn test_pong_beats_chow() {
    let store = MemoryStore::new();
    let config = MatchConfig::default();
    let (id, dealer) = after_discard(&store, &config);
    let machine = MatchMachine::new(&store, &config);
    let [_, second, third, fourth] = dealer.rotation();

    declare(&machine, &id, second, ClaimKind::Chow);
    declare(&machine, &id, third, ClaimKind::Pass);
    let state = declare(&machine, &id, fourth, ClaimKind::Pong);

    assert_eq!(state.stage, Stage::PlayerDiscard);
    assert_eq!(state.current_seat, Some(fourth));
    assert_eq!(state.last_discard, None);
}

#[test]
fn test_equal_claims_go_to_first_seat_after_discarder() {
    let store = MemoryStore::new();
    let config = MatchConfig::default();
    let (id, dealer) = after_discard(&store, &config);
    let machine = MatchMachine::new(&store, &config);
    let [_, second, third, fourth] = dealer.rotation();

    declare(&machine, &id, fourth, ClaimKind::Kong);
    declare(&machine, &id, second, ClaimKind::Pass);
    let state = declare(&machine, &id, third, ClaimKind::Kong);

    assert_eq!(state.stage, Stage::PlayerDiscard);
    assert_eq!(state.current_seat, Some(third));
}

#[test]
fn test_all_pass_hands_the_draw_on() {
    let store = MemoryStore::new();
    let config = MatchConfig::default();
    let (id, dealer) = after_discard(&store, &config);
    let machine = MatchMachine::new(&store, &config);

    let mut state = None;
    for seat in dealer.others() {
        state = Some(declare(&machine, &id, seat, ClaimKind::Pass));
    }
    let state = state.unwrap();
    assert_eq!(state.stage, Stage::PlayerDraw);
    assert_eq!(state.current_seat, Some(dealer.next()));
    assert_eq!(state.last_discard, None);
}

#[test]
fn test_redeclaring_replaces_the_claim() {
    let store = MemoryStore::new();
    let config = MatchConfig::default();
    let (id, dealer) = after_discard(&store, &config);
    let machine = MatchMachine::new(&store, &config);
    let [_, second, third, fourth] = dealer.rotation();

    declare(&machine, &id, second, ClaimKind::Pong);
    declare(&machine, &id, second, ClaimKind::Pass);
    declare(&machine, &id, third, ClaimKind::Pass);
    let state = declare(&machine, &id, fourth, ClaimKind::Pass);
    assert_eq!(state.stage, Stage::PlayerDraw);
}

#[test]
fn test_self_claim_is_rejected() {
    let store = MemoryStore::new();
    let config = MatchConfig::default();
    let (id, dealer) = after_discard(&store, &config);
    let machine = MatchMachine::new(&store, &config);
    let before = machine.state(&id).unwrap();

    let err = machine.declare_action(&id, dealer, ClaimKind::Hu).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SelfClaim(dealer));
    assert_eq!(machine.state(&id).unwrap(), before);
}

#[test]
fn test_verified_hu_must_complete_the_hand() {
    let store = MemoryStore::new();
    let config = MatchConfig::default().with_hu_verification(true);
    let (id, dealer) = after_discard(&store, &config);
    let machine = MatchMachine::new(&store, &config);
    let before = machine.state(&id).unwrap();

    let err = machine
        .declare_action(&id, dealer.next().next(), ClaimKind::Hu)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotAWinningHand(dealer.next().next()));
    assert_eq!(machine.state(&id).unwrap(), before);

    let state = declare(&machine, &id, dealer.next(), ClaimKind::Hu);
    assert_eq!(state.stage, Stage::RoundOver);
}

#[test]
fn test_unverified_hu_is_trusted() {
    let store = MemoryStore::new();
    let config = MatchConfig::default();
    let (id, dealer) = after_discard(&store, &config);
    let machine = MatchMachine::new(&store, &config);

    let state = declare(&machine, &id, dealer.next().next(), ClaimKind::Hu);
    assert_eq!(state.stage, Stage::RoundOver);
    assert!(state.last_result.unwrap().shapes.is_empty());
}
