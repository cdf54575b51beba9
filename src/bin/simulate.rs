//! Play one all-bot match to the end.
//!
//! ```text
//! simulate [think-time-ms]
//! ```

use log::{error, info};
use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};

use mahjong_match::core::{GameId, MatchConfig, MatchState, Result, Stage};
use mahjong_match::server::{MatchEvent, MatchServer};
use mahjong_match::store::MemoryStore;

const EVENT_CAPACITY: usize = 1024;

fn parse_think_time_from_args() -> Option<u64> {
    std::env::args().nth(1).and_then(|arg| arg.parse().ok())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = MatchConfig::default()
        .all_bots()
        .with_think_time_ms(parse_think_time_from_args().unwrap_or(0))
        .with_event_capacity(EVENT_CAPACITY);
    let server = MatchServer::new(Arc::new(MemoryStore::new()), config);

    if let Err(e) = run(&server).await {
        error!("[SERVER] Simulation stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(server: &Arc<MatchServer<MemoryStore>>) -> Result<()> {
    let mut events = server.subscribe();
    let id = server.start_match(None)?.game_id;
    server.roll_positions(&id)?;
    let state = server.roll_dealer(&id)?;
    info!("[MATCH] {} first dealer is {:?}", id, state.dealer_seat);

    loop {
        server.deal_tiles(&id)?;
        let state = wait_for_round_end(server, &mut events, &id).await?;
        report(&state);
        if server.next_round(&id)?.stage == Stage::GameOver {
            info!("[MATCH] {} is over", id);
            return Ok(());
        }
    }
}

async fn wait_for_round_end(
    server: &MatchServer<MemoryStore>,
    events: &mut Receiver<MatchEvent>,
    id: &GameId,
) -> Result<MatchState> {
    loop {
        match events.recv().await {
            Ok(event) if event.game_id == *id && event.stage == Stage::RoundOver => {
                return server.state(id);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(_)) => {
                let state = server.state(id)?;
                if state.stage == Stage::RoundOver {
                    return Ok(state);
                }
            }
            Err(RecvError::Closed) => return server.state(id),
        }
    }
}

fn report(state: &MatchState) {
    let Some(result) = &state.last_result else {
        return;
    };
    match result.winner {
        Some(winner) => {
            let how = if result.self_drawn { "self-drawn" } else { "on a discard" };
            let shapes: Vec<&str> = result.shapes.iter().map(|s| s.name()).collect();
            info!(
                "[MATCH] {} won {} {} {:?}",
                winner,
                state.round.label(),
                how,
                shapes
            );
        }
        None => info!("[MATCH] {} ended in a draw", state.round.label()),
    }
}
