//! Encoding of stored records.
//!
//! Tiles, the match state and the status summary are stored as JSON
//! objects with named fields. Anything that fails to decode is reported
//! as corrupt data, never silently skipped.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::{ErrorKind, GameId, MatchState, MatchStatus, OpContext, Result};
use crate::store::{state_key, status_key, MatchStore, WriteBatch};
use crate::tiles::Tile;

pub(crate) fn encode<T: Serialize>(ctx: &OpContext, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| ctx.error(ErrorKind::Corrupt(e.to_string())))
}

pub(crate) fn decode<T: DeserializeOwned>(ctx: &OpContext, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| ctx.error(ErrorKind::Corrupt(e.to_string())))
}

pub(crate) fn encode_tiles<'a>(
    ctx: &OpContext,
    tiles: impl IntoIterator<Item = &'a Tile>,
) -> Result<Vec<String>> {
    tiles.into_iter().map(|t| encode(ctx, t)).collect()
}

pub(crate) fn decode_tiles(ctx: &OpContext, raw: &[String]) -> Result<Vec<Tile>> {
    raw.iter().map(|r| decode(ctx, r)).collect()
}

/// Load the state of a match, failing if none is stored.
pub fn load_state<S: MatchStore + ?Sized>(
    store: &S,
    ctx: &OpContext,
    game_id: &GameId,
) -> Result<MatchState> {
    let raw = store
        .get(&state_key(game_id))
        .map_err(|e| ctx.error(e))?
        .ok_or_else(|| ctx.error(ErrorKind::StateMissing))?;
    decode(ctx, &raw)
}

/// Load the status summary of a match, if one is stored.
pub fn load_status<S: MatchStore + ?Sized>(
    store: &S,
    ctx: &OpContext,
    game_id: &GameId,
) -> Result<Option<MatchStatus>> {
    store
        .get(&status_key(game_id))
        .map_err(|e| ctx.error(e))?
        .map(|raw| decode(ctx, &raw))
        .transpose()
}

pub(crate) fn stage_state(batch: &mut WriteBatch, ctx: &OpContext, state: &MatchState) -> Result<()> {
    batch.set(state_key(&state.game_id), encode(ctx, state)?);
    Ok(())
}

pub(crate) fn stage_status(
    batch: &mut WriteBatch,
    ctx: &OpContext,
    game_id: &GameId,
    status: &MatchStatus,
) -> Result<()> {
    batch.set(status_key(game_id), encode(ctx, status)?);
    Ok(())
}
