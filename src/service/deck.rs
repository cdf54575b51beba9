//! Stored wall operations.
//!
//! The wall lives under `game:{id}:deck` as a head-to-tail list; draws
//! take the tail. A freshly shuffled deck is written with head pushes in
//! shuffled order, so the first draw returns the first shuffled tile.

use log::{debug, info};

use super::records::{decode, decode_tiles, encode_tiles};
use crate::core::{ErrorKind, GameId, MatchRng, OpContext, Result, Seat, SeatMap};
use crate::store::{deck_key, hand_key, MatchStore, WriteBatch};
use crate::tiles::{build_tiles, Deck, Tile, Variant};

/// Wall access for one store.
pub struct DeckService<'a, S: MatchStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: MatchStore + ?Sized> DeckService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// A full deck shuffled with a freshly keyed generator.
    pub fn shuffled(ctx: &OpContext, variant: Variant) -> Result<Deck> {
        let mut rng = MatchRng::from_entropy().map_err(|e| ctx.error(e))?;
        let mut tiles = build_tiles(variant);
        rng.shuffle(&mut tiles);
        Ok(Deck::fill(tiles))
    }

    /// Stage a deck write that replaces any stored wall.
    pub fn stage(batch: &mut WriteBatch, ctx: &OpContext, game_id: &GameId, deck: &Deck) -> Result<()> {
        batch.replace_list(deck_key(game_id), encode_tiles(ctx, deck.to_list().iter())?);
        Ok(())
    }

    /// Build, shuffle and store a new wall, replacing any prior one.
    /// Returns the tile count.
    pub fn init(&self, game_id: &GameId, variant: Variant) -> Result<usize> {
        let ctx = OpContext::new("init_deck", game_id);
        let mut rng = MatchRng::from_entropy().map_err(|e| ctx.error(e))?;
        let mut tiles = build_tiles(variant);
        rng.shuffle(&mut tiles);

        let count = tiles.len();
        let mut batch = WriteBatch::new();
        batch
            .delete(deck_key(game_id))
            .push_head(deck_key(game_id), encode_tiles(&ctx, tiles.iter())?);
        self.store.commit(batch).map_err(|e| ctx.error(e))?;

        info!("[DECK] {} initialized {} wall with {} tiles", game_id, variant, count);
        Ok(count)
    }

    /// The stored wall.
    pub fn load(&self, ctx: &OpContext, game_id: &GameId) -> Result<Deck> {
        let raw = self.store.list(&deck_key(game_id)).map_err(|e| ctx.error(e))?;
        Ok(Deck::from_list(decode_tiles(ctx, &raw)?))
    }

    /// Remove and return the next tile.
    pub fn draw(&self, game_id: &GameId) -> Result<Tile> {
        let ctx = OpContext::new("draw", game_id);
        let tile = self.peek_with(&ctx, game_id)?.ok_or_else(|| ctx.error(ErrorKind::DeckEmpty))?;
        let mut batch = WriteBatch::new();
        batch.pop_tail(deck_key(game_id));
        self.store.commit(batch).map_err(|e| ctx.error(e))?;
        debug!("[DECK] {} drew {}", game_id, tile);
        Ok(tile)
    }

    /// The tile the next draw would return, without removing it.
    pub fn peek(&self, game_id: &GameId) -> Result<Option<Tile>> {
        self.peek_with(&OpContext::new("peek", game_id), game_id)
    }

    fn peek_with(&self, ctx: &OpContext, game_id: &GameId) -> Result<Option<Tile>> {
        self.store
            .peek_tail(&deck_key(game_id))
            .map_err(|e| ctx.error(e))?
            .map(|raw| decode(ctx, &raw))
            .transpose()
    }

    /// Tiles left in the wall.
    pub fn count(&self, game_id: &GameId) -> Result<usize> {
        let ctx = OpContext::new("deck_count", game_id);
        self.store.list_len(&deck_key(game_id)).map_err(|e| ctx.error(e))
    }

    /// Deal starting hands from the stored wall and store them, dealer first.
    pub fn deal(&self, game_id: &GameId, variant: Variant, dealer: Seat) -> Result<SeatMap<Vec<Tile>>> {
        let ctx = OpContext::new("deal", game_id);
        let mut deck = self.load(&ctx, game_id)?;
        let hands = deck
            .deal(variant, dealer)
            .ok_or_else(|| ctx.error(ErrorKind::DeckEmpty))?;

        let mut batch = WriteBatch::new();
        Self::stage(&mut batch, &ctx, game_id, &deck)?;
        for (seat, hand) in hands.iter() {
            batch.replace_list(hand_key(game_id, seat), encode_tiles(&ctx, hand.iter())?);
        }
        self.store.commit(batch).map_err(|e| ctx.error(e))?;

        info!("[DECK] {} dealt from {}, {} tiles left", game_id, dealer, deck.len());
        Ok(hands)
    }
}
