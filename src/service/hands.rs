//! Stored hands, one ordered list per seat.

use serde::{Deserialize, Serialize};

use super::records::{decode_tiles, encode_tiles};
use crate::core::{GameId, OpContext, Result, Seat, SeatMap};
use crate::store::{deck_key, hand_key, MatchStore, WriteBatch};
use crate::tiles::{Tile, TileId};

/// Hand access for one store.
pub struct HandService<'a, S: MatchStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: MatchStore + ?Sized> HandService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// One seat's hand in stored order.
    pub fn hand(&self, ctx: &OpContext, game_id: &GameId, seat: Seat) -> Result<Vec<Tile>> {
        let raw = self
            .store
            .list(&hand_key(game_id, seat))
            .map_err(|e| ctx.error(e))?;
        decode_tiles(ctx, &raw)
    }

    /// Every seat's hand.
    pub fn all(&self, ctx: &OpContext, game_id: &GameId) -> Result<SeatMap<Vec<Tile>>> {
        let mut hands = SeatMap::with_default();
        for seat in Seat::all() {
            hands[seat] = self.hand(ctx, game_id, seat)?;
        }
        Ok(hands)
    }

    /// Stage a write replacing one seat's hand.
    pub fn stage(
        batch: &mut WriteBatch,
        ctx: &OpContext,
        game_id: &GameId,
        seat: Seat,
        hand: &[Tile],
    ) -> Result<()> {
        batch.replace_list(hand_key(game_id, seat), encode_tiles(ctx, hand)?);
        Ok(())
    }

    /// Stage deletion of the wall and every hand.
    pub fn stage_release(batch: &mut WriteBatch, game_id: &GameId) {
        batch.delete(deck_key(game_id));
        for seat in Seat::all() {
            batch.delete(hand_key(game_id, seat));
        }
    }
}

/// Remove the tile with `id`, returning it if it was held.
pub fn remove_tile(hand: &mut Vec<Tile>, id: TileId) -> Option<Tile> {
    let position = hand.iter().position(|t| t.id == id)?;
    Some(hand.remove(position))
}

/// One seat's hand as reported to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandView {
    pub seat: Seat,
    pub count: usize,
    pub tiles: Vec<Tile>,
    pub names: Vec<String>,
}

impl HandView {
    #[must_use]
    pub fn new(seat: Seat, tiles: Vec<Tile>) -> Self {
        Self {
            seat,
            count: tiles.len(),
            names: tiles.iter().map(Tile::name).collect(),
            tiles,
        }
    }

    /// Views of every hand, in seat order.
    #[must_use]
    pub fn all(hands: SeatMap<Vec<Tile>>) -> Vec<HandView> {
        Seat::all()
            .zip(hands_into_vec(hands))
            .map(|(seat, tiles)| HandView::new(seat, tiles))
            .collect()
    }
}

fn hands_into_vec(mut hands: SeatMap<Vec<Tile>>) -> Vec<Vec<Tile>> {
    Seat::all().map(|seat| std::mem::take(&mut hands[seat])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::tiles::tiles_from_str;

    #[test]
    fn test_stage_and_read_back() {
        let store = MemoryStore::new();
        let service = HandService::new(&store);
        let id = GameId::new("h1");
        let ctx = OpContext::new("test", &id);
        let seat = Seat::new(2).unwrap();
        let hand = tiles_from_str("123m44p").unwrap();

        let mut batch = WriteBatch::new();
        HandService::<MemoryStore>::stage(&mut batch, &ctx, &id, seat, &hand).unwrap();
        store.commit(batch).unwrap();

        assert_eq!(service.hand(&ctx, &id, seat).unwrap(), hand);
        let all = service.all(&ctx, &id).unwrap();
        assert!(all[Seat::new(1).unwrap()].is_empty());
        assert_eq!(all[seat].len(), 5);
    }

    #[test]
    fn test_release_clears_keys() {
        let store = MemoryStore::new();
        let id = GameId::new("h2");
        let ctx = OpContext::new("test", &id);
        let mut batch = WriteBatch::new();
        for seat in Seat::all() {
            HandService::<MemoryStore>::stage(&mut batch, &ctx, &id, seat, &tiles_from_str("1m").unwrap())
                .unwrap();
        }
        batch.replace_list(deck_key(&id), vec!["x".to_string()]);
        store.commit(batch).unwrap();
        assert_eq!(store.key_count(), 5);

        let mut batch = WriteBatch::new();
        HandService::<MemoryStore>::stage_release(&mut batch, &id);
        store.commit(batch).unwrap();
        assert_eq!(store.key_count(), 0);
    }

    #[test]
    fn test_remove_tile_by_id() {
        let mut hand = tiles_from_str("123m").unwrap();
        let removed = remove_tile(&mut hand, TileId(1)).unwrap();
        assert_eq!(removed.value, 2);
        assert_eq!(hand.len(), 2);
        assert!(remove_tile(&mut hand, TileId(1)).is_none());
    }

    #[test]
    fn test_hand_view() {
        let view = HandView::new(Seat::new(1).unwrap(), tiles_from_str("1w2d").unwrap());
        assert_eq!(view.count, 2);
        assert_eq!(view.names, vec!["East Wind", "Green Dragon"]);
    }
}
