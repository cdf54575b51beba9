//! Tiles: identity, count arrays and the deck.

pub mod tile;
pub mod counts;
pub mod deck;

pub use tile::{
    face_name, index_face, tiles_from_str, Suit, Tile, TileId, DRAGON_START, INDEX_COUNT,
    WIND_START,
};
pub use counts::TileCounts;
pub use deck::{build_tiles, sort_hand, Deck, InvalidVariant, Variant};
