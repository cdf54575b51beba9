//! Store-backed services: the wall, the hands and the state records.

pub mod records;
pub mod deck;
pub mod hands;

pub use records::{load_state, load_status};
pub use deck::DeckService;
pub use hands::{remove_tile, HandService, HandView};
